//! Scene state and per-frame animation

pub mod animator;
pub mod memory;

pub use animator::{AnimatorState, VortexMaterial};
pub use memory::{fade_opacity, MemoryGallery, MemoryPanel, PlacementRing};
