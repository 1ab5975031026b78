//! lumitree - gesture-driven decorative tree scene
//!
//! An animated tree surrounded by a vortex of particles, a hand-driven
//! pointer with a fading trail, and user photos ("memories") that fade in
//! on a ring around the tree:
//! - Per-frame animator with explicit, owned state
//! - MediaPipe hand landmarks (JSON over UDP) for pointer and pinch input
//! - Command handle for the UI shell; renderer behind a trait

pub mod assets;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod runtime;
pub mod scene;
pub mod tracking;

pub use command::{HandSignal, SceneCommand, SceneHandle};
pub use config::Config;
pub use error::{LumitreeError, Result};
pub use runtime::{RenderLoop, SceneRuntime};
pub use scene::AnimatorState;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
