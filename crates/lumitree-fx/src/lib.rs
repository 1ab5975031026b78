//! Simulation primitives for the lumitree scene.
//!
//! Nothing in here touches a GPU. The types produce plain instance records
//! (`bytemuck::Pod`) that a renderer can upload as-is.

pub mod follow;
pub mod particles;
pub mod rng;

pub use follow::{follow, Follow};
pub use particles::{
    ParticleGpuData, TrailBuffer, TreeLayout, TreeParams, VortexField, VortexParams,
};
pub use rng::XorShift32;
