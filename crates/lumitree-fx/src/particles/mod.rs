mod trail;
mod tree;
mod vortex;

pub use trail::TrailBuffer;
pub use tree::{TreeLayout, TreeParams};
pub use vortex::{VortexField, VortexParams};

use bytemuck::{Pod, Zeroable};

/// GPU instance data for one billboarded point (48 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleGpuData {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    pub alpha: f32,
    pub _pad: [f32; 3],
}

impl ParticleGpuData {
    pub fn new(position: [f32; 3], size: f32, color: [f32; 4], alpha: f32) -> Self {
        Self {
            position,
            size,
            color,
            alpha,
            _pad: [0.0; 3],
        }
    }
}
