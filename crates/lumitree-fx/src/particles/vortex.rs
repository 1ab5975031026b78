use glam::Vec3;

use super::ParticleGpuData;
use crate::rng::XorShift32;

/// Creation parameters for the ambient vortex.
#[derive(Debug, Clone, PartialEq)]
pub struct VortexParams {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub half_height: f32,
    pub min_angular_velocity: f32,
    pub max_angular_velocity: f32,
    pub seed: u32,
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            count: 3000,
            inner_radius: 10.0,
            outer_radius: 35.0,
            half_height: 20.0,
            min_angular_velocity: 0.2,
            max_angular_velocity: 1.0,
            seed: 0x5EED_0001,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct VortexParticle {
    position: Vec3,
    /// Fixed at creation.
    angular_velocity: f32,
}

/// Fixed-size field of independently orbiting particles.
///
/// Only positions change after construction; the particle count and each
/// particle's angular velocity are fixed for the lifetime of the field.
#[derive(Debug, Clone)]
pub struct VortexField {
    particles: Vec<VortexParticle>,
}

impl VortexField {
    pub fn new(params: &VortexParams) -> Self {
        let mut rng = XorShift32::new(params.seed);
        let particles = (0..params.count)
            .map(|_| {
                let angle = rng.angle();
                let radius = rng.range(params.inner_radius, params.outer_radius);
                let y = rng.range(-params.half_height, params.half_height);
                VortexParticle {
                    position: Vec3::new(radius * angle.cos(), y, radius * angle.sin()),
                    angular_velocity: rng
                        .range(params.min_angular_velocity, params.max_angular_velocity),
                }
            })
            .collect();

        Self { particles }
    }

    /// Build a field from explicit `(position, angular_velocity)` pairs.
    pub fn from_particles(particles: impl IntoIterator<Item = (Vec3, f32)>) -> Self {
        Self {
            particles: particles
                .into_iter()
                .map(|(position, angular_velocity)| VortexParticle {
                    position,
                    angular_velocity,
                })
                .collect(),
        }
    }

    /// Advance one frame.
    ///
    /// Each particle's (x, z) rotates about the vertical axis by
    /// `angular_velocity * spin_scale` radians, and y bobs by
    /// `sin(elapsed + index) * bob_amplitude`.
    pub fn advance(&mut self, elapsed: f32, spin_scale: f32, bob_amplitude: f32) {
        for (i, p) in self.particles.iter_mut().enumerate() {
            let theta = p.angular_velocity * spin_scale;
            let (sin, cos) = theta.sin_cos();
            let Vec3 { x, y, z } = p.position;

            p.position = Vec3::new(
                x * cos - z * sin,
                y + (elapsed + i as f32).sin() * bob_amplitude,
                x * sin + z * cos,
            );
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.particles.get(index).map(|p| p.position)
    }

    pub fn angular_velocity(&self, index: usize) -> Option<f32> {
        self.particles.get(index).map(|p| p.angular_velocity)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Instance records sharing one material (size, colour, opacity).
    pub fn gpu_data(&self, size: f32, color: [f32; 4], opacity: f32) -> Vec<ParticleGpuData> {
        self.particles
            .iter()
            .map(|p| ParticleGpuData::new(p.position.to_array(), size, color, opacity))
            .collect()
    }
}
