use glam::Vec3;

use super::ParticleGpuData;
use crate::rng::XorShift32;

/// Golden angle in radians; keeps successive spiral points evenly spread.
const GOLDEN_ANGLE: f32 = 2.399_963;

const ORNAMENT_COLORS: [[f32; 4]; 5] = [
    [1.0, 0.85, 0.3, 1.0],
    [1.0, 0.2, 0.25, 1.0],
    [0.95, 0.95, 1.0, 1.0],
    [0.3, 0.6, 1.0, 1.0],
    [1.0, 0.45, 0.75, 1.0],
];

const NEEDLE_COLOR: [f32; 4] = [0.2, 0.85, 0.45, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    pub count: usize,
    pub height: f32,
    pub base_radius: f32,
    /// Fraction of points drawn as ornaments instead of needles.
    pub ornament_ratio: f32,
    pub jitter: f32,
    pub point_size: f32,
    pub seed: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            count: 1500,
            height: 24.0,
            base_radius: 9.0,
            ornament_ratio: 0.12,
            jitter: 0.4,
            point_size: 0.18,
            seed: 0x7EE0_0001,
        }
    }
}

/// Static cone of points in group-local space.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    instances: Vec<ParticleGpuData>,
    height: f32,
}

impl TreeLayout {
    pub fn new(params: &TreeParams) -> Self {
        let mut rng = XorShift32::new(params.seed);
        let half = params.height * 0.5;

        let instances = (0..params.count)
            .map(|i| {
                let y = rng.range(-half, half);
                let taper = 1.0 - (y + half) / params.height.max(f32::EPSILON);
                let radius = params.base_radius * taper;
                let angle = i as f32 * GOLDEN_ANGLE;
                let jitter = Vec3::new(
                    rng.range(-params.jitter, params.jitter),
                    0.0,
                    rng.range(-params.jitter, params.jitter),
                ) * taper;
                let position =
                    Vec3::new(radius * angle.cos(), y, radius * angle.sin()) + jitter;

                let (color, size) = if rng.next_f32() < params.ornament_ratio {
                    let color = *rng.pick(&ORNAMENT_COLORS).unwrap_or(&NEEDLE_COLOR);
                    (color, params.point_size * 2.0)
                } else {
                    (NEEDLE_COLOR, params.point_size)
                };

                ParticleGpuData::new(position.to_array(), size, color, 1.0)
            })
            .collect();

        Self {
            instances,
            height: params.height,
        }
    }

    pub fn instances(&self) -> &[ParticleGpuData] {
        &self.instances
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_stay_inside_cone() {
        let params = TreeParams::default();
        let tree = TreeLayout::new(&params);
        assert_eq!(tree.len(), params.count);

        let half = params.height * 0.5;
        for inst in tree.instances() {
            let [x, y, z] = inst.position;
            assert!(y >= -half && y <= half);
            let taper = 1.0 - (y + half) / params.height;
            let max_r = params.base_radius * taper + params.jitter * taper * 1.5;
            assert!((x * x + z * z).sqrt() <= max_r + 1e-3);
        }
    }

    #[test]
    fn test_layout_is_deterministic_per_seed() {
        let a = TreeLayout::new(&TreeParams::default());
        let b = TreeLayout::new(&TreeParams::default());
        assert_eq!(a.instances(), b.instances());
    }

    #[test]
    fn test_has_some_ornaments() {
        let tree = TreeLayout::new(&TreeParams::default());
        let ornaments = tree
            .instances()
            .iter()
            .filter(|i| i.color != NEEDLE_COLOR)
            .count();
        assert!(ornaments > 0);
        assert!(ornaments < tree.len());
    }
}
