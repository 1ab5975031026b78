use glam::Vec3;

use super::ParticleGpuData;

/// Fixed-length delay line of recent pointer positions.
///
/// Index 0 is the newest point, the last index the oldest. Every push shifts
/// the whole buffer one slot toward the tail, dropping the oldest point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: Vec<Vec3>,
}

impl TrailBuffer {
    /// Create a trail of `len` points, all at `fill`.
    pub fn new(len: usize, fill: Vec3) -> Self {
        Self {
            points: vec![fill; len],
        }
    }

    pub fn push(&mut self, point: Vec3) {
        let n = self.points.len();
        if n == 0 {
            return;
        }
        self.points.copy_within(0..n - 1, 1);
        self.points[0] = point;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn head(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Instance records fading linearly from the head to the tail.
    pub fn gpu_data(&self, head_size: f32, color: [f32; 4]) -> Vec<ParticleGpuData> {
        let n = self.points.len().max(1) as f32;
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let fade = 1.0 - i as f32 / n;
                ParticleGpuData::new(p.to_array(), head_size * fade, color, fade)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_shifts_toward_tail() {
        let mut trail = TrailBuffer::new(3, Vec3::ZERO);
        trail.push(Vec3::X);
        trail.push(Vec3::Y);

        assert_eq!(trail.points(), &[Vec3::Y, Vec3::X, Vec3::ZERO]);

        trail.push(Vec3::Z);
        assert_eq!(trail.points(), &[Vec3::Z, Vec3::Y, Vec3::X]);
    }

    #[test]
    fn test_length_is_invariant() {
        let mut trail = TrailBuffer::new(100, Vec3::ZERO);
        for i in 0..250 {
            trail.push(Vec3::splat(i as f32));
            assert_eq!(trail.len(), 100);
            assert_eq!(trail.head(), Some(Vec3::splat(i as f32)));
        }
        // The tail is exactly 99 pushes behind the head
        assert_eq!(trail.points()[99], Vec3::splat(150.0));
    }

    #[test]
    fn test_empty_trail_ignores_push() {
        let mut trail = TrailBuffer::new(0, Vec3::ZERO);
        trail.push(Vec3::ONE);
        assert!(trail.is_empty());
        assert_eq!(trail.head(), None);
    }

    #[test]
    fn test_gpu_data_fades() {
        let trail = TrailBuffer::new(4, Vec3::ZERO);
        let data = trail.gpu_data(1.0, [1.0; 4]);
        assert_eq!(data[0].alpha, 1.0);
        assert!(data[3].alpha < data[1].alpha);
    }
}
