//! First-order exponential follow ("lerp toward target") filters.
//!
//! `current += (target - current) * factor`, once per frame. Convergence is
//! geometric with ratio `1 - factor` and never exact for `factor < 1`.

use glam::{Vec2, Vec3};

/// Anything that can be nudged toward a target by a per-frame factor.
///
/// Impls use `a + (b - a) * t` rather than glam's `lerp`, whose
/// `a * (1 - t) + b * t` form can move a value that already sits on its target.
pub trait Follow: Copy {
    fn follow(self, target: Self, factor: f32) -> Self;
}

impl Follow for f32 {
    fn follow(self, target: Self, factor: f32) -> Self {
        self + (target - self) * factor
    }
}

impl Follow for Vec2 {
    fn follow(self, target: Self, factor: f32) -> Self {
        self + (target - self) * factor
    }
}

impl Follow for Vec3 {
    fn follow(self, target: Self, factor: f32) -> Self {
        self + (target - self) * factor
    }
}

/// Free-function form, handy in expressions.
pub fn follow<T: Follow>(current: T, target: T, factor: f32) -> T {
    current.follow(target, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_is_stable() {
        let p = Vec3::new(1.5, -2.0, 10.0);
        assert_eq!(p.follow(p, 0.15), p);
        assert_eq!(3.0f32.follow(3.0, 0.05), 3.0);
    }

    #[test]
    fn test_fixed_point_exact_where_lerp_drifts() {
        // 0.0137 * 0.85 + 0.0137 * 0.15 rounds away from 0.0137 in f32
        let x = 0.0137f32;
        assert_eq!(x.follow(x, 0.15), x);

        let p = Vec3::new(0.0137, 0.0274, 0.0411);
        assert_eq!(p.follow(p, 0.15), p);
        assert_eq!(p.truncate().follow(p.truncate(), 0.05), p.truncate());
    }

    #[test]
    fn test_error_shrinks_geometrically() {
        let target = Vec3::new(10.0, -4.0, 10.0);
        let mut current = Vec3::new(0.0, 0.0, 10.0);
        let initial = (target - current).length();
        let mut prev = initial;

        for k in 1..=40 {
            current = follow(current, target, 0.15);
            let err = (target - current).length();
            assert!(err < prev, "error must strictly decrease (frame {})", k);
            let bound = 0.85f32.powi(k) * initial;
            assert!(err <= bound + 1e-4, "frame {}: {} > {}", k, err, bound);
            prev = err;
        }
        assert_ne!(current, target);
    }

    #[test]
    fn test_factor_one_snaps() {
        let v = Vec2::new(0.0, 0.0).follow(Vec2::new(3.0, 4.0), 1.0);
        assert_eq!(v, Vec2::new(3.0, 4.0));
    }
}
