//! Memory panels: user images placed on a ring around the tree

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use lumitree_fx::XorShift32;

use crate::assets::MemoryTexture;

/// Opacity of a panel `age` seconds after insertion.
///
/// Linear ramp from 0 to 1 over `fade_in` seconds, then exactly 1.
/// Negative ages clamp to 0.
pub fn fade_opacity(age: f32, fade_in: f32) -> f32 {
    if age < fade_in {
        (age / fade_in).max(0.0)
    } else {
        1.0
    }
}

/// Where new panels go
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRing {
    pub radius: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl PlacementRing {
    pub fn place(&self, rng: &mut XorShift32) -> Vec3 {
        let angle = rng.angle();
        let y = rng.range(self.min_height, self.max_height);
        Vec3::new(self.radius * angle.cos(), y, self.radius * angle.sin())
    }
}

/// A textured rectangle in the scene
#[derive(Debug, Clone)]
pub struct MemoryPanel {
    id: u64,
    texture: MemoryTexture,
    position: Vec3,
    size: Vec2,
    birth_time: f32,
    opacity: f32,
}

impl MemoryPanel {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn texture(&self) -> &MemoryTexture {
        &self.texture
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Width and height in scene units
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn birth_time(&self) -> f32 {
        self.birth_time
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Yaw (radians) that turns the panel's front toward the tree axis.
    pub fn facing_yaw(&self) -> f32 {
        (-self.position.x).atan2(-self.position.z)
    }

    fn advance(&mut self, elapsed: f32, fade_in: f32, bob_amplitude: f32) {
        let age = elapsed - self.birth_time;
        if self.opacity < 1.0 {
            self.opacity = fade_opacity(age, fade_in);
        }
        self.position.y += (elapsed + self.position.x).sin() * bob_amplitude;
    }
}

/// Owns every memory panel, oldest first.
#[derive(Debug, Clone)]
pub struct MemoryGallery {
    panels: VecDeque<MemoryPanel>,
    ring: PlacementRing,
    panel_height: f32,
    max_panels: Option<usize>,
    next_id: u64,
    rng: XorShift32,
}

impl MemoryGallery {
    /// A cap of zero is treated as one: the newest panel always stays.
    pub fn new(ring: PlacementRing, panel_height: f32, max_panels: Option<usize>, seed: u32) -> Self {
        Self {
            panels: VecDeque::new(),
            ring,
            panel_height,
            max_panels: max_panels.map(|cap| cap.max(1)),
            next_id: 0,
            rng: XorShift32::new(seed),
        }
    }

    /// Add a panel born at `elapsed`; returns its id.
    ///
    /// With a cap configured, the oldest panels are evicted to make room.
    pub fn insert(&mut self, texture: MemoryTexture, elapsed: f32) -> u64 {
        if let Some(cap) = self.max_panels {
            while self.panels.len() >= cap {
                if let Some(evicted) = self.panels.pop_front() {
                    tracing::debug!("Evicting memory panel {} ({})", evicted.id, evicted.texture.source);
                }
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let size = Vec2::new(self.panel_height * texture.aspect(), self.panel_height);
        let position = self.ring.place(&mut self.rng);

        tracing::info!(
            "Memory panel {} placed at ({:.1}, {:.1}, {:.1})",
            id,
            position.x,
            position.y,
            position.z
        );

        self.panels.push_back(MemoryPanel {
            id,
            texture,
            position,
            size,
            birth_time: elapsed,
            opacity: 0.0,
        });
        id
    }

    pub fn advance(&mut self, elapsed: f32, fade_in: f32, bob_amplitude: f32) {
        for panel in &mut self.panels {
            panel.advance(elapsed, fade_in, bob_amplitude);
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &MemoryPanel> {
        self.panels.iter()
    }

    pub fn get(&self, id: u64) -> Option<&MemoryPanel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn texture(name: &str, w: u32, h: u32) -> MemoryTexture {
        MemoryTexture {
            source: name.to_string(),
            width: w,
            height: h,
            pixels: Arc::new(Vec::new()),
        }
    }

    fn ring() -> PlacementRing {
        PlacementRing {
            radius: 15.0,
            min_height: -5.0,
            max_height: 5.0,
        }
    }

    #[test]
    fn test_fade_ramp() {
        assert_eq!(fade_opacity(0.0, 2.0), 0.0);
        assert_eq!(fade_opacity(1.0, 2.0), 0.5);
        assert_eq!(fade_opacity(2.0, 2.0), 1.0);
        assert_eq!(fade_opacity(7.5, 2.0), 1.0);
        assert_eq!(fade_opacity(-0.3, 2.0), 0.0);
    }

    #[test]
    fn test_panel_fades_in_and_holds() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 1);
        let id = gallery.insert(texture("a.png", 4, 4), 10.0);

        gallery.advance(10.0, 2.0, 0.0);
        assert_eq!(gallery.get(id).unwrap().opacity(), 0.0);

        gallery.advance(11.0, 2.0, 0.0);
        assert_eq!(gallery.get(id).unwrap().opacity(), 0.5);

        // A skipped frame past the end of the ramp still lands on 1
        gallery.advance(12.3, 2.0, 0.0);
        assert_eq!(gallery.get(id).unwrap().opacity(), 1.0);

        for t in 13..40 {
            gallery.advance(t as f32, 2.0, 0.01);
            assert_eq!(gallery.get(id).unwrap().opacity(), 1.0);
        }
    }

    #[test]
    fn test_placement_on_ring() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 99);
        for i in 0..20 {
            gallery.insert(texture(&format!("{}.png", i), 4, 3), 0.0);
        }
        for panel in gallery.panels() {
            let p = panel.position();
            assert!(((p.x * p.x + p.z * p.z).sqrt() - 15.0).abs() < 1e-3);
            assert!((-5.0..=5.0).contains(&p.y));
        }
    }

    #[test]
    fn test_two_inserts_are_independent() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 5);
        let a = gallery.insert(texture("a.png", 4, 4), 1.0);
        let b = gallery.insert(texture("b.png", 4, 4), 1.5);

        let (pa, pb) = (gallery.get(a).unwrap(), gallery.get(b).unwrap());
        assert_ne!(a, b);
        assert_ne!(pa.position(), pb.position());
        assert_eq!(pa.birth_time(), 1.0);
        assert_eq!(pb.birth_time(), 1.5);
    }

    #[test]
    fn test_size_follows_aspect() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 5);
        let id = gallery.insert(texture("wide.png", 16, 9), 0.0);
        let size = gallery.get(id).unwrap().size();
        assert_eq!(size.y, 4.0);
        assert!((size.x - 4.0 * 16.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, Some(2), 5);
        let first = gallery.insert(texture("1.png", 4, 4), 0.0);
        let second = gallery.insert(texture("2.png", 4, 4), 1.0);
        let third = gallery.insert(texture("3.png", 4, 4), 2.0);

        assert_eq!(gallery.len(), 2);
        assert!(gallery.get(first).is_none());
        assert!(gallery.get(second).is_some());
        assert!(gallery.get(third).is_some());
    }

    #[test]
    fn test_zero_cap_keeps_newest() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, Some(0), 5);
        let first = gallery.insert(texture("1.png", 4, 4), 0.0);
        assert_eq!(gallery.len(), 1);

        let second = gallery.insert(texture("2.png", 4, 4), 1.0);
        assert_eq!(gallery.len(), 1);
        assert!(gallery.get(first).is_none());
        assert!(gallery.get(second).is_some());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 5);
        for i in 0..50 {
            gallery.insert(texture(&format!("{}.png", i), 4, 4), i as f32);
        }
        assert_eq!(gallery.len(), 50);
    }

    #[test]
    fn test_bob_seeded_by_x() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 5);
        let id = gallery.insert(texture("a.png", 4, 4), 0.0);
        let before = gallery.get(id).unwrap().position();

        gallery.advance(0.7, 2.0, 0.01);

        let after = gallery.get(id).unwrap().position();
        let expected = before.y + (0.7 + before.x).sin() * 0.01;
        assert!((after.y - expected).abs() < 1e-5);
        assert_eq!(after.x, before.x);
    }

    #[test]
    fn test_facing_points_at_axis() {
        let mut gallery = MemoryGallery::new(ring(), 4.0, None, 5);
        let id = gallery.insert(texture("a.png", 4, 4), 0.0);
        let panel = gallery.get(id).unwrap();
        let yaw = panel.facing_yaw();
        // Forward vector (sin yaw, cos yaw) points back toward the origin
        let fwd = Vec2::new(yaw.sin(), yaw.cos());
        let to_axis = Vec2::new(-panel.position().x, -panel.position().z).normalize();
        assert!(fwd.dot(to_axis) > 0.999);
    }
}
