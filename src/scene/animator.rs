//! Per-frame scene animation
//!
//! `AnimatorState` owns every animated value in the scene. The render loop
//! calls [`AnimatorState::update`] once per frame with the elapsed time and
//! the newest hand signal, then hands the state to the renderer. Nothing
//! else mutates it.

use glam::{Vec2, Vec3};
use lumitree_fx::{follow, TrailBuffer, TreeLayout, VortexField};

use super::memory::{MemoryGallery, MemoryPanel, PlacementRing};
use crate::assets::MemoryTexture;
use crate::command::{HandSignal, SceneCommand};
use crate::config::{AnimationConfig, Config};

const VORTEX_COLOR: [f32; 4] = [1.0, 0.92, 0.7, 1.0];

/// Shared material of every vortex particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexMaterial {
    pub opacity: f32,
    pub size: f32,
    pub color: [f32; 4],
}

/// All animated scene state
#[derive(Debug, Clone)]
pub struct AnimatorState {
    tuning: AnimationConfig,
    vortex: VortexField,
    tree: TreeLayout,
    trail: TrailBuffer,
    /// Smoothed pointer, scene space
    pointer: Vec3,
    /// Where the pointer is heading; kept while the hand is absent
    pointer_target: Vec3,
    /// Group rotation as (pitch, yaw) radians
    rotation: Vec2,
    rotation_target: Vec2,
    pinching: bool,
    material: VortexMaterial,
    gallery: MemoryGallery,
    ui_visible: bool,
    elapsed: f32,
    frame: u64,
}

impl AnimatorState {
    pub fn new(config: &Config) -> Self {
        let scene = &config.scene;
        let tuning = config.animation.clone();

        let rest = Vec3::new(0.0, 0.0, tuning.pointer_depth);
        let [min_height, max_height] = scene.memory_height_range;

        let material = VortexMaterial {
            opacity: tuning.idle_opacity,
            size: tuning.idle_size,
            color: VORTEX_COLOR,
        };

        Self {
            vortex: VortexField::new(&scene.vortex_params()),
            tree: TreeLayout::new(&scene.tree_params()),
            trail: TrailBuffer::new(scene.trail_length, rest),
            pointer: rest,
            pointer_target: rest,
            rotation: Vec2::ZERO,
            rotation_target: Vec2::ZERO,
            pinching: false,
            material,
            gallery: MemoryGallery::new(
                PlacementRing {
                    radius: scene.memory_ring_radius,
                    min_height,
                    max_height,
                },
                scene.memory_panel_height,
                scene.max_memories,
                scene.seed.rotate_left(13),
            ),
            ui_visible: true,
            elapsed: 0.0,
            frame: 0,
            tuning,
        }
    }

    /// Map a normalized [0, 1]² position into scene space.
    pub fn map_to_scene(&self, position: Vec2) -> Vec3 {
        let [sx, sy] = self.tuning.pointer_scale;
        Vec3::new(
            (position.x - 0.5) * sx,
            (0.5 - position.y) * sy,
            self.tuning.pointer_depth,
        )
    }

    /// Group rotation target (pitch, yaw) for a raw normalized position.
    pub fn rotation_for(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.y - 0.5) * self.tuning.rotation_pitch_range,
            (position.x - 0.5) * self.tuning.rotation_yaw_range,
        )
    }

    /// Advance one frame.
    ///
    /// `elapsed` is seconds since scene start. An absent hand leaves the
    /// pointer target, rotation target and pinch state where they were.
    pub fn update(&mut self, elapsed: f32, hand: HandSignal) {
        self.elapsed = elapsed;
        self.frame += 1;

        self.vortex.advance(
            elapsed,
            self.tuning.vortex_spin_scale,
            self.tuning.bob_amplitude,
        );

        if let Some(sample) = hand.sample() {
            self.pointer_target = self.map_to_scene(sample.position);
            self.rotation_target = self.rotation_for(sample.position);
            self.pinching = sample.pinching;
        }
        self.pointer = follow(self.pointer, self.pointer_target, self.tuning.pointer_smoothing);

        self.trail.push(self.pointer);

        let (opacity, size) = if self.pinching {
            (self.tuning.pinch_opacity, self.tuning.pinch_size)
        } else {
            (self.tuning.idle_opacity, self.tuning.idle_size)
        };
        self.material.opacity = opacity;
        self.material.size = size;

        self.gallery.advance(
            elapsed,
            self.tuning.fade_in_secs,
            self.tuning.bob_amplitude,
        );

        self.rotation = follow(
            self.rotation,
            self.rotation_target,
            self.tuning.rotation_smoothing,
        );
    }

    /// Handle a queued scene command. `Resize` is the caller's concern and
    /// is ignored here.
    pub fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::InsertMemory(texture) => {
                self.insert_memory(texture);
            }
            SceneCommand::ToggleUi => {
                self.ui_visible = !self.ui_visible;
                tracing::info!("UI {}", if self.ui_visible { "shown" } else { "hidden" });
            }
            SceneCommand::Resize { .. } => {}
        }
    }

    /// Add a memory panel born at the current elapsed time.
    pub fn insert_memory(&mut self, texture: MemoryTexture) -> u64 {
        self.gallery.insert(texture, self.elapsed)
    }

    pub fn pointer(&self) -> Vec3 {
        self.pointer
    }

    pub fn pointer_target(&self) -> Vec3 {
        self.pointer_target
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn vortex(&self) -> &VortexField {
        &self.vortex
    }

    pub fn tree(&self) -> &TreeLayout {
        &self.tree
    }

    pub fn material(&self) -> VortexMaterial {
        self.material
    }

    /// Group rotation (pitch, yaw) in radians
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn memories(&self) -> impl Iterator<Item = &MemoryPanel> {
        self.gallery.panels()
    }

    pub fn memory_count(&self) -> usize {
        self.gallery.len()
    }

    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
