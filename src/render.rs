//! Renderer seam
//!
//! The scene never rasterizes anything itself. Each frame it hands a
//! borrowed [`FrameView`] plus a [`Camera`] to a [`SceneRenderer`].

use glam::{Mat4, Quat, Vec3};
use lumitree_fx::ParticleGpuData;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::scene::{AnimatorState, MemoryPanel, VortexMaterial};

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Bloom post-process parameters passed through to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Perspective camera looking at the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            position: Vec3::from_array(config.camera_position),
            target: Vec3::ZERO,
            fov_y: config.fov_degrees.to_radians(),
            aspect: Viewport::new(config.width, config.height).aspect(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Everything a renderer needs for one frame, borrowed from the animator
pub struct FrameView<'a> {
    pub frame: u64,
    pub elapsed: f32,
    /// Tree group transform (applies to `tree` only)
    pub group_rotation: Quat,
    pub tree: &'a [ParticleGpuData],
    pub vortex: Vec<ParticleGpuData>,
    pub vortex_material: VortexMaterial,
    pub trail: Vec<ParticleGpuData>,
    pub memories: Vec<&'a MemoryPanel>,
    pub bloom: BloomSettings,
    pub ui_visible: bool,
}

const TRAIL_COLOR: [f32; 4] = [1.0, 0.95, 0.8, 1.0];
const TRAIL_HEAD_SIZE: f32 = 0.6;

impl<'a> FrameView<'a> {
    pub fn from_state(state: &'a AnimatorState, bloom: BloomSettings) -> Self {
        let material = state.material();
        let rotation = state.rotation();

        Self {
            frame: state.frame(),
            elapsed: state.elapsed(),
            group_rotation: Quat::from_euler(glam::EulerRot::YXZ, rotation.y, rotation.x, 0.0),
            tree: state.tree().instances(),
            vortex: state
                .vortex()
                .gpu_data(material.size, material.color, material.opacity),
            vortex_material: material,
            trail: state.trail().gpu_data(TRAIL_HEAD_SIZE, TRAIL_COLOR),
            memories: state.memories().collect(),
            bloom,
            ui_visible: state.ui_visible(),
        }
    }
}

/// Something that can draw a frame
pub trait SceneRenderer: Send {
    fn render(&mut self, frame: &FrameView<'_>, camera: &Camera) -> Result<(), RenderError>;

    fn resize(&mut self, viewport: Viewport);

    fn name(&self) -> &str;
}

/// Renderer that draws nothing and logs a periodic frame summary.
#[derive(Debug)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    frames: u64,
    log_every: u64,
}

impl HeadlessRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            viewport: Viewport::new(config.width, config.height),
            frames: 0,
            log_every: config.log_every,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn render(&mut self, frame: &FrameView<'_>, camera: &Camera) -> Result<(), RenderError> {
        self.frames += 1;

        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let pointer = frame.trail.first().map(|p| p.position).unwrap_or_default();
            tracing::debug!(
                frame = frame.frame,
                elapsed = frame.elapsed,
                vortex = frame.vortex.len(),
                memories = frame.memories.len(),
                opacity = frame.vortex_material.opacity,
                aspect = camera.aspect,
                "Frame summary, pointer at ({:.2}, {:.2}, {:.2})",
                pointer[0],
                pointer[1],
                pointer[2]
            );
        }

        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        tracing::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
    }

    fn name(&self) -> &str {
        "headless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::HandSignal;
    use crate::config::Config;
    use crate::tracking::HandSample;

    fn bloom() -> BloomSettings {
        BloomSettings {
            strength: 1.5,
            radius: 0.4,
            threshold: 0.1,
        }
    }

    #[test]
    fn test_viewport_never_zero() {
        let vp = Viewport::new(0, 0);
        assert_eq!((vp.width, vp.height), (1, 1));
        assert_eq!(Viewport::new(1920, 1080).aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn test_camera_resize_updates_aspect() {
        let mut camera = Camera::from_config(&RenderConfig::default());
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);

        camera.resize(Viewport::new(500, 1000));
        assert_eq!(camera.aspect, 0.5);
    }

    #[test]
    fn test_camera_projects_origin_to_centre() {
        let camera = Camera::from_config(&RenderConfig::default());
        let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }

    #[test]
    fn test_frame_view_reflects_state() {
        let mut config = Config::default();
        config.scene.vortex_particles = 16;
        config.scene.tree_particles = 8;
        config.scene.trail_length = 5;
        let mut state = AnimatorState::new(&config);
        state.update(0.1, HandSignal::Present(HandSample::new(0.5, 0.5, true)));

        let view = FrameView::from_state(&state, bloom());
        assert_eq!(view.frame, 1);
        assert_eq!(view.vortex.len(), 16);
        assert_eq!(view.tree.len(), 8);
        assert_eq!(view.trail.len(), 5);
        assert!(view.vortex.iter().all(|v| v.alpha == 0.8 && v.size == 0.25));
        assert!(view.memories.is_empty());
        assert!(view.ui_visible);
    }

    #[test]
    fn test_headless_counts_frames() {
        let mut config = Config::default();
        config.scene.vortex_particles = 4;
        config.scene.tree_particles = 4;
        let state = AnimatorState::new(&config);
        let camera = Camera::from_config(&config.render);
        let mut renderer = HeadlessRenderer::new(&RenderConfig {
            log_every: 2,
            ..Default::default()
        });

        for _ in 0..5 {
            let view = FrameView::from_state(&state, bloom());
            renderer.render(&view, &camera).unwrap();
        }
        assert_eq!(renderer.frames_rendered(), 5);

        renderer.resize(Viewport::new(640, 480));
        assert_eq!(renderer.viewport(), Viewport::new(640, 480));
    }
}
