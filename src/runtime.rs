//! Scene runtime: the render loop and the gesture loop
//!
//! The two loops run as independent tokio tasks. They share nothing but the
//! scene channel; the render loop reads the newest hand signal each frame
//! and never waits on the gesture loop. Both stop on one broadcast signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::assets::ImageLoader;
use crate::command::{scene_channel, SceneCommand, SceneHandle, SceneInbox};
use crate::config::Config;
use crate::render::{BloomSettings, Camera, FrameView, SceneRenderer, Viewport};
use crate::scene::AnimatorState;
use crate::tracking::{GestureSampler, HandDetector, TrackingStatus};

/// Owns the animator and drives one frame per tick
pub struct RenderLoop<R> {
    state: AnimatorState,
    inbox: SceneInbox,
    renderer: R,
    camera: Camera,
    bloom: BloomSettings,
    render_errors: u64,
}

impl<R: SceneRenderer> RenderLoop<R> {
    pub fn new(config: &Config, inbox: SceneInbox, mut renderer: R) -> Self {
        let viewport = Viewport::new(config.render.width, config.render.height);
        renderer.resize(viewport);

        Self {
            state: AnimatorState::new(config),
            inbox,
            renderer,
            camera: Camera::from_config(&config.render),
            bloom: BloomSettings {
                strength: config.render.bloom_strength,
                radius: config.render.bloom_radius,
                threshold: config.render.bloom_threshold,
            },
            render_errors: 0,
        }
    }

    /// Advance the animator, apply queued commands and draw one frame.
    ///
    /// Commands land after the update so a new memory panel is born at this
    /// frame's `elapsed` and is first drawn fully transparent.
    pub fn tick(&mut self, elapsed: f32) {
        self.state.update(elapsed, self.inbox.latest_hand());

        for command in self.inbox.drain() {
            match command {
                SceneCommand::Resize { width, height } => {
                    let viewport = Viewport::new(width, height);
                    self.camera.resize(viewport);
                    self.renderer.resize(viewport);
                }
                other => self.state.apply(other),
            }
        }

        let frame = FrameView::from_state(&self.state, self.bloom);
        if let Err(e) = self.renderer.render(&frame, &self.camera) {
            self.render_errors += 1;
            tracing::error!("{} renderer failed on frame {}: {}", self.renderer.name(), frame.frame, e);
        }
    }

    pub fn state(&self) -> &AnimatorState {
        &self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render_errors(&self) -> u64 {
        self.render_errors
    }

    /// Tick at `fps` until `shutdown_rx` fires; returns the loop for inspection.
    pub async fn run(mut self, fps: u32, mut shutdown_rx: broadcast::Receiver<()>) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let start = Instant::now();

        tracing::info!("Render loop started ({} renderer, {} fps)", self.renderer.name(), fps);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(start.elapsed().as_secs_f32());
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!(
                        "Render loop shutting down after {} frames",
                        self.state.frame()
                    );
                    break;
                }
            }
        }

        self
    }
}

/// Running scene: both loops plus the handle to talk to them
pub struct SceneRuntime<R> {
    handle: SceneHandle,
    shutdown_tx: broadcast::Sender<()>,
    status_rx: watch::Receiver<TrackingStatus>,
    render_task: JoinHandle<RenderLoop<R>>,
    gesture_task: Option<JoinHandle<()>>,
}

impl<R: SceneRenderer + 'static> SceneRuntime<R> {
    /// Spawn the render loop and, when a detector is given and gestures are
    /// enabled, the gesture loop. Must be called from within a tokio runtime.
    pub fn start<D>(
        config: &Config,
        detector: Option<D>,
        renderer: R,
        loader: Arc<dyn ImageLoader>,
    ) -> Self
    where
        D: HandDetector + 'static,
    {
        let (handle, inbox) = scene_channel(loader);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (status_tx, status_rx) = watch::channel(TrackingStatus::Disabled);

        let render_loop = RenderLoop::new(config, inbox, renderer);
        let render_task = tokio::spawn(render_loop.run(config.render.fps, shutdown_tx.subscribe()));

        let gesture_task = match detector {
            Some(detector) if config.gesture.enabled => {
                let sampler = GestureSampler::new(detector, handle.clone(), &config.gesture);
                Some(tokio::spawn(sampler.run(
                    config.gesture.poll_hz,
                    status_tx,
                    shutdown_tx.subscribe(),
                )))
            }
            _ => {
                tracing::info!("Hand tracking disabled; scene runs without gesture input");
                None
            }
        };

        Self {
            handle,
            shutdown_tx,
            status_rx,
            render_task,
            gesture_task,
        }
    }

    /// Handle for the UI shell
    pub fn handle(&self) -> SceneHandle {
        self.handle.clone()
    }

    /// Watch the gesture subsystem status
    pub fn tracking_status(&self) -> watch::Receiver<TrackingStatus> {
        self.status_rx.clone()
    }

    /// Subscribe to the shutdown signal (for input listeners tied to the scene)
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal both loops to stop and wait for them.
    pub async fn shutdown(self) -> Option<RenderLoop<R>> {
        let _ = self.shutdown_tx.send(());

        if let Some(task) = self.gesture_task {
            if let Err(e) = task.await {
                tracing::error!("Gesture loop ended abnormally: {}", e);
            }
        }

        match self.render_task.await {
            Ok(render_loop) => Some(render_loop),
            Err(e) => {
                tracing::error!("Render loop ended abnormally: {}", e);
                None
            }
        }
    }
}
