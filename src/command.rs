//! Command interface between the UI shell and the scene
//!
//! Hand samples travel over a `watch` channel: last write wins, and the
//! animator reads whatever is newest each frame. Everything else is a
//! queued `SceneCommand`.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::assets::{ImageLoader, MemoryTexture};
use crate::error::AssetError;
use crate::tracking::HandSample;

/// Latest hand reading as seen by the animator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandSignal {
    Present(HandSample),
    Absent,
}

impl HandSignal {
    pub fn sample(&self) -> Option<HandSample> {
        match self {
            HandSignal::Present(s) => Some(*s),
            HandSignal::Absent => None,
        }
    }
}

/// Queued commands handled by the render loop
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// A memory image finished loading
    InsertMemory(MemoryTexture),
    /// Flip UI chrome visibility
    ToggleUi,
    /// Output viewport changed
    Resize { width: u32, height: u32 },
}

/// Cloneable handle used by the UI shell and the gesture sampler
#[derive(Clone)]
pub struct SceneHandle {
    hand_tx: Arc<watch::Sender<HandSignal>>,
    command_tx: mpsc::UnboundedSender<SceneCommand>,
    loader: Arc<dyn ImageLoader>,
}

/// Receiving side, owned by the render loop
pub struct SceneInbox {
    hand_rx: watch::Receiver<HandSignal>,
    command_rx: mpsc::UnboundedReceiver<SceneCommand>,
}

/// Create a connected handle/inbox pair
pub fn scene_channel(loader: Arc<dyn ImageLoader>) -> (SceneHandle, SceneInbox) {
    let (hand_tx, hand_rx) = watch::channel(HandSignal::Absent);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    (
        SceneHandle {
            hand_tx: Arc::new(hand_tx),
            command_tx,
            loader,
        },
        SceneInbox {
            hand_rx,
            command_rx,
        },
    )
}

impl SceneHandle {
    /// Overwrite the latest hand sample. `x`, `y` are normalized to [0, 1].
    pub fn update_hand_interaction(&self, x: f32, y: f32, pinching: bool) {
        self.hand_tx
            .send_replace(HandSignal::Present(HandSample::new(x, y, pinching)));
    }

    pub fn update_hand(&self, sample: HandSample) {
        self.hand_tx.send_replace(HandSignal::Present(sample));
    }

    /// Report that no hand is visible.
    pub fn hand_absent(&self) {
        self.hand_tx.send_replace(HandSignal::Absent);
    }

    /// Load an image in the background and add it as a memory panel.
    ///
    /// Returns immediately. A failed load is logged and no panel appears.
    /// Must be called from within a tokio runtime.
    pub fn add_memory(&self, url: impl Into<String>) {
        let url = url.into();
        let loader = Arc::clone(&self.loader);
        let command_tx = self.command_tx.clone();

        tokio::spawn(async move {
            let load_url = url.clone();
            let result = tokio::task::spawn_blocking(move || loader.load(&load_url))
                .await
                .map_err(|e| AssetError::Task(e.to_string()))
                .and_then(|r| r);

            match result {
                Ok(texture) => {
                    tracing::info!(
                        "Memory loaded: {} ({}x{})",
                        url,
                        texture.width,
                        texture.height
                    );
                    if command_tx.send(SceneCommand::InsertMemory(texture)).is_err() {
                        tracing::debug!("Scene gone before memory {} arrived", url);
                    }
                }
                Err(e) => tracing::warn!("Failed to load memory {}: {}", url, e),
            }
        });
    }

    pub fn toggle_ui(&self) {
        self.send(SceneCommand::ToggleUi);
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.send(SceneCommand::Resize { width, height });
    }

    fn send(&self, command: SceneCommand) {
        if self.command_tx.send(command).is_err() {
            tracing::debug!("Scene command dropped: render loop stopped");
        }
    }
}

impl SceneInbox {
    /// Newest hand signal, possibly stale.
    pub fn latest_hand(&self) -> HandSignal {
        *self.hand_rx.borrow()
    }

    /// Take every queued command without waiting.
    pub fn drain(&mut self) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = self.command_rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    /// Wait for the next queued command.
    pub async fn recv(&mut self) -> Option<SceneCommand> {
        self.command_rx.recv().await
    }
}
