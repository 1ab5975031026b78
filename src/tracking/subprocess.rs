//! Hand tracker subprocess
//!
//! Launches the MediaPipe hand tracker helper as a child process that is
//! killed when dropped. The helper is started once; a crash is not retried.

use tokio::process::{Child, Command};

use crate::config::MediaPipeConfig;
use crate::error::TrackingError;

/// Manages the MediaPipe hand tracker subprocess
pub struct MpHandSubprocess {
    child: Option<Child>,
    config: MediaPipeConfig,
}

impl MpHandSubprocess {
    /// Create a new subprocess manager (does not start the process)
    pub fn new(config: &MediaPipeConfig) -> Self {
        Self {
            child: None,
            config: config.clone(),
        }
    }

    /// Command line for the helper, without the interpreter.
    pub fn args(&self) -> Vec<String> {
        vec![
            self.config.tracker_script.clone(),
            "--ip".to_string(),
            self.config.listen_address.clone(),
            "--port".to_string(),
            self.config.port.to_string(),
            "--capture".to_string(),
            self.config.camera_device.to_string(),
            "--width".to_string(),
            self.config.capture_width.to_string(),
            "--height".to_string(),
            self.config.capture_height.to_string(),
            "--fps".to_string(),
            self.config.capture_fps.to_string(),
            "--max-hands".to_string(),
            self.config.max_hands.to_string(),
        ]
    }

    /// Launch the hand tracker subprocess.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), TrackingError> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new("python3")
            .args(self.args())
            .kill_on_drop(true)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| {
                TrackingError::MpSubprocess(format!(
                    "Failed to launch hand tracker at '{}': {}",
                    self.config.tracker_script, e
                ))
            })?;

        tracing::info!(
            "Hand tracker subprocess started (pid: {:?}, camera: {}, port: {})",
            child.id(),
            self.config.camera_device,
            self.config.port,
        );

        self.child = Some(child);
        Ok(())
    }

    /// Check if the subprocess is still running (non-blocking)
    pub fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    tracing::warn!("Hand tracker subprocess exited with: {}", status);
                    self.child = None;
                    false
                }
                Err(e) => {
                    tracing::error!("Failed to check hand tracker status: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    /// Stop the subprocess by killing it
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("Stopping hand tracker subprocess (pid: {:?})", child.id());
            let _ = child.kill().await;
            let _ = child.wait().await;
        }
    }
}
