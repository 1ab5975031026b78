//! Gesture sampler
//!
//! Polls the hand detector at a fixed rate, reduces each detection to a
//! [`HandSample`] and overwrites the scene's latest hand signal. It never
//! waits on the scene.

use std::time::Duration;

use tokio::sync::{broadcast, watch};

use super::detector::{Detection, HandDetector};
use super::landmarks::HandSample;
use crate::command::SceneHandle;
use crate::config::GestureConfig;
use crate::error::TrackingError;

/// Health of the gesture subsystem, for display
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingStatus {
    Disabled,
    Starting,
    Active,
    /// Initialization failed; tracking is off for the rest of the session
    Unavailable(String),
    Stopped,
}

impl TrackingStatus {
    /// User-facing status line
    pub fn message(&self) -> String {
        match self {
            TrackingStatus::Disabled => "Hand tracking disabled".to_string(),
            TrackingStatus::Starting => "Starting hand tracking...".to_string(),
            TrackingStatus::Active => "Hand tracking active".to_string(),
            TrackingStatus::Unavailable(reason) => reason.clone(),
            TrackingStatus::Stopped => "Hand tracking stopped".to_string(),
        }
    }
}

/// Bridges a [`HandDetector`] to the scene
pub struct GestureSampler<D> {
    detector: D,
    handle: SceneHandle,
    pinch_threshold: f32,
    hand_visible: bool,
}

impl<D: HandDetector> GestureSampler<D> {
    pub fn new(detector: D, handle: SceneHandle, config: &GestureConfig) -> Self {
        Self {
            detector,
            handle,
            pinch_threshold: config.pinch_threshold,
            hand_visible: false,
        }
    }

    pub fn initialize(&mut self) -> Result<(), TrackingError> {
        self.detector.initialize()
    }

    /// Poll the detector once and forward the result.
    ///
    /// Returns the sample sent, or `None` when no hand was seen. Detector
    /// errors are logged and send nothing, so the scene keeps its last signal.
    pub fn sample_once(&mut self) -> Option<HandSample> {
        match self.detector.detect() {
            Ok(Detection::Hand(hand)) => {
                let sample = hand.to_sample(self.pinch_threshold);
                if !self.hand_visible {
                    tracing::debug!("Hand detected");
                    self.hand_visible = true;
                }
                self.handle.update_hand(sample);
                Some(sample)
            }
            Ok(Detection::NoHand) => {
                if self.hand_visible {
                    tracing::debug!("Hand lost");
                    self.hand_visible = false;
                }
                self.handle.hand_absent();
                None
            }
            Err(e) => {
                tracing::debug!("{} detector error: {}", self.detector.name(), e);
                None
            }
        }
    }

    /// Run until `shutdown_rx` fires.
    ///
    /// An initialization failure publishes `Unavailable` and returns at once;
    /// there is no retry.
    pub async fn run(
        mut self,
        poll_hz: u32,
        status_tx: watch::Sender<TrackingStatus>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        status_tx.send_replace(TrackingStatus::Starting);

        if let Err(e) = self.initialize() {
            tracing::warn!("Hand tracking disabled for this session: {}", e);
            status_tx.send_replace(TrackingStatus::Unavailable(e.to_string()));
            return;
        }

        tracing::info!(
            "Gesture sampler started ({} detector, {} Hz, pinch < {})",
            self.detector.name(),
            poll_hz,
            self.pinch_threshold
        );
        status_tx.send_replace(TrackingStatus::Active);

        let period = Duration::from_secs_f64(1.0 / poll_hz.max(1) as f64);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sample_once();
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Gesture sampler shutting down");
                    break;
                }
            }
        }

        self.detector.shutdown();
        status_tx.send_replace(TrackingStatus::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{scene_channel, test_support::SlowLoader, HandSignal};
    use crate::tracking::landmarks::test_support::hand;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Replays a scripted sequence of detections, then reports no hand.
    struct ScriptedDetector {
        script: VecDeque<Result<Detection, TrackingError>>,
        fail_init: bool,
    }

    impl ScriptedDetector {
        fn new(script: Vec<Result<Detection, TrackingError>>) -> Self {
            Self {
                script: script.into(),
                fail_init: false,
            }
        }
    }

    impl HandDetector for ScriptedDetector {
        fn initialize(&mut self) -> Result<(), TrackingError> {
            if self.fail_init {
                Err(TrackingError::Unavailable("camera permission denied".to_string()))
            } else {
                Ok(())
            }
        }

        fn detect(&mut self) -> Result<Detection, TrackingError> {
            self.script.pop_front().unwrap_or(Ok(Detection::NoHand))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn loader() -> Arc<SlowLoader> {
        Arc::new(SlowLoader(Duration::ZERO))
    }

    #[test]
    fn test_sample_once_forwards_palm_and_pinch() {
        let (handle, inbox) = scene_channel(loader());
        let mut sampler = GestureSampler::new(
            ScriptedDetector::new(vec![Ok(Detection::Hand(hand((0.25, 0.75), 0.01)))]),
            handle,
            &GestureConfig::default(),
        );

        let sample = sampler.sample_once().unwrap();
        assert!(sample.pinching);
        assert_eq!(inbox.latest_hand(), HandSignal::Present(sample));
        assert!((sample.position.x - 0.25).abs() < 1e-6);
        assert!((sample.position.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_no_hand_reports_absent() {
        let (handle, inbox) = scene_channel(loader());
        let mut sampler = GestureSampler::new(
            ScriptedDetector::new(vec![
                Ok(Detection::Hand(hand((0.5, 0.5), 0.2))),
                Ok(Detection::NoHand),
            ]),
            handle,
            &GestureConfig::default(),
        );

        assert!(sampler.sample_once().is_some());
        assert!(sampler.sample_once().is_none());
        assert_eq!(inbox.latest_hand(), HandSignal::Absent);
    }

    #[test]
    fn test_detector_error_keeps_last_signal() {
        let (handle, inbox) = scene_channel(loader());
        let mut sampler = GestureSampler::new(
            ScriptedDetector::new(vec![
                Ok(Detection::Hand(hand((0.5, 0.5), 0.2))),
                Err(TrackingError::MpParse("bad".to_string())),
            ]),
            handle,
            &GestureConfig::default(),
        );

        let first = sampler.sample_once().unwrap();
        assert!(sampler.sample_once().is_none());
        assert_eq!(inbox.latest_hand(), HandSignal::Present(first));
    }

    #[tokio::test]
    async fn test_init_failure_is_terminal() {
        let (handle, _inbox) = scene_channel(loader());
        let mut detector = ScriptedDetector::new(Vec::new());
        detector.fail_init = true;
        let sampler = GestureSampler::new(detector, handle, &GestureConfig::default());

        let (status_tx, status_rx) = watch::channel(TrackingStatus::Disabled);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        // Returns without waiting for shutdown
        sampler.run(60, status_tx, shutdown_rx).await;

        let status = status_rx.borrow().clone();
        match status {
            TrackingStatus::Unavailable(msg) => assert!(msg.contains("camera permission denied")),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (handle, inbox) = scene_channel(loader());
        let sampler = GestureSampler::new(
            ScriptedDetector::new(vec![Ok(Detection::Hand(hand((0.1, 0.1), 0.5)))]),
            handle,
            &GestureConfig::default(),
        );

        let (status_tx, status_rx) = watch::channel(TrackingStatus::Disabled);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(sampler.run(200, status_tx, shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*status_rx.borrow(), TrackingStatus::Active);

        shutdown_tx.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(*status_rx.borrow(), TrackingStatus::Stopped);
        // The script ran out after the first hand, so the last signal is absence
        assert_eq!(inbox.latest_hand(), HandSignal::Absent);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            TrackingStatus::Unavailable("Hand tracking unavailable: no camera".to_string()).message(),
            "Hand tracking unavailable: no camera"
        );
        assert_eq!(TrackingStatus::Active.message(), "Hand tracking active");
    }
}
