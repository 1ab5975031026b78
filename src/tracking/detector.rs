//! The external hand-landmark detector seam

use super::landmarks::HandLandmarks;
use crate::error::TrackingError;

/// Result of one detector poll
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    NoHand,
    Hand(HandLandmarks),
}

/// A source of hand landmarks.
///
/// `initialize` is called once before polling starts; a failure there is
/// terminal for the session. `detect` is polled once per gesture tick and
/// must not block.
pub trait HandDetector: Send {
    fn initialize(&mut self) -> Result<(), TrackingError>;

    fn detect(&mut self) -> Result<Detection, TrackingError>;

    /// Release any resources held by the detector.
    fn shutdown(&mut self) {}

    fn name(&self) -> &str;
}

/// Detector that never sees a hand; used when tracking is disabled.
#[derive(Debug, Default)]
pub struct NullDetector;

impl HandDetector for NullDetector {
    fn initialize(&mut self) -> Result<(), TrackingError> {
        Ok(())
    }

    fn detect(&mut self) -> Result<Detection, TrackingError> {
        Ok(Detection::NoHand)
    }

    fn name(&self) -> &str {
        "null"
    }
}

impl HandDetector for Box<dyn HandDetector> {
    fn initialize(&mut self) -> Result<(), TrackingError> {
        (**self).initialize()
    }

    fn detect(&mut self) -> Result<Detection, TrackingError> {
        (**self).detect()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
