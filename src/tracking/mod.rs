//! Hand tracking
//!
//! - Landmark model and pinch classification
//! - `HandDetector` seam for the external landmark detector
//! - MediaPipe Hand Landmarker transport (JSON over loopback UDP)
//! - Gesture sampler loop feeding the scene

pub mod detector;
pub mod landmarks;
pub mod mediapipe;
pub mod sampler;
pub mod subprocess;

pub use detector::{Detection, HandDetector, NullDetector};
pub use landmarks::{HandLandmarks, HandSample, Landmark};
pub use sampler::{GestureSampler, TrackingStatus};
