//! Hand landmark model (MediaPipe 21-point hand topology)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
/// Middle finger MCP; used as the palm centre.
pub const PALM_CENTER: usize = 9;

/// Number of landmarks in a complete hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A single landmark in normalized image space ([0, 1]², z is relative depth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// One detected hand. Always holds at least 21 landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self, TrackingError> {
        if points.len() < HAND_LANDMARK_COUNT {
            return Err(TrackingError::TooFewLandmarks {
                expected: HAND_LANDMARK_COUNT,
                got: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    fn at(&self, index: usize) -> Landmark {
        // In range for every named index by construction.
        self.points[index]
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.at(THUMB_TIP)
    }

    pub fn index_tip(&self) -> Landmark {
        self.at(INDEX_TIP)
    }

    pub fn palm_center(&self) -> Landmark {
        self.at(PALM_CENTER)
    }

    /// Thumb-tip to index-tip distance in normalized image space (x, y only).
    pub fn pinch_distance(&self) -> f32 {
        self.thumb_tip().xy().distance(self.index_tip().xy())
    }

    /// Pinching when the pinch distance is strictly below `threshold`.
    pub fn is_pinching(&self, threshold: f32) -> bool {
        self.pinch_distance() < threshold
    }

    /// Reduce to the sample the scene consumes.
    pub fn to_sample(&self, pinch_threshold: f32) -> HandSample {
        let palm = self.palm_center();
        HandSample::new(palm.x, palm.y, self.is_pinching(pinch_threshold))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Latest gesture reading: normalized palm position plus pinch flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub position: Vec2,
    pub pinching: bool,
}

impl HandSample {
    /// Position components are clamped into [0, 1].
    pub fn new(x: f32, y: f32, pinching: bool) -> Self {
        Self {
            position: Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
            pinching,
        }
    }
}
