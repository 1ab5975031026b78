//! MediaPipe hand tracking receiver
//!
//! Receives JSON-over-UDP packets from the hand tracker helper script and
//! serves the newest detection to the gesture sampler.

use serde::Deserialize;
use std::net::UdpSocket;

use super::detector::{Detection, HandDetector};
use super::landmarks::{HandLandmarks, Landmark};
use crate::config::MediaPipeConfig;
use crate::error::TrackingError;

/// A single JSON packet from the hand tracker
#[derive(Debug, Clone, Deserialize)]
pub struct MpHandPacket {
    /// Whether a hand was detected this frame
    pub hand_detected: bool,
    /// Landmarks of the first detected hand, normalized image space
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    /// "Left" or "Right" as reported by the landmarker
    #[serde(default)]
    pub handedness: Option<String>,
}

impl MpHandPacket {
    pub fn into_detection(self) -> Result<Detection, TrackingError> {
        if !self.hand_detected {
            return Ok(Detection::NoHand);
        }
        let hand = HandLandmarks::new(self.landmarks)
            .map_err(|e| TrackingError::MpParse(e.to_string()))?;
        Ok(Detection::Hand(hand))
    }
}

/// Parse one datagram into a detection.
pub fn parse_packet(bytes: &[u8]) -> Result<Detection, TrackingError> {
    let packet: MpHandPacket = serde_json::from_slice(bytes)
        .map_err(|e| TrackingError::MpParse(format!("JSON parse error: {}", e)))?;
    packet.into_detection()
}

/// MediaPipe JSON-over-UDP hand receiver
pub struct MpHandReceiver {
    config: MediaPipeConfig,
    socket: Option<UdpSocket>,
    latest: Detection,
    packets: u64,
}

impl MpHandReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &MediaPipeConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
            latest: Detection::NoHand,
            packets: 0,
        }
    }

    /// Number of well-formed packets received so far
    pub fn packets_received(&self) -> u64 {
        self.packets
    }

    /// Local address the socket is bound to, once initialized
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}

impl HandDetector for MpHandReceiver {
    fn initialize(&mut self) -> Result<(), TrackingError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).map_err(|e| {
            TrackingError::Unavailable(format!("Failed to bind to {}: {}", addr, e))
        })?;

        socket.set_nonblocking(true).map_err(|e| {
            TrackingError::Unavailable(format!("Failed to set non-blocking: {}", e))
        })?;

        tracing::info!("MediaPipe hand receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Drain every pending datagram; the newest well-formed one wins.
    fn detect(&mut self) -> Result<Detection, TrackingError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => {
                return Err(TrackingError::MpReceiver(
                    "Receiver not initialized".to_string(),
                ))
            }
        };

        let mut buf = [0u8; 65536];
        let mut last_error = None;

        loop {
            match socket.recv(&mut buf) {
                Ok(size) if size > 0 => match parse_packet(&buf[..size]) {
                    Ok(detection) => {
                        self.latest = detection;
                        self.packets += 1;
                        last_error = None;
                    }
                    Err(e) => last_error = Some(e),
                },
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    return Err(TrackingError::MpReceiver(format!("Receive error: {}", e)));
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(self.latest.clone()),
        }
    }

    fn shutdown(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!("MediaPipe hand receiver stopped");
        }
    }

    fn name(&self) -> &str {
        "mediapipe"
    }
}
