//! Collaborator ports consumed by the monitor.
//!
//! Face detection, landmark regression, camera drivers, drawing and audio
//! live behind these traits; the crate only orchestrates them.

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_FACES, DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_TRACKING_CONFIDENCE,
};
use crate::error::{CaptureError, ConfigError, ProviderError};
use crate::status::Status;
use crate::vision::LandmarkSet;

/// One captured video frame.
pub type Frame = RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    pub max_faces: u32,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_faces: DEFAULT_MAX_FACES,
            refine_landmarks: true,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl ProviderOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_faces == 0 {
            return Err(ConfigError::NoFacesAllowed);
        }
        for (field, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.max_faces == 1 {
            tracing::warn!("max_faces=1: multiple faces can never be reported");
        }
        Ok(())
    }
}

/// Face-landmark model.
#[async_trait]
pub trait LandmarkProvider: Send + Sync {
    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError>;

    /// Landmarks for every face found in `frame`; empty when none.
    async fn infer(&self, frame: &Frame) -> Result<Vec<LandmarkSet>, ProviderError>;
}

/// Camera or any other frame source.
#[async_trait]
pub trait CaptureDevice: Send {
    /// Opens the stream and returns its resolution.
    async fn open(&mut self) -> Result<(u32, u32), CaptureError>;

    async fn frame(&mut self) -> Result<Frame, CaptureError>;

    async fn close(&mut self);
}

/// 2D drawing surface sized to the capture resolution.
pub trait RenderSurface: Send {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    fn draw_frame(&mut self, frame: &Frame);

    fn fill_circle(&mut self, center: (f64, f64), radius: i32, color: Rgb<u8>);
}

/// Short audible cue. Rate limiting happens before `play` is called.
pub trait AlertSink: Send {
    fn play(&mut self);
}

/// Text display of the current status.
pub trait StatusSink: Send {
    fn show(&mut self, status: Status);

    /// Terminal message, shown once the pipeline cannot continue.
    fn show_error(&mut self, message: &str);
}
