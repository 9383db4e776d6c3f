//! Recorded landmark sessions played back as a capture device + provider.
//!
//! File format:
//! `{ "width": 640, "height": 480, "frames": [[<face>, ...], ...] }`
//! where each face is an array of 468 or 478 `{ "x", "y" }` points.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CaptureError, ProviderError};
use crate::ports::{CaptureDevice, Frame, LandmarkProvider, ProviderOptions};
use crate::vision::LandmarkSet;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("replay parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("replay resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySession {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Vec<LandmarkSet>>,
}

impl ReplaySession {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let session: Self = serde_json::from_slice(&raw)?;
        if session.width == 0 || session.height == 0 {
            return Err(ReplayError::InvalidResolution {
                width: session.width,
                height: session.height,
            });
        }
        tracing::info!(
            path = %path.as_ref().display(),
            frames = session.frames.len(),
            width = session.width,
            height = session.height,
            "Replay session loaded"
        );
        Ok(session)
    }

    /// Capture device and provider sharing this session.
    pub fn into_parts(self, looped: bool) -> (ReplayCapture, ReplayProvider) {
        let capture = ReplayCapture {
            width: self.width,
            height: self.height,
            open: false,
        };
        let provider = ReplayProvider {
            frames: self.frames,
            cursor: AtomicUsize::new(0),
            looped,
            configured: false,
        };
        (capture, provider)
    }
}

/// Emits blank frames at the recorded resolution.
#[derive(Debug)]
pub struct ReplayCapture {
    width: u32,
    height: u32,
    open: bool,
}

#[async_trait]
impl CaptureDevice for ReplayCapture {
    async fn open(&mut self) -> Result<(u32, u32), CaptureError> {
        self.open = true;
        Ok((self.width, self.height))
    }

    async fn frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.open {
            return Err(CaptureError::Disconnected);
        }
        Ok(Frame::new(self.width, self.height))
    }

    async fn close(&mut self) {
        self.open = false;
    }
}

/// Returns the recorded faces one frame per call.
#[derive(Debug)]
pub struct ReplayProvider {
    frames: Vec<Vec<LandmarkSet>>,
    cursor: AtomicUsize,
    looped: bool,
    configured: bool,
}

impl ReplayProvider {
    fn next_faces(&self) -> Vec<LandmarkSet> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        let index = if self.looped {
            index % self.frames.len()
        } else {
            index
        };
        self.frames.get(index).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LandmarkProvider for ReplayProvider {
    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError> {
        tracing::debug!(?options, "Replay provider configured");
        self.configured = true;
        Ok(())
    }

    async fn infer(&self, _frame: &Frame) -> Result<Vec<LandmarkSet>, ProviderError> {
        if !self.configured {
            return Err(ProviderError::NotConfigured);
        }
        Ok(self.next_faces())
    }
}
