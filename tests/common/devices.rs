use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use attention_monitor::error::{CaptureError, ProviderError};
use attention_monitor::ports::{
    AlertSink, CaptureDevice, Frame, LandmarkProvider, ProviderOptions, StatusSink,
};
use attention_monitor::status::Status;
use attention_monitor::vision::LandmarkSet;

/// Blank frames at a fixed resolution.
#[derive(Debug, Clone, Default)]
pub struct FakeCamera {
    pub deny_access: bool,
    pub closed: Arc<AtomicBool>,
}

impl FakeCamera {
    pub fn denied() -> Self {
        Self {
            deny_access: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CaptureDevice for FakeCamera {
    async fn open(&mut self) -> Result<(u32, u32), CaptureError> {
        if self.deny_access {
            return Err(CaptureError::PermissionDenied);
        }
        Ok((64, 48))
    }

    async fn frame(&mut self) -> Result<Frame, CaptureError> {
        Ok(Frame::new(64, 48))
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Plays `frames` in order, then repeats the last one.
#[derive(Debug)]
pub struct ScriptedProvider {
    frames: Vec<Vec<LandmarkSet>>,
    cursor: AtomicUsize,
    pub options: Arc<Mutex<Option<ProviderOptions>>>,
}

impl ScriptedProvider {
    pub fn new(frames: Vec<Vec<LandmarkSet>>) -> Self {
        Self {
            frames,
            cursor: AtomicUsize::new(0),
            options: Arc::default(),
        }
    }

    pub fn constant(faces: Vec<LandmarkSet>) -> Self {
        Self::new(vec![faces])
    }
}

#[async_trait]
impl LandmarkProvider for ScriptedProvider {
    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError> {
        *self.options.lock().unwrap() = Some(*options);
        Ok(())
    }

    async fn infer(&self, _frame: &Frame) -> Result<Vec<LandmarkSet>, ProviderError> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        let last = self.frames.len().saturating_sub(1);
        Ok(self.frames.get(index.min(last)).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAlerts {
    pub played_at: Arc<Mutex<Vec<Instant>>>,
}

impl RecordingAlerts {
    pub fn count(&self) -> usize {
        self.played_at.lock().unwrap().len()
    }
}

impl AlertSink for RecordingAlerts {
    fn play(&mut self) {
        self.played_at.lock().unwrap().push(Instant::now());
    }
}

/// Alert sink whose `play` panics, taking the alert loop down with it.
#[derive(Debug, Default)]
pub struct BrokenSpeaker;

impl AlertSink for BrokenSpeaker {
    fn play(&mut self) {
        panic!("speaker unplugged");
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingStatus {
    pub shown: Arc<Mutex<Vec<Status>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingStatus {
    pub fn last(&self) -> Option<Status> {
        self.shown.lock().unwrap().last().copied()
    }
}

impl StatusSink for RecordingStatus {
    fn show(&mut self, status: Status) {
        self.shown.lock().unwrap().push(status);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
