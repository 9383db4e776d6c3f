use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{mpsc, watch, Mutex};

use crate::error::TickError;
use crate::ports::{CaptureDevice, LandmarkProvider, RenderSurface};
use crate::status::Status;
use crate::vision::{overlay, Classifier, FrameAnalysis};

/// Pulls one frame, runs the landmark provider, classifies, redraws.
///
/// At most one tick is in flight; a tick that starts while another is still
/// waiting on the provider returns [`TickError::Overrun`] without touching
/// any collaborator.
pub struct FrameDriver {
    capture: Mutex<Box<dyn CaptureDevice>>,
    provider: Box<dyn LandmarkProvider>,
    surface: Mutex<Box<dyn RenderSurface>>,
    classifier: Classifier,
    status_tx: watch::Sender<Option<Status>>,
    urgent_tx: Option<mpsc::Sender<Status>>,
    in_flight: AtomicBool,
    stats: DriverStats,
}

#[derive(Debug, Default)]
pub struct DriverStats {
    pub classified: AtomicU64,
    pub overruns: AtomicU64,
    pub failures: AtomicU64,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl FrameDriver {
    pub fn new(
        capture: Box<dyn CaptureDevice>,
        provider: Box<dyn LandmarkProvider>,
        surface: Box<dyn RenderSurface>,
        classifier: Classifier,
        status_tx: watch::Sender<Option<Status>>,
    ) -> Self {
        Self {
            capture: Mutex::new(capture),
            provider,
            surface: Mutex::new(surface),
            classifier,
            status_tx,
            urgent_tx: None,
            in_flight: AtomicBool::new(false),
            stats: DriverStats::default(),
        }
    }

    /// Forward every MultiFace frame to the alert path immediately.
    pub fn with_urgent_alerts(mut self, urgent_tx: mpsc::Sender<Status>) -> Self {
        self.urgent_tx = Some(urgent_tx);
        self
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub async fn tick(&self) -> Result<FrameAnalysis, TickError> {
        let Some(_guard) = self.try_begin() else {
            let total = self.stats.overruns.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(overruns = total, "Skipping frame: previous inference still in progress");
            return Err(TickError::Overrun);
        };

        let result = self.run_once().await;
        match &result {
            Ok(_) => self.stats.classified.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.stats.failures.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    /// Closes the capture device once in-flight captures are done.
    pub async fn release(&self) {
        self.capture.lock().await.close().await;
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    async fn run_once(&self) -> Result<FrameAnalysis, TickError> {
        let frame = self.capture.lock().await.frame().await?;
        let faces = self.provider.infer(&frame).await?;

        let analysis = self.classifier.analyze(&faces);
        self.status_tx.send_replace(Some(analysis.status));

        if analysis.status == Status::MultiFace {
            if let Some(tx) = &self.urgent_tx {
                // full channel: an urgent alert is already pending
                let _ = tx.try_send(analysis.status);
            }
        }

        let mut surface = self.surface.lock().await;
        overlay::render(&mut **surface, &frame, &faces);

        Ok(analysis)
    }
}
