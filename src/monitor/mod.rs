pub mod aggregator;
pub mod alert;
pub mod driver;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

pub use aggregator::{StatusAggregator, StatusWindow, WindowReport, WindowSummary};
pub use alert::{AlertOutcome, AlertTrigger};
pub use driver::FrameDriver;

use crate::config::MonitorConfig;
use crate::constants::DEVICE_UNAVAILABLE_MESSAGE;
use crate::error::{MonitorError, TickError};
use crate::ports::{AlertSink, CaptureDevice, LandmarkProvider, RenderSurface, StatusSink};
use crate::status::Status;
use crate::vision::Classifier;

/// Time allowed for in-flight frame ticks to finish after shutdown.
#[cfg(test)]
const DRAIN_TIMEOUT: Duration = Duration::from_millis(50);
#[cfg(not(test))]
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// External collaborators the monitor drives.
pub struct Collaborators {
    pub capture: Box<dyn CaptureDevice>,
    pub provider: Box<dyn LandmarkProvider>,
    pub surface: Box<dyn RenderSurface>,
    pub alert_sink: Box<dyn AlertSink>,
    pub status_sink: Box<dyn StatusSink>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub frames_classified: u64,
    pub overruns: u64,
    pub failed_ticks: u64,
    pub windows_evaluated: u64,
    pub alerts_fired: u64,
    pub alerts_suppressed: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
}

/// Runs the three periodic activities until shutdown:
/// frame capture + classification, status sampling, window evaluation.
pub struct Monitor {
    config: MonitorConfig,
    parts: Collaborators,
    shutdown_rx: broadcast::Receiver<()>,
}

impl Monitor {
    pub fn new(
        config: &MonitorConfig,
        parts: Collaborators,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            config: config.clone(),
            parts,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) -> Result<MonitorStats, MonitorError> {
        self.config.validate()?;

        let Collaborators {
            mut capture,
            mut provider,
            surface,
            alert_sink,
            mut status_sink,
        } = self.parts;

        let (width, height) = match capture.open().await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::error!(error = %e, "Capture device unavailable, monitor not started");
                status_sink.show_error(DEVICE_UNAVAILABLE_MESSAGE);
                return Err(MonitorError::DeviceUnavailable(e));
            }
        };
        tracing::info!(width, height, "Capture device opened");
        let started_at = Utc::now();

        if let Err(e) = provider.configure(&self.config.provider).await {
            tracing::error!(error = %e, "Landmark provider configuration failed");
            capture.close().await;
            return Err(e.into());
        }

        let (status_tx, status_rx) = watch::channel(None);
        let (urgent_tx, urgent_rx) = mpsc::channel(1);

        let mut driver = FrameDriver::new(
            capture,
            provider,
            surface,
            Classifier::new(self.config.classifier),
            status_tx,
        );
        if self.config.multi_face_immediate_alert {
            driver = driver.with_urgent_alerts(urgent_tx);
        }
        let driver = Arc::new(driver);

        let (stop_tx, _) = broadcast::channel::<()>(1);

        let frames = tokio::spawn(frame_loop(
            driver.clone(),
            self.config.frame_interval(),
            stop_tx.subscribe(),
        ));
        let alerts = tokio::spawn(
            AlertLoop {
                aggregator: StatusAggregator::new(
                    self.config.alert_statuses,
                    self.config.alert_cooldown(),
                ),
                sink: alert_sink,
                status_rx: status_rx.clone(),
                urgent_rx,
                sample_interval: self.config.sample_interval(),
                window_interval: self.config.window_interval(),
            }
            .run(stop_tx.subscribe()),
        );
        let display = tokio::spawn(display_loop(status_sink, status_rx, stop_tx.subscribe()));

        tracing::info!(
            frame_ms = self.config.frame_interval_ms,
            sample_ms = self.config.sample_interval_ms,
            window_ms = self.config.window_interval_ms,
            "Monitor started"
        );

        let _ = self.shutdown_rx.recv().await;
        tracing::info!("Monitor shutting down");
        let _ = stop_tx.send(());

        let (frames, alerts, display) = tokio::join!(frames, alerts, display);
        // the capture device is released even when a loop panicked
        driver.release().await;

        frames?;
        display?;
        let alert_stats = alerts?;

        let driver_stats = driver.stats();
        let stats = MonitorStats {
            frames_classified: driver_stats.classified.load(Ordering::Relaxed),
            overruns: driver_stats.overruns.load(Ordering::Relaxed),
            failed_ticks: driver_stats.failures.load(Ordering::Relaxed),
            started_at: Some(started_at),
            stopped_at: Some(Utc::now()),
            ..alert_stats
        };
        tracing::info!(?stats, "Monitor stopped");
        Ok(stats)
    }
}

async fn frame_loop(
    driver: Arc<FrameDriver>,
    period: Duration,
    mut stop: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = stop.recv() => break,
            _ = ticker.tick() => {
                let driver = driver.clone();
                in_flight.spawn(async move {
                    match driver.tick().await {
                        Ok(analysis) => {
                            tracing::trace!(status = analysis.status.as_str(), "Frame classified");
                        }
                        Err(TickError::Overrun) => {}
                        Err(e) => tracing::warn!(error = %e, "Frame tick failed"),
                    }
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Frame tick panicked");
                }
            }
        }
    }

    let drained = time::timeout(DRAIN_TIMEOUT, async {
        while in_flight.join_next().await.is_some() {}
    })
    .await
    .is_ok();
    if !drained {
        tracing::warn!(
            pending = in_flight.len(),
            "Frame ticks still running after drain timeout, aborting"
        );
        in_flight.abort_all();
    }
}

/// Single owner of the status window and the alert cooldown.
struct AlertLoop {
    aggregator: StatusAggregator,
    sink: Box<dyn AlertSink>,
    status_rx: watch::Receiver<Option<Status>>,
    urgent_rx: mpsc::Receiver<Status>,
    sample_interval: Duration,
    window_interval: Duration,
}

impl AlertLoop {
    async fn run(mut self, mut stop: broadcast::Receiver<()>) -> MonitorStats {
        let start = Instant::now();
        let mut sample = time::interval_at(start + self.sample_interval, self.sample_interval);
        sample.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut window = time::interval_at(start + self.window_interval, self.window_interval);
        window.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = MonitorStats::default();
        let mut urgent_open = true;

        loop {
            // sampling before evaluation when both are due on the same instant
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = sample.tick() => {
                    let current = *self.status_rx.borrow();
                    if let Some(status) = current {
                        self.aggregator.sample(status);
                    }
                }
                _ = window.tick() => {
                    let report = self.aggregator.evaluate(Instant::now());
                    stats.windows_evaluated += 1;
                    match report.summary {
                        Some(summary) => tracing::info!(
                            status = summary.status.as_str(),
                            count = summary.count,
                            samples = summary.samples,
                            alert = report.alert.as_str(),
                            "Window evaluated"
                        ),
                        None => tracing::debug!("Window evaluated with no samples"),
                    }
                    self.deliver(report.alert, &mut stats);
                }
                received = self.urgent_rx.recv(), if urgent_open => match received {
                    Some(status) => {
                        let outcome = self.aggregator.urgent(status, Instant::now());
                        tracing::debug!(status = status.as_str(), alert = outcome.as_str(), "Urgent alert");
                        self.deliver(outcome, &mut stats);
                    }
                    None => urgent_open = false,
                },
            }
        }
        stats
    }

    fn deliver(&mut self, outcome: AlertOutcome, stats: &mut MonitorStats) {
        match outcome {
            AlertOutcome::Fired => {
                self.sink.play();
                stats.alerts_fired += 1;
            }
            AlertOutcome::Suppressed => stats.alerts_suppressed += 1,
            AlertOutcome::NotRequired => {}
        }
    }
}

async fn display_loop(
    mut sink: Box<dyn StatusSink>,
    mut status_rx: watch::Receiver<Option<Status>>,
    mut stop: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.recv() => break,
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status_rx.borrow_and_update();
                if let Some(status) = current {
                    sink.show(status);
                }
            }
        }
    }
}
