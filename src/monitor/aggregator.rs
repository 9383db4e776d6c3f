use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::monitor::alert::{AlertOutcome, AlertTrigger};
use crate::status::{AlertSet, Status};

/// Per-status sample counts for the current window.
///
/// `total()` always equals the number of `sample` calls since the last
/// `evaluate_and_reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusWindow {
    counts: [u32; Status::COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub status: Status,
    pub count: u32,
    pub samples: u32,
}

impl StatusWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, status: Status) {
        self.counts[status.index()] = self.counts[status.index()].saturating_add(1);
    }

    pub fn count(&self, status: Status) -> u32 {
        self.counts[status.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    /// Modal status of the window, then clears it.
    ///
    /// Ties go to the status declared first in [`Status`]. An empty window
    /// has no mode.
    pub fn evaluate_and_reset(&mut self) -> Option<WindowSummary> {
        let samples = self.total();
        let mut best: Option<(Status, u32)> = None;
        for status in Status::ALL {
            let count = self.count(status);
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((status, count));
            }
        }
        self.counts = [0; Status::COUNT];

        best.map(|(status, count)| WindowSummary {
            status,
            count,
            samples,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowReport {
    pub summary: Option<WindowSummary>,
    pub alert: AlertOutcome,
}

/// Majority filter over the noisy per-frame status.
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    window: StatusWindow,
    alert_statuses: AlertSet,
    trigger: AlertTrigger,
}

impl StatusAggregator {
    pub fn new(alert_statuses: AlertSet, cooldown: Duration) -> Self {
        Self {
            window: StatusWindow::new(),
            alert_statuses,
            trigger: AlertTrigger::new(cooldown),
        }
    }

    pub fn window(&self) -> &StatusWindow {
        &self.window
    }

    pub fn sample(&mut self, status: Status) {
        self.window.sample(status);
    }

    pub fn evaluate(&mut self, now: Instant) -> WindowReport {
        let summary = self.window.evaluate_and_reset();
        let alert = match summary {
            Some(s) => self.alert_for(s.status, now),
            None => AlertOutcome::NotRequired,
        };
        WindowReport { summary, alert }
    }

    /// Alert for a single frame, bypassing the window. Shares the cooldown.
    pub fn urgent(&mut self, status: Status, now: Instant) -> AlertOutcome {
        self.alert_for(status, now)
    }

    fn alert_for(&mut self, status: Status, now: Instant) -> AlertOutcome {
        if self.alert_statuses.contains(status) {
            self.trigger.fire(now)
        } else {
            AlertOutcome::NotRequired
        }
    }
}
