use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertOutcome {
    /// The status is not in the alert set.
    NotRequired,
    Fired,
    /// Another alert fired less than one cooldown ago.
    Suppressed,
}

impl AlertOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Fired => "fired",
            Self::Suppressed => "suppressed",
        }
    }
}

/// Timestamp-based rate limiter: at most one alert per cooldown period.
#[derive(Debug, Clone)]
pub struct AlertTrigger {
    cooldown: Duration,
    cooldown_until: Option<Instant>,
}

impl AlertTrigger {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            cooldown_until: None,
        }
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        matches!(self.cooldown_until, Some(until) if now < until)
    }

    pub fn fire(&mut self, now: Instant) -> AlertOutcome {
        if self.in_cooldown(now) {
            return AlertOutcome::Suppressed;
        }
        self.cooldown_until = Some(now + self.cooldown);
        AlertOutcome::Fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_alert_inside_cooldown_is_suppressed() {
        let start = Instant::now();
        let mut trigger = AlertTrigger::new(Duration::from_millis(1000));

        assert_eq!(trigger.fire(start), AlertOutcome::Fired);
        assert_eq!(
            trigger.fire(start + Duration::from_millis(999)),
            AlertOutcome::Suppressed
        );
    }

    #[test]
    fn cooldown_clears_without_a_callback() {
        let start = Instant::now();
        let mut trigger = AlertTrigger::new(Duration::from_millis(1000));

        trigger.fire(start);
        let later = start + Duration::from_millis(1000);
        assert!(!trigger.in_cooldown(later));
        assert_eq!(trigger.fire(later), AlertOutcome::Fired);
    }

    #[test]
    fn suppressed_alert_does_not_extend_cooldown() {
        let start = Instant::now();
        let mut trigger = AlertTrigger::new(Duration::from_millis(1000));

        trigger.fire(start);
        trigger.fire(start + Duration::from_millis(500));
        assert_eq!(
            trigger.fire(start + Duration::from_millis(1000)),
            AlertOutcome::Fired
        );
    }
}
