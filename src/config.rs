use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ALERT_COOLDOWN_MS, DEFAULT_EAR_THRESHOLD, DEFAULT_FRAME_INTERVAL_MS,
    DEFAULT_GAZE_BOTTOM_THRESHOLD, DEFAULT_GAZE_LEFT_THRESHOLD, DEFAULT_GAZE_RIGHT_THRESHOLD,
    DEFAULT_GAZE_TOP_THRESHOLD, DEFAULT_MAX_FACES, DEFAULT_MIN_DETECTION_CONFIDENCE,
    DEFAULT_MIN_TRACKING_CONFIDENCE, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_WINDOW_INTERVAL_MS,
};
use crate::error::ConfigError;
use crate::ports::ProviderOptions;
use crate::status::{AlertSet, Status};
use crate::vision::{ClassifierConfig, GazeThresholds};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub monitor: MonitorConfig,
    pub replay: ReplayConfig,
    pub run_for_secs: Option<u64>,
    pub overlay_snapshot_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub frame_interval_ms: u64,
    pub sample_interval_ms: u64,
    pub window_interval_ms: u64,
    pub alert_cooldown_ms: u64,
    pub multi_face_immediate_alert: bool,
    pub alert_statuses: AlertSet,
    pub classifier: ClassifierConfig,
    pub provider: ProviderOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    pub path: String,
    pub looped: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            window_interval_ms: DEFAULT_WINDOW_INTERVAL_MS,
            alert_cooldown_ms: DEFAULT_ALERT_COOLDOWN_MS,
            multi_face_immediate_alert: true,
            alert_statuses: AlertSet::default(),
            classifier: ClassifierConfig::default(),
            provider: ProviderOptions::default(),
        }
    }
}

impl MonitorConfig {
    /// Timer invariants: all periods non-zero, window a whole number of samples.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("frame_interval_ms", self.frame_interval_ms),
            ("sample_interval_ms", self.sample_interval_ms),
            ("window_interval_ms", self.window_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { field });
            }
        }
        if self.window_interval_ms % self.sample_interval_ms != 0 {
            return Err(ConfigError::WindowNotMultiple {
                window_ms: self.window_interval_ms,
                sample_ms: self.sample_interval_ms,
            });
        }
        self.provider.validate()
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn window_interval(&self) -> Duration {
        Duration::from_millis(self.window_interval_ms)
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_millis(self.alert_cooldown_ms)
    }

    pub fn samples_per_window(&self) -> u64 {
        self.window_interval_ms / self.sample_interval_ms.max(1)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            monitor: MonitorConfig {
                frame_interval_ms: env_or_parse("FRAME_INTERVAL_MS", DEFAULT_FRAME_INTERVAL_MS),
                sample_interval_ms: env_or_parse("SAMPLE_INTERVAL_MS", DEFAULT_SAMPLE_INTERVAL_MS),
                window_interval_ms: env_or_parse("WINDOW_INTERVAL_MS", DEFAULT_WINDOW_INTERVAL_MS),
                alert_cooldown_ms: env_or_parse("ALERT_COOLDOWN_MS", DEFAULT_ALERT_COOLDOWN_MS),
                multi_face_immediate_alert: env_or_bool("MULTI_FACE_IMMEDIATE_ALERT", true),
                alert_statuses: env_alert_set("ALERT_STATUSES"),
                classifier: ClassifierConfig {
                    ear_threshold: env_or_parse("EAR_THRESHOLD", DEFAULT_EAR_THRESHOLD),
                    gaze: GazeThresholds {
                        left: env_or_parse("GAZE_LEFT_THRESHOLD", DEFAULT_GAZE_LEFT_THRESHOLD),
                        right: env_or_parse("GAZE_RIGHT_THRESHOLD", DEFAULT_GAZE_RIGHT_THRESHOLD),
                        top: env_or_parse("GAZE_TOP_THRESHOLD", DEFAULT_GAZE_TOP_THRESHOLD),
                        bottom: env_or_parse(
                            "GAZE_BOTTOM_THRESHOLD",
                            DEFAULT_GAZE_BOTTOM_THRESHOLD,
                        ),
                    },
                },
                provider: ProviderOptions {
                    max_faces: env_or_parse("MAX_FACES", DEFAULT_MAX_FACES),
                    refine_landmarks: env_or_bool("REFINE_LANDMARKS", true),
                    min_detection_confidence: env_or_parse(
                        "MIN_DETECTION_CONFIDENCE",
                        DEFAULT_MIN_DETECTION_CONFIDENCE,
                    ),
                    min_tracking_confidence: env_or_parse(
                        "MIN_TRACKING_CONFIDENCE",
                        DEFAULT_MIN_TRACKING_CONFIDENCE,
                    ),
                },
            },
            replay: ReplayConfig {
                path: env_or("REPLAY_PATH", "./replay.json"),
                looped: env_or_bool("REPLAY_LOOP", true),
            },
            run_for_secs: env_optional_parse("RUN_FOR_SECS"),
            overlay_snapshot_path: env_optional("OVERLAY_SNAPSHOT_PATH"),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    env_optional_parse(key).unwrap_or(default)
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_optional_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_optional(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
            None
        }
    }
}

/// Comma-separated status names; unknown names are skipped with a warning.
fn env_alert_set(key: &str) -> AlertSet {
    let Some(raw) = env_optional(key) else {
        return AlertSet::default();
    };
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| match part.parse::<Status>() {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring alert status");
                None
            }
        })
        .collect()
}
