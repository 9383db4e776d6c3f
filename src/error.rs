use thiserror::Error;

use crate::vision::LandmarkError;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture permission denied")]
    PermissionDenied,
    #[error("capture device not found: {0}")]
    NotFound(String),
    #[error("capture device disconnected")]
    Disconnected,
    #[error("capture io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("landmark provider is not configured")]
    NotConfigured,
    #[error("landmark inference failed: {0}")]
    Inference(String),
    #[error("landmark provider returned invalid landmarks: {0}")]
    InvalidLandmarks(#[from] LandmarkError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("window interval {window_ms}ms is not a multiple of sample interval {sample_ms}ms")]
    WindowNotMultiple { window_ms: u64, sample_ms: u64 },
    #[error("{field}={value} is outside [0, 1]")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("max_faces must be at least 1")]
    NoFacesAllowed,
}

/// 单次采帧 + 推理的失败原因，均在本帧内恢复
#[derive(Debug, Error)]
pub enum TickError {
    #[error("previous inference still in flight")]
    Overrun,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// 使整条采集流水线停止的错误
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(#[source] CaptureError),
    #[error("landmark provider setup failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("monitor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
