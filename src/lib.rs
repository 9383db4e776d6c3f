pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod ports;
pub mod services;
pub mod status;
pub mod vision;
