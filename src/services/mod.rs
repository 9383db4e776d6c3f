pub mod canvas;
pub mod replay;
pub mod sinks;
