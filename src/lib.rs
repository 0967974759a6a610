pub mod config;
pub mod error;
pub mod pipeline;
pub mod pose;
pub mod protocol;
pub mod render;
pub mod tracker;

pub use error::{ConfigError, DecodeError};
pub use pipeline::{FrameObserver, FrameTimings, PosePipeline, TracingObserver};
