//! Per-session decode + smooth pipeline.
//!
//! One `PosePipeline` per video session. Frames must be fed in arrival
//! order from a single producer; `&mut self` is the only synchronization.

use std::time::{Duration, Instant};

use ndarray::ArrayViewD;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConfigError, DecodeError};
use crate::pose::{HeatmapDecoder, Pose};
use crate::tracker::KeypointSmoother;

/// Timings of one processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimings {
    /// Measured by the caller around the network run, if it was.
    pub inference: Option<Duration>,
    pub decode: Duration,
    pub smooth: Duration,
    pub joints: usize,
}

/// Receives timings after every successfully processed frame.
pub trait FrameObserver: Send {
    fn on_frame(&mut self, timings: &FrameTimings);
}

/// Logs frame timings at debug level.
pub struct TracingObserver;

impl FrameObserver for TracingObserver {
    fn on_frame(&mut self, timings: &FrameTimings) {
        debug!(
            inference_ms = timings.inference.map(|d| d.as_secs_f64() * 1000.0),
            decode_ms = timings.decode.as_secs_f64() * 1000.0,
            smooth_ms = timings.smooth.as_secs_f64() * 1000.0,
            joints = timings.joints,
            "frame processed"
        );
    }
}

pub struct PosePipeline {
    decoder: HeatmapDecoder,
    smoother: KeypointSmoother,
    observer: Option<Box<dyn FrameObserver>>,
}

impl PosePipeline {
    pub fn new(decoder: HeatmapDecoder, smoother: KeypointSmoother) -> Self {
        Self {
            decoder,
            smoother,
            observer: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            HeatmapDecoder::new(config.decoder.layout),
            KeypointSmoother::from_config(&config.smoothing)?,
        ))
    }

    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn process(&mut self, heatmap: ArrayViewD<'_, f32>) -> Result<Pose, DecodeError> {
        self.process_timed(heatmap, None)
    }

    /// Decode and smooth one frame.
    ///
    /// A frame that fails to decode is skipped: the smoother is left
    /// untouched and the error is returned for the caller to drop the frame.
    pub fn process_timed(
        &mut self,
        heatmap: ArrayViewD<'_, f32>,
        inference: Option<Duration>,
    ) -> Result<Pose, DecodeError> {
        let start = Instant::now();
        let raw = match self.decoder.convert(heatmap) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping frame: {}", e);
                return Err(e);
            }
        };
        let decoded = Instant::now();

        let smoothed = self.smoother.observe(&raw);
        let smoothed_at = Instant::now();

        if let Some(observer) = self.observer.as_mut() {
            observer.on_frame(&FrameTimings {
                inference,
                decode: decoded - start,
                smooth: smoothed_at - decoded,
                joints: smoothed.len(),
            });
        }

        Ok(smoothed)
    }

    /// Start a new session: drop all smoothing history.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn decoder(&self) -> &HeatmapDecoder {
        &self.decoder
    }

    pub fn smoother(&self) -> &KeypointSmoother {
        &self.smoother
    }
}
