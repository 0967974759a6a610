//! Heatmap frame records (one JSON object per line) fed to the replay tool.

use std::time::Duration;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// ネットワーク出力1フレーム分
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FrameRecord {
    #[serde(default)]
    pub timestamp_us: u64,
    /// 推論にかかった時間（計測していれば）
    #[serde(default)]
    pub inference_us: Option<u64>,
    pub shape: Vec<usize>,
    /// 行優先で平坦化した値
    pub data: Vec<f32>,
}

impl FrameRecord {
    pub fn parse_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn inference_time(&self) -> Option<Duration> {
        self.inference_us.map(Duration::from_micros)
    }

    /// 形状と値の数を突き合わせてテンソルにする
    pub fn to_array(&self) -> Result<ArrayD<f32>, DecodeError> {
        let expected = self
            .shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| DecodeError::ShapeOverflow {
                shape: self.shape.clone(),
            })?;
        if expected != self.data.len() {
            return Err(DecodeError::ShapeMismatch {
                shape: self.shape.clone(),
                expected,
                actual: self.data.len(),
            });
        }
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone()).map_err(|_| {
            DecodeError::ShapeMismatch {
                shape: self.shape.clone(),
                expected,
                actual: self.data.len(),
            }
        })
    }
}
