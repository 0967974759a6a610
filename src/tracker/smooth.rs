use std::num::NonZeroUsize;

use tracing::debug;

use super::moving_average::MovingAverageFilter;
use crate::config::SmoothingConfig;
use crate::error::ConfigError;
use crate::pose::Pose;

/// 関節ごとの移動平均フィルタ群による時系列平滑化
///
/// - 関節数が変わったら（初回を含む）フィルタ群を作り直し、全関節の履歴を捨てる
/// - 検出なし (`None`) の関節は履歴に入れず、前回の平均をそのまま返す
///
/// フレームは到着順に1スレッドから渡すこと。内部でロックはしない。
pub struct KeypointSmoother {
    window: NonZeroUsize,
    filters: Vec<MovingAverageFilter>,
}

impl KeypointSmoother {
    pub fn new(window: NonZeroUsize) -> Self {
        Self {
            window,
            filters: Vec::new(),
        }
    }

    pub fn from_config(config: &SmoothingConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.window()?))
    }

    pub fn observe(&mut self, pose: &Pose) -> Pose {
        if pose.len() != self.filters.len() {
            debug!(
                from = self.filters.len(),
                to = pose.len(),
                "joint count changed, rebuilding filter bank"
            );
            self.filters = (0..pose.len())
                .map(|_| MovingAverageFilter::new(self.window))
                .collect();
        }

        let points = self
            .filters
            .iter_mut()
            .zip(pose.points.iter())
            .map(|(filter, point)| match point {
                Some(point) => Some(filter.add(*point)),
                None => filter.average(),
            })
            .collect();

        Pose::new(points)
    }

    pub fn window(&self) -> usize {
        self.window.get()
    }

    /// 現在のフィルタ群の関節数
    pub fn joint_count(&self) -> usize {
        self.filters.len()
    }

    pub fn reset(&mut self) {
        self.filters.clear();
    }
}
