use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::pose::PredictedPoint;

/// Equal-weight moving average over the last `limit` points of one joint.
///
/// The average is recomputed on every insertion and always covers exactly
/// the buffered points.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    limit: NonZeroUsize,
    buffer: VecDeque<PredictedPoint>,
    average: Option<PredictedPoint>,
}

impl MovingAverageFilter {
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            limit,
            buffer: VecDeque::with_capacity(limit.get()),
            average: None,
        }
    }

    /// Push a point, evicting the oldest one once full, and return the new average.
    pub fn add(&mut self, point: PredictedPoint) -> PredictedPoint {
        if self.buffer.len() == self.limit.get() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(point);

        let n = self.buffer.len() as f32;
        let (sx, sy, sc) = self
            .buffer
            .iter()
            .fold((0.0f32, 0.0f32, 0.0f32), |(sx, sy, sc), p| {
                (sx + p.x, sy + p.y, sc + p.confidence)
            });
        let average = PredictedPoint::new(point.joint, sx / n, sy / n, sc / n);
        self.average = Some(average);
        average
    }

    pub fn average(&self) -> Option<PredictedPoint> {
        self.average
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.average = None;
    }
}
