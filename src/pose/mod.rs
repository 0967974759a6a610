pub mod heatmap;
pub mod keypoint;

pub use heatmap::{HeatmapDecoder, HeatmapLayout};
pub use keypoint::{JointIndex, JointLabels, Pose, PredictedPoint};
