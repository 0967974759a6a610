pub mod moving_average;
pub mod smooth;

pub use moving_average::MovingAverageFilter;
pub use smooth::KeypointSmoother;
