pub mod table;

pub use table::{format_table, frame_summary, keypoint_rows, KeypointRow};
