use std::io;

use thiserror::Error;

/// 1フレーム分のヒートマップを解釈できなかった
///
/// フレーム単位で回復可能: そのフレームはスキップされ、平滑化状態は変化しない。
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("heatmap must be rank 3 (or rank 4 with batch 1), got rank {rank}")]
    InvalidRank { rank: usize },

    #[error("heatmap batch axis must be 1, got {batch}")]
    BatchSize { batch: usize },

    #[error("heatmap has no joints")]
    NoJoints,

    #[error("heatmap spatial extent is empty ({height}x{width})")]
    EmptySpatial { height: usize, width: usize },

    #[error("non-finite value at joint {joint}, row {row}, col {col}")]
    NonFinite { joint: usize, row: usize, col: usize },

    #[error("shape {shape:?} has too many elements")]
    ShapeOverflow { shape: Vec<usize> },

    #[error("shape {shape:?} needs {expected} values, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// 静的設定の誤り（構築時のみ、致命的）
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("smoothing window must be at least 1 frame, got {0}")]
    InvalidWindowSize(usize),

    #[error("joint label table is empty")]
    EmptyLabels,

    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
