use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::pose::{HeatmapLayout, JointIndex, JointLabels};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub joints: JointsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmoothingConfig {
    /// 平均するフレーム数 (1以上)
    #[serde(default = "default_window_size", alias = "windowSize")]
    pub window_size: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DecoderConfig {
    /// ヒートマップの軸の並び ("joints_first" / "joints_last")
    #[serde(default)]
    pub layout: HeatmapLayout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JointsConfig {
    /// 関節ラベル（表示用、関節番号順）
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

fn default_window_size() -> usize { 3 }
fn default_labels() -> Vec<String> {
    JointIndex::ALL.iter().map(|j| j.label().to_string()).collect()
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

impl SmoothingConfig {
    pub fn window(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.window_size).ok_or(ConfigError::InvalidWindowSize(self.window_size))
    }
}

impl Default for JointsConfig {
    fn default() -> Self {
        Self {
            labels: default_labels(),
        }
    }
}

impl JointsConfig {
    pub fn joint_labels(&self) -> JointLabels {
        JointLabels::new(self.labels.clone())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルが無ければデフォルトを使う。存在して不正ならエラー
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!("config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smoothing.window()?;
        if self.joints.labels.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }
        Ok(())
    }
}
