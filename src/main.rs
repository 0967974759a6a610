use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{info, warn};

use poselift::config::Config;
use poselift::protocol::FrameRecord;
use poselift::render::{format_table, frame_summary, keypoint_rows};
use poselift::{PosePipeline, TracingObserver};

const CONFIG_PATH: &str = "poselift.toml";

/// 使い方: poselift [heatmaps.jsonl] [config.toml]
/// ヒートマップファイルを省略すると標準入力から読む
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let input_path = args.next();
    let config_path = args.next().unwrap_or_else(|| CONFIG_PATH.to_string());

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Invalid config {}", config_path))?;
    info!(
        version = env!("GIT_VERSION"),
        window = config.smoothing.window_size,
        layout = ?config.decoder.layout,
        "poselift starting"
    );

    let mut pipeline = PosePipeline::from_config(&config)?.with_observer(Box::new(TracingObserver));
    let labels = config.joints.joint_labels();

    let reader: Box<dyn BufRead> = match &input_path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match FrameRecord::parse_line(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!("line {}: malformed frame record: {}", line_no + 1, e);
                skipped += 1;
                continue;
            }
        };

        let heatmap = match record.to_array() {
            Ok(heatmap) => heatmap,
            Err(e) => {
                warn!("line {}: {}", line_no + 1, e);
                skipped += 1;
                continue;
            }
        };

        // 失敗したフレームは表示しない（パイプライン側でログ済み）
        let pose = match pipeline.process_timed(heatmap.view(), record.inference_time()) {
            Ok(pose) => pose,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        writeln!(out, "{}", frame_summary(&pose, record.timestamp_us))?;
        write!(out, "{}", format_table(&keypoint_rows(&pose, &labels)))?;
        writeln!(out)?;
        processed += 1;
    }

    info!(processed, skipped, "done");
    Ok(())
}
