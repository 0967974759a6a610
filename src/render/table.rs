use crate::pose::{JointLabels, Pose};

/// 座標テーブルの1行（表示用の文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypointRow {
    pub label: String,
    pub x: String,
    pub y: String,
    pub confidence: String,
}

const ABSENT: &str = "-";

/// Pose を関節番号順のテーブル行にする。数値は小数点以下3桁
pub fn keypoint_rows(pose: &Pose, labels: &JointLabels) -> Vec<KeypointRow> {
    pose.points
        .iter()
        .enumerate()
        .map(|(joint, point)| match point {
            Some(p) => KeypointRow {
                label: labels.label(joint),
                x: format!("{:.3}", p.x),
                y: format!("{:.3}", p.y),
                confidence: format!("{:.3}", p.confidence),
            },
            None => KeypointRow {
                label: labels.label(joint),
                x: ABSENT.to_string(),
                y: ABSENT.to_string(),
                confidence: ABSENT.to_string(),
            },
        })
        .collect()
}

/// 固定幅のテキスト表
pub fn format_table(rows: &[KeypointRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("joint".len());

    let mut out = format!("{:<width$}  {:>7}  {:>7}  {:>7}\n", "joint", "x", "y", "conf");
    for row in rows {
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>7}  {:>7}\n",
            row.label, row.x, row.y, row.confidence
        ));
    }
    out
}

/// フレームの見出し行（検出数と平均信頼度）
pub fn frame_summary(pose: &Pose, timestamp_us: u64) -> String {
    match pose.average_confidence() {
        Some(conf) => format!(
            "frame t={}us  joints {}/{}  mean conf {:.3}",
            timestamp_us,
            pose.detected_count(),
            pose.len(),
            conf
        ),
        None => format!("frame t={}us  joints 0/{}", timestamp_us, pose.len()),
    }
}
