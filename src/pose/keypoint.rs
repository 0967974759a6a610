/// CPM (Convolutional Pose Machines) の 14 関節インデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointIndex {
    Top = 0,
    Neck = 1,
    RightShoulder = 2,
    RightElbow = 3,
    RightWrist = 4,
    LeftShoulder = 5,
    LeftElbow = 6,
    LeftWrist = 7,
    RightHip = 8,
    RightKnee = 9,
    RightAnkle = 10,
    LeftHip = 11,
    LeftKnee = 12,
    LeftAnkle = 13,
}

impl JointIndex {
    pub const COUNT: usize = 14;

    pub const ALL: [JointIndex; Self::COUNT] = [
        Self::Top,
        Self::Neck,
        Self::RightShoulder,
        Self::RightElbow,
        Self::RightWrist,
        Self::LeftShoulder,
        Self::LeftElbow,
        Self::LeftWrist,
        Self::RightHip,
        Self::RightKnee,
        Self::RightAnkle,
        Self::LeftHip,
        Self::LeftKnee,
        Self::LeftAnkle,
    ];

    /// 表示用ラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Neck => "neck",
            Self::RightShoulder => "R shoulder",
            Self::RightElbow => "R elbow",
            Self::RightWrist => "R wrist",
            Self::LeftShoulder => "L shoulder",
            Self::LeftElbow => "L elbow",
            Self::LeftWrist => "L wrist",
            Self::RightHip => "R hip",
            Self::RightKnee => "R knee",
            Self::RightAnkle => "R ankle",
            Self::LeftHip => "L hip",
            Self::LeftKnee => "L knee",
            Self::LeftAnkle => "L ankle",
        }
    }
}

/// 関節ラベル表（表示専用、埋め込み側から注入される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointLabels {
    labels: Vec<String>,
}

impl JointLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// ラベル表に無い関節は `joint_<n>` になる
    pub fn label(&self, joint: usize) -> String {
        match self.labels.get(joint) {
            Some(label) => label.clone(),
            None => format!("joint_{}", joint),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for JointLabels {
    fn default() -> Self {
        Self::new(JointIndex::ALL.iter().map(|j| j.label().to_string()).collect())
    }
}

/// 単一関節の推定点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPoint {
    /// 関節インデックス
    pub joint: usize,
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// ネットワーク出力そのままの信頼度（正規化されていない）
    pub confidence: f32,
}

impl PredictedPoint {
    pub fn new(joint: usize, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            joint,
            x,
            y,
            confidence,
        }
    }
}

/// 1フレーム分の関節点。インデックス = 関節番号、`None` = 検出なし
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub points: Vec<Option<PredictedPoint>>,
}

impl Pose {
    pub fn new(points: Vec<Option<PredictedPoint>>) -> Self {
        Self { points }
    }

    pub fn get(&self, joint: usize) -> Option<&PredictedPoint> {
        self.points.get(joint).and_then(Option::as_ref)
    }

    /// 関節数（検出されなかった関節も含む）
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn detected_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// 検出された関節の平均信頼度
    pub fn average_confidence(&self) -> Option<f32> {
        let count = self.detected_count();
        if count == 0 {
            return None;
        }
        let sum: f32 = self.points.iter().flatten().map(|p| p.confidence).sum();
        Some(sum / count as f32)
    }
}
