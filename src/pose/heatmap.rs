use ndarray::{ArrayView2, ArrayView3, ArrayViewD, Axis, Ix3};
use serde::Deserialize;

use super::keypoint::{Pose, PredictedPoint};
use crate::error::DecodeError;

/// ヒートマップテンソルの軸の並び
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapLayout {
    /// [joints, height, width]
    #[default]
    JointsFirst,
    /// [height, width, joints]
    JointsLast,
}

/// 関節ごとのヒートマップから最大値の位置を取り出すデコーダ
///
/// - 走査順は行優先。最大値が複数ある場合は最初のセル（行が小さい方、次に列が小さい方）
/// - 座標は `x = col / (width - 1)`, `y = row / (height - 1)`。長さ1の軸は 0.0
/// - 信頼度は勝ったセルの生の値（softmax や正規化はしない）
/// - 全セルが同じ値の関節は `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapDecoder {
    layout: HeatmapLayout,
}

impl HeatmapDecoder {
    pub fn new(layout: HeatmapLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> HeatmapLayout {
        self.layout
    }

    /// ヒートマップテンソルを関節点列に変換
    ///
    /// 入力: rank 3、または先頭がバッチ軸 (=1) の rank 4
    /// 出力: 関節番号順の Pose
    pub fn convert(&self, heatmap: ArrayViewD<'_, f32>) -> Result<Pose, DecodeError> {
        let heatmap = to_rank3(heatmap)?;
        let (d0, d1, d2) = heatmap.dim();

        let (joint_axis, joints, height, width) = match self.layout {
            HeatmapLayout::JointsFirst => (Axis(0), d0, d1, d2),
            HeatmapLayout::JointsLast => (Axis(2), d2, d0, d1),
        };

        if joints == 0 {
            return Err(DecodeError::NoJoints);
        }
        if height == 0 || width == 0 {
            return Err(DecodeError::EmptySpatial { height, width });
        }

        let points = (0..joints)
            .map(|joint| decode_joint(joint, heatmap.index_axis(joint_axis, joint)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pose::new(points))
    }
}

fn to_rank3(heatmap: ArrayViewD<'_, f32>) -> Result<ArrayView3<'_, f32>, DecodeError> {
    let heatmap = match heatmap.ndim() {
        3 => heatmap,
        4 => {
            let batch = heatmap.len_of(Axis(0));
            if batch != 1 {
                return Err(DecodeError::BatchSize { batch });
            }
            heatmap.index_axis_move(Axis(0), 0)
        }
        rank => return Err(DecodeError::InvalidRank { rank }),
    };
    let rank = heatmap.ndim();
    heatmap
        .into_dimensionality::<Ix3>()
        .map_err(|_| DecodeError::InvalidRank { rank })
}

fn decode_joint(
    joint: usize,
    slice: ArrayView2<'_, f32>,
) -> Result<Option<PredictedPoint>, DecodeError> {
    let (height, width) = slice.dim();

    let mut max_val = f32::NEG_INFINITY;
    let mut min_val = f32::INFINITY;
    let mut max_row = 0usize;
    let mut max_col = 0usize;

    // indexed_iter visits cells in logical row-major order; strict > keeps the first maximum
    for ((row, col), &v) in slice.indexed_iter() {
        if !v.is_finite() {
            return Err(DecodeError::NonFinite { joint, row, col });
        }
        if v > max_val {
            max_val = v;
            max_row = row;
            max_col = col;
        }
        if v < min_val {
            min_val = v;
        }
    }

    if max_val == min_val {
        return Ok(None);
    }

    Ok(Some(PredictedPoint::new(
        joint,
        normalize(max_col, width),
        normalize(max_row, height),
        max_val,
    )))
}

fn normalize(index: usize, extent: usize) -> f32 {
    if extent <= 1 {
        0.0
    } else {
        index as f32 / (extent - 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array3, Array4};

    fn decode(heatmap: &Array3<f32>) -> Result<Pose, DecodeError> {
        HeatmapDecoder::default().convert(heatmap.view().into_dyn())
    }

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_max_at_top_right_corner() {
        let mut heatmap = Array3::<f32>::zeros((1, 4, 4));
        heatmap[[0, 0, 3]] = 0.8;

        let pose = decode(&heatmap).unwrap();
        let p = pose.get(0).unwrap();
        assert_eq!(p.joint, 0);
        assert!(approx_eq_f32(p.x, 1.0, 1e-6));
        assert!(approx_eq_f32(p.y, 0.0, 1e-6));
        assert_eq!(p.confidence, 0.8);
    }

    #[test]
    fn test_max_position_normalized() {
        let mut heatmap = Array3::<f32>::zeros((1, 5, 3));
        heatmap[[0, 2, 1]] = 1.0;

        let pose = decode(&heatmap).unwrap();
        let p = pose.get(0).unwrap();
        assert!(approx_eq_f32(p.x, 0.5, 1e-6));
        assert!(approx_eq_f32(p.y, 0.5, 1e-6));
    }

    #[test]
    fn test_tie_break_lowest_row_then_col() {
        let mut heatmap = Array3::<f32>::zeros((1, 4, 4));
        heatmap[[0, 2, 0]] = 0.9;
        heatmap[[0, 1, 3]] = 0.9;
        heatmap[[0, 1, 2]] = 0.9;

        let pose = decode(&heatmap).unwrap();
        let p = pose.get(0).unwrap();
        // row 1, col 2
        assert!(approx_eq_f32(p.x, 2.0 / 3.0, 1e-6));
        assert!(approx_eq_f32(p.y, 1.0 / 3.0, 1e-6));
    }

    #[test]
    fn test_deterministic() {
        let heatmap = Array::from_shape_fn((3, 6, 5), |(j, r, c)| {
            ((j * 7 + r * 3 + c * 11) % 13) as f32 * 0.1
        });

        let first = decode(&heatmap).unwrap();
        for _ in 0..10 {
            assert_eq!(decode(&heatmap).unwrap(), first);
        }
    }

    #[test]
    fn test_raw_confidence_not_normalized() {
        let mut heatmap = Array3::<f32>::from_elem((2, 3, 3), -1.0);
        heatmap[[0, 1, 1]] = 7.5;
        heatmap[[1, 0, 0]] = -0.25;

        let pose = decode(&heatmap).unwrap();
        assert_eq!(pose.get(0).unwrap().confidence, 7.5);
        assert_eq!(pose.get(1).unwrap().confidence, -0.25);
    }

    #[test]
    fn test_joint_order_preserved() {
        let mut heatmap = Array3::<f32>::zeros((3, 4, 4));
        heatmap[[0, 0, 0]] = 1.0;
        heatmap[[1, 3, 3]] = 1.0;
        heatmap[[2, 0, 3]] = 1.0;

        let pose = decode(&heatmap).unwrap();
        assert_eq!(pose.len(), 3);
        for (i, p) in pose.points.iter().enumerate() {
            assert_eq!(p.unwrap().joint, i);
        }
        assert_eq!(pose.get(1).unwrap().x, 1.0);
        assert_eq!(pose.get(1).unwrap().y, 1.0);
    }

    #[test]
    fn test_degenerate_slice_is_absent() {
        let mut heatmap = Array3::<f32>::from_elem((2, 4, 4), 0.3);
        heatmap[[1, 2, 2]] = 0.9;

        let pose = decode(&heatmap).unwrap();
        assert_eq!(pose.points[0], None);
        assert!(pose.get(1).is_some());
    }

    #[test]
    fn test_single_cell_axis_maps_to_zero() {
        let mut heatmap = Array3::<f32>::zeros((1, 1, 4));
        heatmap[[0, 0, 2]] = 1.0;

        let pose = decode(&heatmap).unwrap();
        let p = pose.get(0).unwrap();
        assert!(approx_eq_f32(p.x, 2.0 / 3.0, 1e-6));
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_tie_break_joints_last_layout() {
        // non-contiguous joint slices still scan row-major
        let mut heatmap = Array3::<f32>::zeros((3, 3, 2));
        heatmap[[2, 0, 1]] = 0.5;
        heatmap[[0, 2, 1]] = 0.5;
        heatmap[[1, 0, 1]] = 0.5;

        let decoder = HeatmapDecoder::new(HeatmapLayout::JointsLast);
        let pose = decoder.convert(heatmap.view().into_dyn()).unwrap();
        let p = pose.get(1).unwrap();
        assert_eq!((p.x, p.y), (1.0, 0.0));
    }

    #[test]
    fn test_joints_last_layout() {
        // [height, width, joints]
        let mut heatmap = Array3::<f32>::zeros((4, 4, 2));
        heatmap[[0, 3, 0]] = 1.0;
        heatmap[[3, 0, 1]] = 1.0;

        let decoder = HeatmapDecoder::new(HeatmapLayout::JointsLast);
        let pose = decoder.convert(heatmap.view().into_dyn()).unwrap();
        assert_eq!(pose.len(), 2);
        let p0 = pose.get(0).unwrap();
        assert_eq!((p0.x, p0.y), (1.0, 0.0));
        let p1 = pose.get(1).unwrap();
        assert_eq!((p1.x, p1.y), (0.0, 1.0));
    }

    #[test]
    fn test_batch_axis_squeezed() {
        let mut heatmap = Array4::<f32>::zeros((1, 2, 4, 4));
        heatmap[[0, 1, 0, 3]] = 1.0;

        let pose = HeatmapDecoder::default()
            .convert(heatmap.view().into_dyn())
            .unwrap();
        assert_eq!(pose.len(), 2);
        assert_eq!(pose.points[0], None);
        assert_eq!(pose.get(1).unwrap().x, 1.0);
    }

    #[test]
    fn test_batch_larger_than_one_rejected() {
        let heatmap = Array4::<f32>::zeros((2, 1, 4, 4));
        let err = HeatmapDecoder::default()
            .convert(heatmap.view().into_dyn())
            .unwrap_err();
        assert!(matches!(err, DecodeError::BatchSize { batch: 2 }));
    }

    #[test]
    fn test_wrong_rank_rejected() {
        let heatmap = ndarray::Array2::<f32>::zeros((4, 4));
        let err = HeatmapDecoder::default()
            .convert(heatmap.view().into_dyn())
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRank { rank: 2 }));
    }

    #[test]
    fn test_empty_spatial_rejected() {
        let heatmap = Array3::<f32>::zeros((2, 0, 4));
        assert!(matches!(
            decode(&heatmap),
            Err(DecodeError::EmptySpatial { height: 0, width: 4 })
        ));
    }

    #[test]
    fn test_no_joints_rejected() {
        let heatmap = Array3::<f32>::zeros((0, 4, 4));
        assert!(matches!(decode(&heatmap), Err(DecodeError::NoJoints)));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut heatmap = Array3::<f32>::zeros((2, 3, 3));
        heatmap[[0, 0, 0]] = 1.0;
        heatmap[[1, 2, 1]] = f32::NAN;

        let err = decode(&heatmap).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::NonFinite {
                joint: 1,
                row: 2,
                col: 1
            }
        ));

        heatmap[[1, 2, 1]] = f32::INFINITY;
        assert!(decode(&heatmap).is_err());
    }
}
