//! 視線分類モジュール
//!
//! ランドマーク位置から離散的な視線ラベルを導出するしきい値ヒューリスティック。
//! 状態を持たず、同一入力には常に同一ラベルを返す（時間方向の平滑化や
//! ユーザーごとのキャリブレーションは行わない）。
//!
//! ## 判定順序
//! 水平方向（Left → Right）を垂直方向（Up → Down）より先に判定する。
//! 斜め方向の視線は水平ラベルとして報告される。

use crate::domain::config::PointerConfig;
use crate::domain::types::{DetectedFace, GazeLabel, LandmarkKind, PointerPosition};

/// デフォルトのしきい値（検出器座標系のピクセル）
pub const DEFAULT_THRESHOLD: f32 = 20.0;

/// ランドマーク位置から視線ラベルを分類する
///
/// LeftEye / RightEye / NoseBase の3ランドマークを必要とし、
/// いずれかが欠けている場合は `Unknown` を返す。
///
/// 両目の平均位置と鼻根の差分 `(delta_x, delta_y)` をしきい値判定する:
/// - `delta_x > threshold` → Left
/// - `delta_x < -threshold` → Right
/// - `delta_y < -threshold` → Up
/// - `delta_y > threshold` → Down
/// - それ以外 → Center
///
/// この経路では `Blink` は生成されない（モデルベース分類器の予約値）。
pub fn classify(face: &DetectedFace, threshold: f32) -> GazeLabel {
    let (left_eye, right_eye, nose) = match (
        face.landmark(LandmarkKind::LeftEye),
        face.landmark(LandmarkKind::RightEye),
        face.landmark(LandmarkKind::NoseBase),
    ) {
        (Some(l), Some(r), Some(n)) => (l, r, n),
        _ => return GazeLabel::Unknown,
    };

    let avg_eye_x = (left_eye.x + right_eye.x) / 2.0;
    let avg_eye_y = (left_eye.y + right_eye.y) / 2.0;

    let delta_x = avg_eye_x - nose.x;
    let delta_y = avg_eye_y - nose.y;

    if delta_x > threshold {
        GazeLabel::Left
    } else if delta_x < -threshold {
        GazeLabel::Right
    } else if delta_y < -threshold {
        GazeLabel::Up
    } else if delta_y > threshold {
        GazeLabel::Down
    } else {
        GazeLabel::Center
    }
}

/// 視線ラベルの遷移からポインタ位置を導出する
///
/// 各ラベルは固定ターゲットに対応する:
/// - Left/Right はX座標のみ、Up/Down はY座標のみ更新
/// - Center は既定の中心位置にリセット
/// - Blink/Unknown は現在位置を維持
pub fn pointer_target(
    label: GazeLabel,
    current: PointerPosition,
    config: &PointerConfig,
) -> PointerPosition {
    match label {
        GazeLabel::Left => PointerPosition::new(config.left_x, current.y),
        GazeLabel::Right => PointerPosition::new(config.right_x, current.y),
        GazeLabel::Up => PointerPosition::new(current.x, config.up_y),
        GazeLabel::Down => PointerPosition::new(current.x, config.down_y),
        GazeLabel::Center => PointerPosition::new(config.center_x, config.center_y),
        GazeLabel::Blink | GazeLabel::Unknown => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Landmark, RectF};

    /// 3ランドマークを持つテスト用の顔を作成
    fn face_with_landmarks(
        left_eye: (f32, f32),
        right_eye: (f32, f32),
        nose: (f32, f32),
    ) -> DetectedFace {
        DetectedFace {
            bounding_box: RectF::new(0.0, 0.0, 200.0, 300.0),
            landmarks: vec![
                Landmark::new(LandmarkKind::LeftEye, left_eye.0, left_eye.1),
                Landmark::new(LandmarkKind::RightEye, right_eye.0, right_eye.1),
                Landmark::new(LandmarkKind::NoseBase, nose.0, nose.1),
            ],
            contours: vec![],
        }
    }

    #[test]
    fn test_classify_left() {
        // avg_eye_x = 120, delta_x = 30 > 20 → Left
        let face = face_with_landmarks((100.0, 200.0), (140.0, 200.0), (90.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Left);
    }

    #[test]
    fn test_classify_right() {
        // avg_eye_x = 120, delta_x = -30 < -20 → Right
        let face = face_with_landmarks((100.0, 200.0), (140.0, 200.0), (150.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Right);
    }

    #[test]
    fn test_classify_center() {
        // delta_x = 0, delta_y = 0 → Center
        let face = face_with_landmarks((100.0, 200.0), (140.0, 200.0), (120.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Center);
    }

    #[test]
    fn test_classify_up_and_down() {
        // delta_y = -30 → Up
        let face = face_with_landmarks((100.0, 170.0), (140.0, 170.0), (120.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Up);

        // delta_y = 30 → Down
        let face = face_with_landmarks((100.0, 230.0), (140.0, 230.0), (120.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Down);
    }

    #[test]
    fn test_classify_horizontal_beats_vertical() {
        // delta_x = 30, delta_y = 30: 斜め視線は水平ラベルとして報告される
        let face = face_with_landmarks((100.0, 230.0), (140.0, 230.0), (90.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Left);
    }

    #[test]
    fn test_classify_threshold_boundary() {
        // delta_x = 20 ちょうどはしきい値を超えない → Center
        let face = face_with_landmarks((100.0, 200.0), (140.0, 200.0), (100.0, 200.0));
        assert_eq!(classify(&face, 20.0), GazeLabel::Center);
    }

    #[test]
    fn test_classify_missing_nose() {
        // NoseBase欠損は目の位置に関わらず常にUnknown
        let face = DetectedFace {
            bounding_box: RectF::new(0.0, 0.0, 200.0, 300.0),
            landmarks: vec![
                Landmark::new(LandmarkKind::LeftEye, 100.0, 200.0),
                Landmark::new(LandmarkKind::RightEye, 140.0, 200.0),
            ],
            contours: vec![],
        };
        assert_eq!(classify(&face, 20.0), GazeLabel::Unknown);
    }

    #[test]
    fn test_classify_missing_eyes() {
        let face = DetectedFace {
            bounding_box: RectF::new(0.0, 0.0, 200.0, 300.0),
            landmarks: vec![Landmark::new(LandmarkKind::NoseBase, 120.0, 200.0)],
            contours: vec![],
        };
        assert_eq!(classify(&face, 20.0), GazeLabel::Unknown);
    }

    #[test]
    fn test_pointer_transitions() {
        let config = PointerConfig::default();
        let current = PointerPosition::new(500.0, 800.0);

        let left = pointer_target(GazeLabel::Left, current, &config);
        assert_eq!(left, PointerPosition::new(200.0, 800.0));

        let right = pointer_target(GazeLabel::Right, current, &config);
        assert_eq!(right, PointerPosition::new(800.0, 800.0));

        let up = pointer_target(GazeLabel::Up, current, &config);
        assert_eq!(up, PointerPosition::new(500.0, 300.0));

        let down = pointer_target(GazeLabel::Down, current, &config);
        assert_eq!(down, PointerPosition::new(500.0, 1300.0));
    }

    #[test]
    fn test_pointer_center_resets() {
        let config = PointerConfig::default();
        let off_center = PointerPosition::new(200.0, 1300.0);

        let reset = pointer_target(GazeLabel::Center, off_center, &config);
        assert_eq!(reset, PointerPosition::new(500.0, 800.0));
    }

    #[test]
    fn test_pointer_unknown_keeps_position() {
        let config = PointerConfig::default();
        let current = PointerPosition::new(200.0, 300.0);

        assert_eq!(pointer_target(GazeLabel::Unknown, current, &config), current);
        assert_eq!(pointer_target(GazeLabel::Blink, current, &config), current);
    }

    #[test]
    fn test_pointer_axis_independence() {
        // Left → Up の順で遷移すると両軸の更新が合成される
        let config = PointerConfig::default();
        let p = pointer_target(
            GazeLabel::Left,
            PointerPosition::new(500.0, 800.0),
            &config,
        );
        let p = pointer_target(GazeLabel::Up, p, &config);
        assert_eq!(p, PointerPosition::new(200.0, 300.0));
    }
}
