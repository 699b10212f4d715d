//! ヒューリスティック視線分類アダプター
//!
//! 両目とのセンターに対する鼻基部のずれから視線を分類する
//! 閾値ベースの実装。モデル推論を必要としません。

use crate::domain::{
    error::DomainResult,
    gaze,
    ports::GazeModelPort,
    types::{DetectedFace, GazeLabel},
};

/// 閾値ベースの視線分類アダプター
pub struct HeuristicGazeAdapter {
    threshold: f32,
}

impl HeuristicGazeAdapter {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for HeuristicGazeAdapter {
    fn default() -> Self {
        Self::new(gaze::DEFAULT_THRESHOLD)
    }
}

impl GazeModelPort for HeuristicGazeAdapter {
    fn classify(&mut self, face: &DetectedFace) -> DomainResult<GazeLabel> {
        // 必須ランドマーク欠損はclassify内でUnknownに縮退するためErrにはならない
        Ok(gaze::classify(face, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Landmark, LandmarkKind, RectF};

    fn face_with_nose(nose_x: f32) -> DetectedFace {
        DetectedFace {
            bounding_box: RectF::new(50.0, 100.0, 200.0, 300.0),
            landmarks: vec![
                Landmark::new(LandmarkKind::LeftEye, 100.0, 200.0),
                Landmark::new(LandmarkKind::RightEye, 140.0, 200.0),
                Landmark::new(LandmarkKind::NoseBase, nose_x, 200.0),
            ],
            contours: vec![],
        }
    }

    #[test]
    fn test_adapter_matches_domain_classifier() {
        let mut adapter = HeuristicGazeAdapter::default();

        assert_eq!(adapter.classify(&face_with_nose(90.0)).unwrap(), GazeLabel::Left);
        assert_eq!(adapter.classify(&face_with_nose(150.0)).unwrap(), GazeLabel::Right);
        assert_eq!(adapter.classify(&face_with_nose(120.0)).unwrap(), GazeLabel::Center);
    }

    #[test]
    fn test_custom_threshold() {
        // 閾値を広げるとLeft判定だったオフセットがCenterに収まる
        let mut adapter = HeuristicGazeAdapter::new(50.0);
        assert_eq!(adapter.classify(&face_with_nose(90.0)).unwrap(), GazeLabel::Center);
    }

    #[test]
    fn test_missing_landmarks_return_unknown() {
        let mut adapter = HeuristicGazeAdapter::default();
        let face = DetectedFace::default();
        assert_eq!(adapter.classify(&face).unwrap(), GazeLabel::Unknown);
    }
}
