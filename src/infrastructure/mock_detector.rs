//! モック顔検出アダプター
//!
//! ML推論なしでパイプラインを通すための決定的な検出器。
//! フレームサイズ中央に1つの合成顔（全ランドマーク・顔輪郭付き）を返し、
//! 視線ラベルが周期的に変化するよう鼻位置を揺らします。

use crate::domain::{
    error::{DomainError, DomainResult},
    ports::FaceDetectorPort,
    types::{Contour, DetectedFace, Frame, Landmark, LandmarkKind, PointF, RectF},
};

/// 合成顔を返す決定的な検出アダプター
pub struct MockFaceDetectorAdapter {
    cycle: u64,
    /// N サイクルごとに1回検出エラーを注入する（0で無効）
    fail_every: u64,
}

impl MockFaceDetectorAdapter {
    pub fn new() -> Self {
        Self {
            cycle: 0,
            fail_every: 0,
        }
    }

    /// エラー注入付きで作成（テスト・縮退動作確認用）
    #[allow(dead_code)]
    pub fn with_failure_every(fail_every: u64) -> Self {
        Self {
            cycle: 0,
            fail_every,
        }
    }

    /// 鼻基部のオフセット（サイクルに応じてCenter→Left→Center→Rightを巡回）
    fn nose_offset(&self) -> f32 {
        match (self.cycle / 30) % 4 {
            1 => 30.0,
            3 => -30.0,
            _ => 0.0,
        }
    }
}

impl Default for MockFaceDetectorAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceDetectorPort for MockFaceDetectorAdapter {
    fn detect(&mut self, frame: &Frame) -> DomainResult<Vec<DetectedFace>> {
        self.cycle += 1;

        if self.fail_every > 0 && self.cycle % self.fail_every == 0 {
            return Err(DomainError::Detection(format!(
                "Injected detection failure at cycle {}",
                self.cycle
            )));
        }

        let w = frame.width as f32;
        let h = frame.height as f32;
        let cx = w / 2.0;
        let cy = h / 2.0;
        let half_w = w / 6.0;
        let half_h = h / 5.0;

        let bounding_box = RectF::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h);
        let eye_y = cy - half_h * 0.3;
        let eye_dx = half_w * 0.5;
        let nose_x = cx + self.nose_offset();

        let landmarks = vec![
            Landmark::new(LandmarkKind::LeftEye, cx - eye_dx, eye_y),
            Landmark::new(LandmarkKind::RightEye, cx + eye_dx, eye_y),
            Landmark::new(LandmarkKind::NoseBase, nose_x, cy),
            Landmark::new(LandmarkKind::MouthLeft, cx - eye_dx * 0.7, cy + half_h * 0.5),
            Landmark::new(LandmarkKind::MouthRight, cx + eye_dx * 0.7, cy + half_h * 0.5),
            Landmark::new(LandmarkKind::MouthBottom, cx, cy + half_h * 0.7),
            Landmark::new(LandmarkKind::LeftEar, cx - half_w, eye_y),
            Landmark::new(LandmarkKind::RightEar, cx + half_w, eye_y),
            Landmark::new(LandmarkKind::LeftCheek, cx - eye_dx, cy + half_h * 0.2),
            Landmark::new(LandmarkKind::RightCheek, cx + eye_dx, cy + half_h * 0.2),
        ];

        // 顔輪郭の楕円近似（16点）
        let contour_points = (0..16)
            .map(|i| {
                let theta = (i as f32) * std::f32::consts::TAU / 16.0;
                PointF::new(cx + half_w * theta.cos(), cy + half_h * theta.sin())
            })
            .collect();

        Ok(vec![DetectedFace {
            bounding_box,
            landmarks,
            contours: vec![Contour::new(contour_points)],
        }])
    }
}
