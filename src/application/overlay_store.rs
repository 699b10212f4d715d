//! オーバーレイ状態ストア
//!
//! 検出結果と派生ジオメトリを保持する唯一の共有状態。
//! 書き手は検出パイプラインのみ（admission制御により単一）、
//! 読み手は描画側から任意数。すべてのアクセスは同一のMutexを通る。
//!
//! ## 不変条件
//! - スナップショットの全フィールドは1回のロック区間で一括更新される
//! - コンテナ矩形は書き込み時点の顔と書き込み時点のCameraInfoから
//!   再計算され、サイクルをまたいでキャッシュされない
//! - 退化した顔ボックスのサイクルでは直前のコンテナ矩形を維持する

use crate::domain::config::{OverlayConfig, PointerConfig};
use crate::domain::types::{DetectedFace, GazeLabel, OverlaySnapshot, RectF};
use crate::domain::{gaze, geometry, CameraFacing, CameraInfo};
use std::sync::{Arc, Mutex};

/// オーバーレイ状態ストア
///
/// cloneはArcの共有（書き手と読み手に同じストアを渡す）。
/// プロセス全体のシングルトンではなく、パイプラインが所有して
/// 参照で引き回す明示的なオブジェクト。
#[derive(Clone)]
pub struct OverlayStore {
    snapshot: Arc<Mutex<OverlaySnapshot>>,
    overlay_config: OverlayConfig,
    pointer_config: PointerConfig,
}

impl OverlayStore {
    /// 新しいストアを作成（空のスナップショット）
    pub fn new(overlay_config: OverlayConfig, pointer_config: PointerConfig) -> Self {
        let empty = OverlaySnapshot::empty(pointer_config.default_position());
        Self {
            snapshot: Arc::new(Mutex::new(empty)),
            overlay_config,
            pointer_config,
        }
    }

    /// カメラバインド通知
    ///
    /// バインド/再バインドごとに1回呼ばれる。スナップショットと同じ
    /// ロックで保護されるため、検出中のバインドも安全。
    pub fn set_camera_info(&self, preview_width: u32, preview_height: u32, facing: CameraFacing) {
        let mut guard = self.snapshot.lock().unwrap();
        guard.camera = Some(CameraInfo::new(preview_width, preview_height, facing));
    }

    /// 検出サイクルの結果を一括で公開する（書き手は検出パイプラインのみ）
    ///
    /// 1回のロック区間で、主要顔の選択・ミラーリング・コンテナ再計算・
    /// ポインタ遷移・スナップショット置換をすべて行う。
    /// 顔ボックスが退化している場合はコンテナとprimary_boxを
    /// 直前のサイクルの値のまま維持する（ゼロ除算の防止）。
    pub fn publish(&self, faces: Vec<DetectedFace>, gaze_label: GazeLabel) {
        let mut guard = self.snapshot.lock().unwrap();

        let camera = guard.camera;
        let (primary_box, container) = match (faces.first(), camera) {
            (Some(primary), Some(info)) if !primary.bounding_box.is_degenerate() => {
                let display_box = geometry::mirror_if_front_facing(
                    &primary.bounding_box,
                    info.preview_width as f32,
                    info.facing,
                );
                let container = geometry::place_container(
                    &display_box,
                    info.preview_width as f32,
                    info.preview_height as f32,
                    self.overlay_config.container_height_fraction,
                    self.overlay_config.margin_px,
                );
                (Some(display_box), container)
            }
            (Some(_), _) => {
                // 退化ボックスまたはカメラ未バインド: 直前の派生値を維持
                (guard.primary_box, guard.container)
            }
            (None, _) => (None, None),
        };

        let pointer = gaze::pointer_target(gaze_label, guard.pointer, &self.pointer_config);

        *guard = OverlaySnapshot {
            faces,
            camera,
            primary_box,
            container,
            gaze: gaze_label,
            pointer,
        };
    }

    /// 現在のスナップショットを取得（描画側、並行呼び出し可）
    pub fn read(&self) -> OverlaySnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    /// 空のスナップショットにリセットする（teardown用）
    ///
    /// カメラ情報は次のバインドまで保持する。バインド前に呼んでも安全。
    pub fn clear(&self) {
        let mut guard = self.snapshot.lock().unwrap();
        let camera = guard.camera;
        *guard = OverlaySnapshot::empty(self.pointer_config.default_position());
        guard.camera = camera;
    }

    /// 直前のコンテナ矩形を取得（テスト・描画補助用）
    #[allow(dead_code)]
    pub fn container(&self) -> Option<RectF> {
        self.snapshot.lock().unwrap().container
    }
}
