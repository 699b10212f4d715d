//! 座標変換モジュール
//!
//! 検出器座標系の矩形・点をオーバーレイ座標系に写像する純粋関数群。
//! 状態も並行性も持たない。
//!
//! ## 座標系
//! - 検出器座標系: キャプチャ画像のピクセル座標
//! - オーバーレイ座標系: 描画面の座標。主要顔はビューポート右下の
//!   コンテナ矩形に縮小して収められる

use crate::domain::types::{CameraFacing, PointF, RectF};

/// コンテナ矩形を配置する
///
/// 主要顔のバウンディングボックスを、ビューポート高さの
/// `height_fraction` 倍の高さに一様スケールし、右下隅に
/// `margin` ピクセルの余白を空けて配置する。
/// アスペクト比は高さ比由来の単一スケール係数で維持される。
///
/// # Arguments
/// - `face_box`: 主要顔のバウンディングボックス（検出器座標系）
/// - `viewport_width` / `viewport_height`: オーバーレイビューポートの寸法
/// - `height_fraction`: ビューポート高さに対するコンテナ高さの比率
/// - `margin`: 右下隅からの余白（ピクセル）
///
/// # Returns
/// - `Some(RectF)`: 配置されたコンテナ矩形
/// - `None`: face_boxが退化している場合（ゼロ除算の防止）
pub fn place_container(
    face_box: &RectF,
    viewport_width: f32,
    viewport_height: f32,
    height_fraction: f32,
    margin: f32,
) -> Option<RectF> {
    if face_box.is_degenerate() {
        return None;
    }

    let target_height = viewport_height * height_fraction;
    let scale = target_height / face_box.height();
    let target_width = face_box.width() * scale;

    Some(RectF::new(
        viewport_width - target_width - margin,
        viewport_height - target_height - margin,
        viewport_width - margin,
        viewport_height - margin,
    ))
}

/// 検出器座標系の点をコンテナ内のオーバーレイ座標に写像する
///
/// face_boxの左上を原点に平行移動し、コンテナとface_boxの寸法比
/// （X/Y独立のスケール係数）で拡縮し、コンテナ位置へ平行移動する。
/// ランドマークにも輪郭頂点にも適用できる。
///
/// # Returns
/// - `Some(PointF)`: オーバーレイ座標系の点
/// - `None`: face_boxが退化している場合
pub fn map_point(point: &PointF, face_box: &RectF, container: &RectF) -> Option<PointF> {
    if face_box.is_degenerate() {
        return None;
    }

    let scale_x = container.width() / face_box.width();
    let scale_y = container.height() / face_box.height();

    Some(PointF::new(
        container.left + (point.x - face_box.left) * scale_x,
        container.top + (point.y - face_box.top) * scale_y,
    ))
}

/// 前面カメラの場合に矩形を水平反転する
///
/// 前面センサーの画像はユーザー自身の左右に対して反転しているため、
/// `left' = preview_width - right`, `right' = preview_width - left`
/// で水平軸を折り返す。背面カメラでは恒等写像。
/// 2回適用すると元の矩形に戻る（対合）。
pub fn mirror_if_front_facing(rect: &RectF, preview_width: f32, facing: CameraFacing) -> RectF {
    match facing {
        CameraFacing::Front => RectF::new(
            preview_width - rect.right,
            rect.top,
            preview_width - rect.left,
            rect.bottom,
        ),
        CameraFacing::Back => *rect,
    }
}
