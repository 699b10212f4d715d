/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// すべての処理で共有される不変の型。

use std::time::Instant;

/// 検出器座標系の2D点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 浮動小数点の矩形（left/top/right/bottom）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// 矩形の幅を取得
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// 矩形の高さを取得
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// 幅または高さがゼロ以下か判定
    ///
    /// スケール係数の分母になるため、trueの場合は座標変換をスキップする。
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// キャプチャされたカメラフレーム
///
/// 所有権がそのまま解放責務を表す: Frameは admission で move され、
/// 成功・失敗・破棄のどの経路でもちょうど1回 Drop される。
#[derive(Debug)]
pub struct Frame {
    /// フレーム取得時刻
    pub timestamp: Instant,
    /// フレーム画像データ（連続メモリ、フォーマットは検出器任せ）
    pub data: Vec<u8>,
    /// 画像の幅
    pub width: u32,
    /// 画像の高さ
    pub height: u32,
    /// センサー回転（度、0/90/180/270）
    pub rotation_degrees: u32,
}

impl Frame {
    /// 新しいフレームを作成
    pub fn new(data: Vec<u8>, width: u32, height: u32, rotation_degrees: u32) -> Self {
        Self {
            timestamp: Instant::now(),
            data,
            width,
            height,
            rotation_degrees,
        }
    }
}

/// 顔ランドマークの種別（検出器の固定セット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    LeftEye,
    RightEye,
    NoseBase,
    MouthLeft,
    MouthRight,
    MouthBottom,
    LeftEar,
    RightEar,
    LeftCheek,
    RightCheek,
}

/// 名前付きランドマーク
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub position: PointF,
}

impl Landmark {
    pub fn new(kind: LandmarkKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: PointF::new(x, y),
        }
    }
}

/// 顔輪郭（順序付きの頂点列）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<PointF>,
}

impl Contour {
    pub fn new(points: Vec<PointF>) -> Self {
        Self { points }
    }
}

/// 1回の検出サイクルで得られた顔
///
/// 次のサイクルで丸ごと置き換えられる（差分マージはしない）。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedFace {
    /// バウンディングボックス（検出器座標系、ピクセル）
    pub bounding_box: RectF,
    /// 名前付きランドマークの列
    pub landmarks: Vec<Landmark>,
    /// 輪郭の列
    pub contours: Vec<Contour>,
}

impl DetectedFace {
    /// 指定種別のランドマーク位置を取得
    pub fn landmark(&self, kind: LandmarkKind) -> Option<PointF> {
        self.landmarks
            .iter()
            .find(|l| l.kind == kind)
            .map(|l| l.position)
    }
}

/// 視線の離散分類ラベル
///
/// 閉じたタグ付きenum。分類ロジックは domain::gaze 側にあり、
/// ラベル自体は振る舞いを持たない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GazeLabel {
    Left,
    Right,
    Up,
    Down,
    Center,
    /// ヒューリスティック経路では生成されない（モデル実装の予約値）
    Blink,
    #[default]
    Unknown,
}

impl GazeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Center => "center",
            Self::Blink => "blink",
            Self::Unknown => "unknown",
        }
    }
}

/// カメラの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    /// 前面カメラ（画像が左右反転している）
    Front,
    /// 背面カメラ
    Back,
}

/// カメラバインド時に通知されるプレビュー情報
///
/// バインド/再バインドごとに1回設定され、次のバインドまで不変。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInfo {
    pub preview_width: u32,
    pub preview_height: u32,
    pub facing: CameraFacing,
}

impl CameraInfo {
    pub fn new(preview_width: u32, preview_height: u32, facing: CameraFacing) -> Self {
        Self {
            preview_width,
            preview_height,
            facing,
        }
    }
}

/// 描画座標系のポインタ位置
///
/// GazeLabelの遷移から決定的に導出される。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 描画側から観測される不変スナップショット
///
/// 全フィールドは同一の検出サイクルから一括で再計算される。
/// 読み手がサイクルの異なるフィールドの組を観測することはない。
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySnapshot {
    /// 現在の検出顔リスト（空の場合あり）
    pub faces: Vec<DetectedFace>,
    /// 現在のカメラ情報（バインド前はNone）
    pub camera: Option<CameraInfo>,
    /// 主要顔のバウンディングボックス（前面カメラならミラー済み）
    pub primary_box: Option<RectF>,
    /// 主要顔を収めるオーバーレイ上のコンテナ矩形
    pub container: Option<RectF>,
    /// 現在の視線ラベル
    pub gaze: GazeLabel,
    /// 現在のポインタ位置
    pub pointer: PointerPosition,
}

impl OverlaySnapshot {
    /// 空のスナップショットを作成（顔なし、コンテナなし）
    pub fn empty(default_pointer: PointerPosition) -> Self {
        Self {
            faces: Vec::new(),
            camera: None,
            primary_box: None,
            container: None,
            gaze: GazeLabel::Unknown,
            pointer: default_pointer,
        }
    }

    /// 主要顔（リスト先頭）を取得
    pub fn primary_face(&self) -> Option<&DetectedFace> {
        self.faces.first()
    }
}
