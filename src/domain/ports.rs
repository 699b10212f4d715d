/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、Application層がDIで注入する。

use crate::domain::{DetectedFace, DomainResult, Frame, GazeLabel};

/// フレームソースポート: カメラフレームの供給を抽象化
///
/// UIシェル側が所有するフレームソース。レートは不定（バースト可）で、
/// パイプラインは届いたフレームごとにadmission判定を行う。
pub trait FrameSourcePort: Send {
    /// 次のフレームを取得する
    ///
    /// # Returns
    /// - `Ok(Some(Frame))`: 新しいフレーム
    /// - `Ok(None)`: ストリーム終端（以後のadmissionを停止する）
    /// - `Err(DomainError)`: 一時的なエラー（ログして再試行）
    fn next_frame(&mut self) -> DomainResult<Option<Frame>>;
}

/// 顔検出ポート: 顔・ランドマーク検出を抽象化
///
/// 検出は専用ワーカースレッド上で実行される。admission制御により
/// 同時に在飛行するフレームは常に1枚なので、呼び出しは直列化される。
pub trait FaceDetectorPort: Send {
    /// フレームから顔を検出する
    ///
    /// # Returns
    /// - `Ok(Vec<DetectedFace>)`: 検出された顔のリスト（先頭が主要顔、空も可）
    /// - `Err(DomainError)`: 検出エラー（パイプラインはログのみで回復）
    fn detect(&mut self, frame: &Frame) -> DomainResult<Vec<DetectedFace>>;
}

/// 視線モデルポート: 視線分類を抽象化
///
/// 差し替え可能な分類器。組み込みのヒューリスティック実装
/// （infrastructure::heuristic_gaze）がデフォルトで、モデルベースの
/// 実装はBlinkを追加で生成してよい。
/// 分類エラーはサイクルを失敗させず、Unknownに縮退する。
pub trait GazeModelPort: Send {
    /// 主要顔から視線ラベルを分類する
    fn classify(&mut self, face: &DetectedFace) -> DomainResult<GazeLabel>;
}
