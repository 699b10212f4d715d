//! インフラストラクチャ層
//!
//! ドメインのポートに対する具体的なアダプター実装。
//! 実カメラ・実MLモデルの代わりに決定的なモック実装を提供します。

pub mod heuristic_gaze;
pub mod mock_detector;
pub mod mock_source;

pub use heuristic_gaze::HeuristicGazeAdapter;
pub use mock_detector::MockFaceDetectorAdapter;
pub use mock_source::MockFrameSourceAdapter;
