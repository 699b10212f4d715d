//! アプリケーション層
//!
//! ドメインのポートを組み合わせてパイプラインを構成します。
//! フレーム受理制御、オーバーレイ状態の公開、統計収集を含みます。

pub mod admission;
pub mod overlay_store;
pub mod pipeline;
pub mod stats;

pub use admission::{AdmissionDecision, AdmittedFrame, FrameAdmissionController, InFlightPermit};
pub use overlay_store::OverlayStore;
pub use pipeline::{PipelineOptions, PipelineRunner, ShutdownHandle};
pub use stats::{StatKind, StatsCollector};
