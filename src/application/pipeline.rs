//! パイプライン制御モジュール
//!
//! Source / Detection の2スレッド構成でパイプラインを制御します。
//!
//! ## スレッド構成
//! - Sourceスレッド: フレーム取得とadmission判定（同期・非ブロッキング）
//! - Detectionスレッド: 顔検出・視線分類・スナップショット公開
//!
//! admission制御（在飛行は常に最大1枚）により検出完了はadmissionに対して
//! 直列化され、後のフレームの結果が先のフレームの結果で上書きされることはない。

use crate::application::admission::{AdmissionDecision, AdmittedFrame, FrameAdmissionController};
use crate::application::overlay_store::OverlayStore;
use crate::application::stats::{StatKind, StatsCollector};
use crate::domain::{
    error::{DomainError, DomainResult},
    ports::{FaceDetectorPort, FrameSourcePort, GazeModelPort},
    types::GazeLabel,
};
use crate::measure_span;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// パイプライン実行オプション
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// 統計出力間隔
    pub stats_interval: Duration,
    /// ソースエラー後の再試行待機時間
    pub source_retry_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            stats_interval: Duration::from_secs(10),
            source_retry_delay: Duration::from_millis(10),
        }
    }
}

/// teardown要求ハンドル（スレッド間共有、ロックフリー）
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// teardownを要求する（新規admissionの停止）
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// パイプライン実行コンテキスト
pub struct PipelineRunner<S, D, G>
where
    S: FrameSourcePort,
    D: FaceDetectorPort,
    G: GazeModelPort,
{
    source: S,
    detector: D,
    gaze_model: G,
    store: OverlayStore,
    options: PipelineOptions,
    shutdown: ShutdownHandle,
    admission: FrameAdmissionController,
    stats: Arc<Mutex<StatsCollector>>,
}

impl<S, D, G> PipelineRunner<S, D, G>
where
    S: FrameSourcePort + 'static,
    D: FaceDetectorPort + 'static,
    G: GazeModelPort + 'static,
{
    /// 新しいPipelineRunnerを作成
    pub fn new(
        source: S,
        detector: D,
        gaze_model: G,
        store: OverlayStore,
        options: PipelineOptions,
    ) -> Self {
        let stats = Arc::new(Mutex::new(StatsCollector::new(options.stats_interval)));
        Self {
            source,
            detector,
            gaze_model,
            store,
            options,
            shutdown: ShutdownHandle::new(),
            admission: FrameAdmissionController::new(),
            stats,
        }
    }

    /// teardown用ハンドルを取得（run前にcloneしておく）
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// パイプラインを起動（ブロッキング）
    ///
    /// ソースのストリーム終端またはshutdown要求まで戻らない。
    /// 終了時は在飛行フレームを解放し、ストアを空にリセットする。
    pub fn run(self) -> DomainResult<()> {
        // 容量1で十分: admission排他により在飛行は常に最大1枚
        let (tx, rx) = bounded::<AdmittedFrame>(1);

        // Source Thread
        let source_handle = {
            let shutdown = self.shutdown.clone();
            let admission = self.admission.clone();
            let stats = Arc::clone(&self.stats);
            let retry_delay = self.options.source_retry_delay;
            let source = self.source;
            std::thread::Builder::new()
                .name("frame-source".to_string())
                .spawn(move || {
                    source_loop(source, admission, tx, shutdown, stats, retry_delay);
                })
                .map_err(|e| {
                    DomainError::Initialization(format!("Failed to spawn source thread: {}", e))
                })?
        };

        // Detection（呼び出しスレッドで実行）
        detection_loop(
            self.detector,
            self.gaze_model,
            rx,
            &self.store,
            &self.stats,
        );

        let _ = source_handle.join();

        // teardown: 描画側には空のスナップショットが見える
        self.store.clear();
        tracing::info!("Pipeline terminated, overlay cleared");

        Ok(())
    }
}

/// Sourceスレッドのメインループ
///
/// フレームごとにadmission判定を行う。判定は同期・非ブロッキングで、
/// ソースは待たされることなく破棄のみ行う（バックプレッシャ）。
fn source_loop<S: FrameSourcePort>(
    mut source: S,
    admission: FrameAdmissionController,
    tx: Sender<AdmittedFrame>,
    shutdown: ShutdownHandle,
    stats: Arc<Mutex<StatsCollector>>,
    retry_delay: Duration,
) {
    tracing::info!("Source thread started");

    while !shutdown.is_requested() {
        match source.next_frame() {
            Ok(Some(frame)) => match admission.try_admit(frame) {
                AdmissionDecision::Admitted(admitted) => {
                    stats.lock().unwrap().record_admitted();
                    if !send_admitted(&tx, admitted) {
                        break;
                    }
                }
                AdmissionDecision::Dropped => {
                    // 正常系: keep-only-latestの破棄（エラーではない）
                    stats.lock().unwrap().record_dropped();
                }
            },
            Ok(None) => {
                tracing::info!("Frame source reached end of stream");
                break;
            }
            Err(e) => {
                #[cfg(debug_assertions)]
                tracing::warn!("Source error: {:?}", e);
                #[cfg(not(debug_assertions))]
                let _ = e;

                std::thread::sleep(retry_delay);
            }
        }
    }

    let (admitted, dropped) = stats.lock().unwrap().admission_counts();
    tracing::info!(
        "Source thread exiting: admitted={}, dropped={}",
        admitted,
        dropped
    );
    // txのDropでDetectionスレッドのrecvが終了する
}

/// 受理済みフレームをDetectionスレッドへ送信
///
/// admission排他によりスロットは常に空いているはずだが、万一Fullなら
/// フレームとpermitをその場で解放する（送信前キャンセル）。
///
/// # Returns
/// チャネルが切断されていた場合は false
fn send_admitted(tx: &Sender<AdmittedFrame>, admitted: AdmittedFrame) -> bool {
    match tx.try_send(admitted) {
        Ok(_) => true,
        Err(TrySendError::Full(stale)) => {
            drop(stale);
            true
        }
        Err(TrySendError::Disconnected(stale)) => {
            drop(stale);
            false
        }
    }
}

/// Detectionループ（専用ワーカー）
///
/// 成功時: 検出顔リスト・視線ラベル・派生ジオメトリを1回の
/// アトミック書き込みでスナップショットに反映する。
/// 失敗時: ログのみで直前のスナップショットを維持する
/// （描画側に空白状態を見せない）。
/// どちらの経路でもフレームは解放され、在飛行状態がクリアされる。
fn detection_loop<D: FaceDetectorPort, G: GazeModelPort>(
    mut detector: D,
    mut gaze_model: G,
    rx: Receiver<AdmittedFrame>,
    store: &OverlayStore,
    stats: &Arc<Mutex<StatsCollector>>,
) {
    tracing::info!("Detection thread started");

    while let Ok(admitted) = rx.recv() {
        let AdmittedFrame { frame, permit } = admitted;
        let captured_at = frame.timestamp;

        let detect_start = Instant::now();
        let result = measure_span!("detect", detector.detect(&frame));

        match result {
            Ok(faces) => {
                let detect_time = detect_start.elapsed();
                let publish_start = Instant::now();

                // 視線ラベルは同一サイクルの主要顔からのみ導出する。
                // 分類エラーはサイクルを失敗させず、Unknownに縮退。
                let gaze_label = match faces.first() {
                    Some(primary) => gaze_model.classify(primary).unwrap_or_else(|e| {
                        #[cfg(debug_assertions)]
                        tracing::debug!("Classifier unavailable: {:?}", e);
                        #[cfg(not(debug_assertions))]
                        let _ = e;

                        GazeLabel::Unknown
                    }),
                    None => GazeLabel::Unknown,
                };

                store.publish(faces, gaze_label);

                let now = Instant::now();
                let mut guard = stats.lock().unwrap();
                guard.record_cycle();
                guard.record_duration(StatKind::Detect, detect_time);
                guard.record_duration(StatKind::Publish, now.duration_since(publish_start));
                guard.record_duration(StatKind::EndToEnd, now.duration_since(captured_at));
                if guard.should_report() {
                    guard.report_and_reset();
                }
            }
            Err(e) => {
                // 直前のスナップショットを維持（last-good-value）
                #[cfg(debug_assertions)]
                tracing::error!("Detection error: {:?}", e);
                #[cfg(not(debug_assertions))]
                let _ = e;

                stats.lock().unwrap().record_detect_error();
            }
        }

        // フレーム解放 → 在飛行クリア（次のadmissionを許可）
        drop(frame);
        drop(permit);
    }

    tracing::info!("Detection thread exiting");
}
