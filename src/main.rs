mod domain;
mod logging;
mod application;
mod infrastructure;

use crate::application::overlay_store::OverlayStore;
use crate::application::pipeline::{PipelineOptions, PipelineRunner};
use crate::domain::config::AppConfig;
use crate::infrastructure::heuristic_gaze::HeuristicGazeAdapter;
use crate::infrastructure::mock_detector::MockFaceDetectorAdapter;
use crate::infrastructure::mock_source::MockFrameSourceAdapter;
use crate::logging::init_logging;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("eyepointer starting...");

    match run() {
        Ok(_) => {
            tracing::info!("eyepointer terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> Result<(), Box<dyn std::error::Error>> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    // 設定の検証
    config.validate()?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Camera: {}x{}, facing={:?}",
        config.camera.preview_width,
        config.camera.preview_height,
        config.camera.facing
    );
    tracing::info!(
        "Classifier: threshold={}, Overlay: height_fraction={}, margin={}px",
        config.classifier.threshold,
        config.overlay.container_height_fraction,
        config.overlay.margin_px
    );

    // モックフレームソースの初期化（実カメラは未接続）
    tracing::info!("Initializing mock frame source adapter...");
    let source = MockFrameSourceAdapter::new(
        config.camera.preview_width,
        config.camera.preview_height,
        config.source.tick_interval(),
        config.source.frame_limit,
    );

    // モック顔検出アダプタの初期化（実MLモデルは未接続）
    tracing::info!("Initializing mock face detector adapter...");
    let detector = MockFaceDetectorAdapter::new();

    // ヒューリスティック視線分類の初期化
    tracing::info!("Initializing heuristic gaze adapter...");
    let gaze_model = HeuristicGazeAdapter::new(config.classifier.threshold);

    // オーバーレイ状態ストアの初期化とカメラバインド
    let store = OverlayStore::new(config.overlay.clone(), config.pointer.clone());
    store.set_camera_info(
        config.camera.preview_width,
        config.camera.preview_height,
        config.camera.facing.into(),
    );

    // 描画側リーダー（スナップショットの定期観測デモ）
    let render_stop = Arc::new(AtomicBool::new(false));
    let render_handle = {
        let store = store.clone();
        let stop = Arc::clone(&render_stop);
        std::thread::spawn(move || {
            while !stop.load(Ordering::Acquire) {
                let snapshot = store.read();

                // 描画側と同じ手順で鼻根をコンテナ座標に写像してみる
                let mapped_nose = snapshot.primary_face().zip(snapshot.container).and_then(
                    |(face, container)| {
                        let nose = face.landmark(domain::types::LandmarkKind::NoseBase)?;
                        domain::geometry::map_point(&nose, &face.bounding_box, &container)
                    },
                );

                tracing::debug!(
                    faces = snapshot.faces.len(),
                    gaze = snapshot.gaze.as_str(),
                    pointer_x = snapshot.pointer.x,
                    pointer_y = snapshot.pointer.y,
                    nose = ?mapped_nose,
                    "Overlay snapshot"
                );
                std::thread::sleep(Duration::from_secs(1));
            }
        })
    };

    let options = PipelineOptions {
        stats_interval: Duration::from_secs(config.pipeline.stats_interval_sec),
        ..PipelineOptions::default()
    };

    tracing::info!("Starting pipeline with 2-thread architecture...");
    tracing::info!("Threads: Source -> Detection (keep-only-latest admission)");

    // パイプラインの起動（ブロッキング）
    let runner = PipelineRunner::new(source, detector, gaze_model, store, options);

    runner.run()?;

    render_stop.store(true, Ordering::Release);
    let _ = render_handle.join();

    Ok(())
}
