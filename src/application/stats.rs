//! 統計情報管理モジュール
//!
//! 検出サイクルのFPS、各処理段階のレイテンシ、admission受理/破棄数の
//! 統計を収集・出力します。

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 統計情報の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// 顔検出時間
    Detect,
    /// スナップショット公開時間（分類+ジオメトリ+書き込み）
    Publish,
    /// エンドツーエンドのレイテンシ（キャプチャ→公開）
    EndToEnd,
}

/// パーセンタイル統計値
#[derive(Debug, Clone)]
pub struct PercentileStats {
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub count: usize,
}

/// 統計情報コレクター
#[derive(Debug)]
pub struct StatsCollector {
    /// FPS計測用のサイクル完了タイムスタンプ（最大1秒分保持）
    cycle_times: VecDeque<Instant>,
    /// 各処理段階の所要時間（最大1000サンプル保持）
    durations: std::collections::HashMap<StatKind, VecDeque<Duration>>,
    /// admissionで受理されたフレーム数
    admitted_count: u64,
    /// admissionで破棄されたフレーム数
    dropped_count: u64,
    /// 検出エラー数
    detect_error_count: u64,
    /// 最後の統計出力時刻
    last_report: Instant,
    /// 統計出力間隔
    report_interval: Duration,
}

impl StatsCollector {
    /// 新しいStatsCollectorを作成
    ///
    /// # Arguments
    /// * `report_interval` - 統計出力間隔（例: 10秒）
    pub fn new(report_interval: Duration) -> Self {
        Self {
            cycle_times: VecDeque::new(),
            durations: std::collections::HashMap::new(),
            admitted_count: 0,
            dropped_count: 0,
            detect_error_count: 0,
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// FPS計算の時間範囲（1秒間のサイクル数を計測）
    const FPS_WINDOW_SECS: u64 = 1;

    /// 検出サイクル完了を記録（FPS計測用）
    pub fn record_cycle(&mut self) {
        let now = Instant::now();
        self.cycle_times.push_back(now);

        // 指定秒数より古いタイムスタンプを削除
        let window = Duration::from_secs(Self::FPS_WINDOW_SECS);
        while let Some(&front) = self.cycle_times.front() {
            if now.duration_since(front) > window {
                self.cycle_times.pop_front();
            } else {
                break;
            }
        }
    }

    /// admissionの受理を記録
    pub fn record_admitted(&mut self) {
        self.admitted_count += 1;
    }

    /// admissionの破棄を記録（正常系、エラーではない）
    pub fn record_dropped(&mut self) {
        self.dropped_count += 1;
    }

    /// 検出エラーを記録
    pub fn record_detect_error(&mut self) {
        self.detect_error_count += 1;
    }

    /// 最大サンプル保持数（パーセンタイル計算用）
    const MAX_DURATION_SAMPLES: usize = 1000;

    /// 処理時間を記録
    pub fn record_duration(&mut self, kind: StatKind, duration: Duration) {
        let queue = self.durations.entry(kind).or_default();
        queue.push_back(duration);

        // 最大サンプル数を超えたら古いデータを破棄
        if queue.len() > Self::MAX_DURATION_SAMPLES {
            queue.pop_front();
        }
    }

    /// 現在のFPSを計算
    pub fn current_fps(&self) -> f64 {
        if self.cycle_times.is_empty() {
            return 0.0;
        }

        let count = self.cycle_times.len() as f64;
        if let (Some(&first), Some(&last)) = (self.cycle_times.front(), self.cycle_times.back()) {
            let elapsed = last.duration_since(first).as_secs_f64();
            if elapsed > 0.0 {
                return count / elapsed;
            }
        }
        0.0
    }

    /// 受理/破棄カウントを取得
    pub fn admission_counts(&self) -> (u64, u64) {
        (self.admitted_count, self.dropped_count)
    }

    /// パーセンタイル統計を計算
    ///
    /// # Returns
    /// パーセンタイル統計値。データがない場合は None
    pub fn percentile_stats(&self, kind: StatKind) -> Option<PercentileStats> {
        let queue = self.durations.get(&kind)?;
        if queue.is_empty() {
            return None;
        }

        let mut sorted: Vec<Duration> = queue.iter().copied().collect();
        sorted.sort();

        let count = sorted.len();
        let p50 = sorted[count * 50 / 100];
        let p95 = sorted[count * 95 / 100];
        let p99 = sorted[count * 99 / 100];

        Some(PercentileStats {
            p50,
            p95,
            p99,
            count,
        })
    }

    /// 統計レポートを出力すべきか判定
    pub fn should_report(&self) -> bool {
        self.last_report.elapsed() >= self.report_interval
    }

    /// 統計レポートを出力してタイマーをリセット
    #[cfg(debug_assertions)]
    pub fn report_and_reset(&mut self) {
        use tracing::info;

        info!("=== Pipeline Statistics ===");
        info!("Cycle FPS: {:.1}", self.current_fps());
        info!(
            "Admission: admitted={}, dropped={}",
            self.admitted_count, self.dropped_count
        );

        for kind in [StatKind::Detect, StatKind::Publish, StatKind::EndToEnd] {
            if let Some(stats) = self.percentile_stats(kind) {
                info!(
                    "{:?}: p50={:.2}ms, p95={:.2}ms, p99={:.2}ms (n={})",
                    kind,
                    stats.p50.as_secs_f64() * 1000.0,
                    stats.p95.as_secs_f64() * 1000.0,
                    stats.p99.as_secs_f64() * 1000.0,
                    stats.count
                );
            }
        }

        info!("Detect error count: {}", self.detect_error_count);
        info!("===========================");

        self.last_report = Instant::now();
    }

    /// Release build用のダミー実装
    #[cfg(not(debug_assertions))]
    pub fn report_and_reset(&mut self) {
        self.last_report = Instant::now();
    }
}
