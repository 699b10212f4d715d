//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{CameraFacing, CameraInfo, DomainError, DomainResult, PointerPosition};

/// カメラの向き（設定値）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FacingConfig {
    /// 前面カメラ（オーバーレイで左右反転する）
    #[default]
    Front,
    /// 背面カメラ
    Back,
}

impl From<FacingConfig> for CameraFacing {
    fn from(config: FacingConfig) -> Self {
        match config {
            FacingConfig::Front => CameraFacing::Front,
            FacingConfig::Back => CameraFacing::Back,
        }
    }
}

/// アプリケーション設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// カメラプレビュー設定
    pub camera: CameraConfig,
    /// フレームソース設定
    pub source: SourceConfig,
    /// 視線分類設定
    pub classifier: ClassifierConfig,
    /// オーバーレイ配置設定
    pub overlay: OverlayConfig,
    /// ポインタターゲット設定
    pub pointer: PointerConfig,
    /// パイプライン設定
    pub pipeline: PipelineConfig,
}

/// カメラプレビュー設定
///
/// バインド時に setCameraInfo として Overlay State Store に通知される。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CameraConfig {
    /// プレビュー幅（ピクセル）
    pub preview_width: u32,

    /// プレビュー高さ（ピクセル）
    pub preview_height: u32,

    /// カメラの向き
    ///
    /// 選択肢: "front", "back"
    /// デフォルト: "front"
    #[serde(default)]
    pub facing: FacingConfig,
}

impl CameraConfig {
    /// デフォルトのプレビュー幅
    pub const DEFAULT_PREVIEW_WIDTH: u32 = 1080;
    /// デフォルトのプレビュー高さ
    pub const DEFAULT_PREVIEW_HEIGHT: u32 = 1920;

    /// Domain型のCameraInfoに変換
    #[allow(dead_code)]
    pub fn to_camera_info(&self) -> CameraInfo {
        CameraInfo::new(self.preview_width, self.preview_height, self.facing.into())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            preview_width: Self::DEFAULT_PREVIEW_WIDTH,
            preview_height: Self::DEFAULT_PREVIEW_HEIGHT,
            facing: FacingConfig::default(),
        }
    }
}

/// フレームソース設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceConfig {
    /// フレーム供給間隔（ミリ秒）
    ///
    /// デフォルト: 33ms（約30fps）
    pub tick_interval_ms: u64,

    /// 供給フレーム数の上限（0 = 無制限）
    ///
    /// 上限に達するとソースはストリーム終端を返し、
    /// パイプラインは正常終了する。デモ・テスト用。
    #[serde(default)]
    pub frame_limit: u64,
}

impl SourceConfig {
    /// デフォルトのフレーム供給間隔（ミリ秒）
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 33;

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            frame_limit: 0,
        }
    }
}

/// 視線分類設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifierConfig {
    /// しきい値（検出器座標系のピクセル）
    ///
    /// 両目平均と鼻根のオフセットがこの値を超えたら方向ラベルを出す
    /// デフォルト: 20.0
    pub threshold: f32,
}

impl ClassifierConfig {
    /// デフォルトのしきい値
    pub const DEFAULT_THRESHOLD: f32 = 20.0;
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// オーバーレイ配置設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverlayConfig {
    /// ビューポート高さに対するコンテナ高さの比率
    ///
    /// デフォルト: 0.333（1/3）
    pub container_height_fraction: f32,

    /// コンテナの右下隅からの余白（ピクセル）
    ///
    /// デフォルト: 20.0
    pub margin_px: f32,
}

impl OverlayConfig {
    /// デフォルトのコンテナ高さ比率（ビューポートの1/3）
    pub const DEFAULT_HEIGHT_FRACTION: f32 = 1.0 / 3.0;
    /// デフォルトの余白（ピクセル）
    pub const DEFAULT_MARGIN_PX: f32 = 20.0;
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            container_height_fraction: Self::DEFAULT_HEIGHT_FRACTION,
            margin_px: Self::DEFAULT_MARGIN_PX,
        }
    }
}

/// ポインタターゲット設定
///
/// 視線ラベルごとの固定ターゲット座標（描画座標系）。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PointerConfig {
    /// Left時のX座標
    pub left_x: f32,
    /// Right時のX座標
    pub right_x: f32,
    /// Up時のY座標
    pub up_y: f32,
    /// Down時のY座標
    pub down_y: f32,
    /// Center時のX座標（リセット位置）
    pub center_x: f32,
    /// Center時のY座標（リセット位置）
    pub center_y: f32,
}

impl PointerConfig {
    /// 既定の中心位置をPointerPositionとして取得
    pub fn default_position(&self) -> PointerPosition {
        PointerPosition::new(self.center_x, self.center_y)
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            left_x: 200.0,
            right_x: 800.0,
            up_y: 300.0,
            down_y: 1300.0,
            center_x: 500.0,
            center_y: 800.0,
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    /// 統計情報の出力間隔（秒）
    pub stats_interval_sec: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stats_interval_sec: 10,
        }
    }
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    #[allow(dead_code)]
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            DomainError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        // プレビュー寸法の検証
        if self.camera.preview_width == 0 || self.camera.preview_height == 0 {
            return Err(DomainError::Configuration(
                "Preview width and height must be greater than 0".to_string(),
            ));
        }

        // オーバーレイ設定の検証
        let overlay = &self.overlay;
        if overlay.container_height_fraction <= 0.0 || overlay.container_height_fraction > 1.0 {
            return Err(DomainError::Configuration(
                "Container height fraction must be in (0, 1]".to_string(),
            ));
        }
        if overlay.margin_px < 0.0 {
            return Err(DomainError::Configuration(
                "Overlay margin must be non-negative".to_string(),
            ));
        }

        // 分類しきい値の検証
        if self.classifier.threshold <= 0.0 {
            return Err(DomainError::Configuration(
                "Classifier threshold must be positive".to_string(),
            ));
        }

        // ソース間隔の検証
        if self.source.tick_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "Source tick interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.preview_width, 1080);
        assert_eq!(config.camera.preview_height, 1920);
        assert_eq!(config.camera.facing, FacingConfig::Front);
        assert_eq!(config.classifier.threshold, 20.0);
        assert_eq!(config.source.tick_interval_ms, 33);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // 不正なプレビュー寸法
        config.camera.preview_width = 0;
        assert!(config.validate().is_err());

        config.camera.preview_width = 1080;

        // 不正なコンテナ比率
        config.overlay.container_height_fraction = 0.0;
        assert!(config.validate().is_err());
        config.overlay.container_height_fraction = 1.5;
        assert!(config.validate().is_err());

        config.overlay.container_height_fraction = 1.0 / 3.0;

        // 不正なしきい値
        config.classifier.threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pointer_config_defaults() {
        // 既定のターゲット座標
        let pointer = PointerConfig::default();
        assert_eq!(pointer.left_x, 200.0);
        assert_eq!(pointer.right_x, 800.0);
        assert_eq!(pointer.up_y, 300.0);
        assert_eq!(pointer.down_y, 1300.0);
        assert_eq!(pointer.default_position(), PointerPosition::new(500.0, 800.0));
    }

    #[test]
    fn test_facing_conversion() {
        let front: CameraFacing = FacingConfig::Front.into();
        let back: CameraFacing = FacingConfig::Back.into();
        assert_eq!(front, CameraFacing::Front);
        assert_eq!(back, CameraFacing::Back);
    }

    #[test]
    fn test_camera_config_to_info() {
        let config = CameraConfig {
            preview_width: 720,
            preview_height: 1280,
            facing: FacingConfig::Back,
        };
        let info = config.to_camera_info();
        assert_eq!(info.preview_width, 720);
        assert_eq!(info.preview_height, 1280);
        assert_eq!(info.facing, CameraFacing::Back);
    }

    #[test]
    fn test_config_parsing() {
        let toml = r#"
            [camera]
            preview_width = 720
            preview_height = 1280
            facing = "back"

            [source]
            tick_interval_ms = 16
            frame_limit = 100

            [classifier]
            threshold = 25.0

            [overlay]
            container_height_fraction = 0.25
            margin_px = 10.0

            [pointer]
            left_x = 100.0
            right_x = 900.0
            up_y = 200.0
            down_y = 1400.0
            center_x = 500.0
            center_y = 800.0

            [pipeline]
            stats_interval_sec = 5
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.camera.facing, FacingConfig::Back);
        assert_eq!(config.source.frame_limit, 100);
        assert_eq!(config.classifier.threshold, 25.0);
        assert_eq!(config.overlay.container_height_fraction, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip_via_file() {
        // tempfile経由でwrite_default → from_fileの往復を検証
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        AppConfig::write_default(&path).expect("write_default");
        let loaded = AppConfig::from_file(&path).expect("from_file");

        assert_eq!(loaded.camera.preview_width, 1080);
        assert_eq!(loaded.classifier.threshold, 20.0);
        loaded.validate().expect("default config must validate");
    }

    #[test]
    fn test_config_example_loads() {
        // config.toml.exampleが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml.example")
            .expect("config.toml.example must load");

        config
            .validate()
            .expect("config.toml.example must validate");
    }
}
