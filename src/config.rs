use crate::cli::ExportFormat;
use crate::error::{BarcodeScanError, Result};
use barcode_scan_common::StabilizerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 確定判定の設定
    pub stabilizer: StabilizerConfig,
    /// 出力ファイル名の接頭辞
    pub file_prefix: String,
    /// 既定の出力形式 (csv/excel/json/both)
    pub default_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BarcodeScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("barcode-scan").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            stabilizer: StabilizerConfig::default(),
            file_prefix: "codigos_barras".into(),
            default_format: "csv".into(),
        }
    }

    /// 既定の出力形式（不正な値は設定エラー）
    pub fn export_format(&self) -> Result<ExportFormat> {
        self.default_format
            .parse()
            .map_err(BarcodeScanError::Config)
    }

    /// 指定があればそれを、なければ既定の出力形式を使う
    pub fn resolve_format(&self, format: Option<ExportFormat>) -> Result<ExportFormat> {
        match format {
            Some(format) => Ok(format),
            None => self.export_format(),
        }
    }

    /// 0 は無効として扱う
    pub fn set_consecutive_reads(&mut self, reads: usize) {
        self.stabilizer.consecutive_reads = (reads > 0).then_some(reads);
    }

    /// 0 は無効として扱う
    pub fn set_min_confidence(&mut self, percent: f32) {
        self.stabilizer.min_confidence = (percent > 0.0).then_some(percent);
    }

    /// 0 は無効として扱う
    pub fn set_min_interval_ms(&mut self, interval_ms: u64) {
        self.stabilizer.min_interval_ms = (interval_ms > 0).then_some(interval_ms);
    }

    pub fn reset(&mut self) {
        *self = Self::default_config();
    }
}
