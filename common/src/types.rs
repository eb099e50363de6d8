//! バーコード関連の型定義
//!
//! CLIと外部デコーダ連携で共有される型:
//! - RawDetection: 外部デコーダ（ZXing/Quagga等）の生の読取結果
//! - Symbology: 検証済みの符号体系
//! - BarcodeRecord: 確定した読取レコード（安定化後の最終出力）

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 符号体系
///
/// ISBN-13 / ISSN はEAN-13のプレフィックスによる細分類で、
/// チェックサム規則は EAN-13 と同一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "EAN-8")]
    Ean8,
    #[serde(rename = "UPC-A")]
    UpcA,
    #[serde(rename = "UPC-E")]
    UpcE,
    #[serde(rename = "ISBN-13")]
    Isbn13,
    #[serde(rename = "ISSN")]
    Issn,
    #[serde(rename = "Desconhecido", alias = "Unknown")]
    Unknown,
}

impl Symbology {
    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Isbn13 => "ISBN-13",
            Symbology::Issn => "ISSN",
            Symbology::Unknown => "Desconhecido",
        }
    }

    /// EAN-13系（EAN-13 / ISBN-13 / ISSN）かどうか
    pub fn is_ean13_family(&self) -> bool {
        matches!(self, Symbology::Ean13 | Symbology::Isbn13 | Symbology::Issn)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 外部デコーダからの生の読取結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDetection {
    pub text: String,

    /// デコーダが報告した形式名（"EAN_13" 等）。検証には使わない
    #[serde(default)]
    pub format: String,

    /// 信頼度 (0..100)
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RawDetection {
    pub fn new(text: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: format.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// 確定した読取レコード
///
/// セッション内で同一コードにつき一度だけ生成される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRecord {
    pub text: String,

    pub symbology: Symbology,

    /// 桁数に対応するチェックサム規則の結果
    pub is_valid: bool,

    /// 原産国・用途（EAN-13系のみ）
    #[serde(default)]
    pub origin_info: Option<String>,

    pub timestamp: DateTime<Local>,

    #[serde(default)]
    pub confidence: Option<f32>,
}
