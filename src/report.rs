//! `validate` コマンドの表示用

use barcode_scan_common::{classify, expand_upce, Symbology};
use serde::Serialize;

/// 1コード分の検証結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub code: String,
    pub symbology: Symbology,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// UPC-Eの場合の展開結果
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc_a: Option<String>,
}

impl ValidationReport {
    pub fn from_code(code: &str) -> Self {
        let classification = classify(code);
        let upc_a = match classification.symbology {
            Symbology::UpcE => expand_upce(code),
            _ => None,
        };

        Self {
            code: code.to_string(),
            symbology: classification.symbology,
            valid: classification.is_valid,
            origin: classification.origin_info,
            upc_a,
        }
    }

    /// 1行表示
    pub fn render(&self) -> String {
        let mut line = format!(
            "{} {}: {}",
            if self.valid { "✔" } else { "✘" },
            self.code,
            self.symbology
        );
        if let Some(origin) = &self.origin {
            line.push_str(&format!(" / {}", origin));
        }
        if let Some(upc_a) = &self.upc_a {
            line.push_str(&format!(" (UPC-A: {})", upc_a));
        }
        line
    }
}
