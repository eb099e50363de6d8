//! 検出イベント（外部デコーダの出力1行分）
//!
//! ワーカーの結果メッセージと同じ形:
//! `{"type":"result","success":true,"text":"...","format":"EAN_13","confidence":82.0,"timestampMs":...}`

use barcode_scan_common::RawDetection;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// メッセージ種別（"result" 以外は無視）
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    /// 信頼度 (0..100)
    #[serde(default)]
    pub confidence: Option<f32>,

    /// 検出時刻（UNIXエポックからのミリ秒）
    #[serde(default)]
    pub timestamp_ms: Option<i64>,

    /// デコード失敗時のメッセージ
    #[serde(default)]
    pub error: Option<String>,
}

/// 安定化器に渡す1件分
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedDetection {
    pub detection: RawDetection,
    pub at: Option<DateTime<Local>>,
}

impl DetectionEvent {
    /// 成功した読取のみ変換（失敗・空文字・他種別は `None`）
    pub fn into_detection(self) -> Option<ScannedDetection> {
        if self.kind.as_deref().is_some_and(|k| k != "result") || !self.success {
            return None;
        }

        let text = self.text.filter(|t| !t.is_empty())?;
        let at = self
            .timestamp_ms
            .and_then(|ms| Local.timestamp_millis_opt(ms).single());

        Some(ScannedDetection {
            detection: RawDetection {
                text,
                format: self.format.unwrap_or_default(),
                confidence: self.confidence,
            },
            at,
        })
    }
}
