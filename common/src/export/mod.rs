//! Export core modules shared by the CLI writers.
//!
//! 各形式で同じ列構成を使う。

pub mod csv;

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::types::BarcodeRecord;

/// 出力列
pub const COLUMNS: [&str; 6] = ["Code", "Type", "Valid", "Timestamp", "Origin", "Confidence"];

/// 日時の出力形式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// レコードを列順の文字列に変換
pub fn record_row(record: &BarcodeRecord) -> [String; 6] {
    [
        record.text.clone(),
        record.symbology.label().to_string(),
        record.is_valid.to_string(),
        record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        record.origin_info.clone().unwrap_or_default(),
        record
            .confidence
            .map(|c| format!("{:.1}", c))
            .unwrap_or_default(),
    ]
}
