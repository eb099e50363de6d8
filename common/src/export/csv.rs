//! CSV生成
//!
//! 全フィールドをダブルクォートで囲み、内部の `"` は `""` にする。

use super::{record_row, COLUMNS};
use crate::types::BarcodeRecord;

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn push_line<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line = fields.into_iter().map(quote).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

/// レコード一覧をCSV文字列に変換（ヘッダ行付き）
pub fn to_csv(records: &[BarcodeRecord]) -> String {
    let mut out = String::new();
    push_line(&mut out, COLUMNS);

    for record in records {
        let row = record_row(record);
        push_line(&mut out, row.iter().map(String::as_str));
    }

    out
}
