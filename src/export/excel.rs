//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::Result;
use barcode_scan_common::export::excel_core::generate_excel_buffer;
use barcode_scan_common::BarcodeRecord;
use std::path::Path;

pub fn write_excel(records: &[BarcodeRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(records)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
