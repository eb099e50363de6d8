//! CSV出力（CLI版）

use crate::error::Result;
use barcode_scan_common::export::csv::to_csv;
use barcode_scan_common::BarcodeRecord;
use std::path::Path;

pub fn write_csv(records: &[BarcodeRecord], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, to_csv(records))?;
    Ok(())
}
