//! JSON入出力
//!
//! `scan` の結果を保存し、`export` で読み戻す。

use crate::error::{BarcodeScanError, Result};
use barcode_scan_common::BarcodeRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub fn write_json(records: &[BarcodeRecord], output_path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

pub fn read_json(input_path: &Path) -> Result<Vec<BarcodeRecord>> {
    if !input_path.exists() {
        return Err(BarcodeScanError::FileNotFound(input_path.display().to_string()));
    }

    let reader = BufReader::new(File::open(input_path)?);
    let records = serde_json::from_reader(reader)?;
    Ok(records)
}
