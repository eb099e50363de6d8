pub mod csv;
pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use barcode_scan_common::BarcodeRecord;
use chrono::Local;
use std::path::{Path, PathBuf};

/// 既定のファイル名: `<接頭辞>_<YYYY-MM-DD>`
pub fn default_file_stem(prefix: &str) -> String {
    format!("{}_{}", prefix, Local::now().format("%Y-%m-%d"))
}

fn output_path_for_extension(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.csv", stem)),
            output.join(format!("{}.xlsx", stem)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        (
            parent.join(format!("{}.csv", stem)),
            parent.join(format!("{}.xlsx", stem)),
        )
    }
}

/// レコードを指定形式で書き出し、作成したファイルのパスを返す
///
/// `output` がディレクトリか拡張子なしなら `<stem>.<拡張子>` をその下に作る。
pub fn export_records(
    records: &[BarcodeRecord],
    format: ExportFormat,
    output: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    } else if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = match format {
        ExportFormat::Csv => {
            let path = output_path_for_extension(output, stem, "csv");
            csv::write_csv(records, &path)?;
            vec![path]
        }
        ExportFormat::Excel => {
            let path = output_path_for_extension(output, stem, "xlsx");
            excel::write_excel(records, &path)?;
            vec![path]
        }
        ExportFormat::Json => {
            let path = output_path_for_extension(output, stem, "json");
            json::write_json(records, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (csv_path, excel_path) = output_paths_for_both(output, stem);
            csv::write_csv(records, &csv_path)?;
            excel::write_excel(records, &excel_path)?;
            vec![csv_path, excel_path]
        }
    };

    for path in &written {
        println!("✔ 出力: {}", path.display());
    }

    Ok(written)
}
