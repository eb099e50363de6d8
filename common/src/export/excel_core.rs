//! Excel生成（共通ライブラリ）
//!
//! CSVと同じ列構成で1シートのワークブックを生成する。

use super::{record_row, COLUMNS};
use crate::error::{Error, Result};
use crate::types::BarcodeRecord;
use rust_xlsxwriter::*;

/// シート名
pub const SHEET_NAME: &str = "Barcodes";

/// 列幅（文字数単位）
const COLUMN_WIDTHS: [f64; 6] = [18.0, 12.0, 8.0, 20.0, 28.0, 12.0];

fn export_error(context: &str, e: XlsxError) -> Error {
    Error::Export(format!("{}: {}", context, e))
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(records: &[BarcodeRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)
        .map_err(|e| export_error("シート名設定エラー", e))?;

    for (col, (title, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, width)
            .map_err(|e| export_error("列幅設定エラー", e))?;
        worksheet.write_string_with_format(0, col, *title, &header_format)
            .map_err(|e| export_error("ヘッダ書き込みエラー", e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let values = record_row(record);

        worksheet.write_string(row, 0, &values[0])
            .map_err(|e| export_error("値書き込みエラー", e))?;
        worksheet.write_string(row, 1, &values[1])
            .map_err(|e| export_error("値書き込みエラー", e))?;
        worksheet.write_boolean(row, 2, record.is_valid)
            .map_err(|e| export_error("値書き込みエラー", e))?;
        worksheet.write_string(row, 3, &values[3])
            .map_err(|e| export_error("値書き込みエラー", e))?;
        worksheet.write_string(row, 4, &values[4])
            .map_err(|e| export_error("値書き込みエラー", e))?;
        if let Some(confidence) = record.confidence {
            worksheet.write_number(row, 5, f64::from(confidence))
                .map_err(|e| export_error("値書き込みエラー", e))?;
        }
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| export_error("Excel保存エラー", e))
}
