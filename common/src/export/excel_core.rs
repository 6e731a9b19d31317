//! Excel生成（共通ライブラリ）
//!
//! 蓄積した不備一覧を1シートの表としてxlsxに書き出す

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use super::header_label;
use crate::error::{Error, Result};
use crate::types::{DeficiencyRecord, DEFICIENCY_FIELDS};

const SHEET_NAME: &str = "Deficiencies";

/// 列幅（文字数）。issueDescription などの長文列は広め
fn column_width(key: &str) -> f64 {
    match key {
        "issueDescription" | "inspectorNotes" => 48.0,
        "location" | "actionRequired" | "photoLinks" => 28.0,
        "quantity" | "resultMark" => 10.0,
        _ => 16.0,
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `records` - 出力するレコード（表示順）
pub fn generate_excel_buffer(records: &[DeficiencyRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x3730A3))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    let value_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let section_format = value_format.clone().set_bold().set_font_color(Color::RGB(0x4F46E5));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| Error::Export(format!("シート名設定エラー: {}", e)))?;

    for (col, key) in DEFICIENCY_FIELDS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, column_width(key))
            .map_err(|e| Error::Export(format!("列幅設定エラー: {}", e)))?;
        worksheet
            .write_string_with_format(0, col, header_label(key), &header_format)
            .map_err(|e| Error::Export(format!("見出し書き込みエラー: {}", e)))?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, key) in DEFICIENCY_FIELDS.iter().enumerate() {
            let col = col as u16;
            let written = match (*key, record.quantity_value()) {
                // 数量は数値セルとして書く
                ("quantity", Some(quantity)) => {
                    worksheet.write_number_with_format(row, col, quantity, &value_format)
                }
                ("sectionLabel", _) => {
                    worksheet.write_string_with_format(row, col, record.field_value(key), &section_format)
                }
                _ => worksheet.write_string_with_format(row, col, record.field_value(key), &value_format),
            };
            written.map_err(|e| Error::Export(format!("値書き込みエラー: {}", e)))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| Error::Export(format!("ウィンドウ枠固定エラー: {}", e)))?;
    if !records.is_empty() {
        worksheet
            .autofilter(0, 0, records.len() as u32, DEFICIENCY_FIELDS.len() as u16 - 1)
            .map_err(|e| Error::Export(format!("フィルタ設定エラー: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Export(format!("Excel保存エラー: {}", e)))
}
