//! クリップボード用TSV生成
//!
//! 1行目が見出し、以降1レコード1行。列順は DEFICIENCY_FIELDS 固定

use super::header_label;
use crate::types::{DeficiencyRecord, DEFICIENCY_FIELDS};

/// 値の中のタブ・改行を空白1つに置き換える
pub fn sanitize_cell(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// 見出し行
pub fn header_row() -> String {
    DEFICIENCY_FIELDS
        .iter()
        .map(|key| header_label(key))
        .collect::<Vec<_>>()
        .join("\t")
}

/// レコード1件分の行
pub fn record_row(record: &DeficiencyRecord) -> String {
    DEFICIENCY_FIELDS
        .iter()
        .map(|key| sanitize_cell(record.field_value(key)))
        .collect::<Vec<_>>()
        .join("\t")
}

/// TSV全体（末尾改行なし）
pub fn generate_tsv(records: &[DeficiencyRecord]) -> String {
    std::iter::once(header_row())
        .chain(records.iter().map(record_row))
        .collect::<Vec<_>>()
        .join("\n")
}
