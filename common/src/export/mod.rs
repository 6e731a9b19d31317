//! 表データのエクスポート

pub mod tsv;

#[cfg(feature = "excel")]
pub mod excel_core;

/// camelCaseのフィールドキーを見出しに変換
///
/// 先頭を大文字にし、大文字の前に空白を入れる（"reportDate" → "Report Date"）
pub fn header_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}
