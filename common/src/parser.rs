//! AI応答パーサー
//!
//! 抽出APIの応答テキストを DeficiencyRecord に変換する。
//! - JSONとして読めない → Error::Parse
//! - JSONだが配列ではない → Error::Schema
//!
//! どちらの場合も生の応答を error ログに残す。
//! 配列の中の不正な要素はファイル全体を失敗にせず、要素単位で扱う

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::error::{Error, Result};
use crate::types::DeficiencyRecord;

/// 応答を囲む ```json ... ``` フェンスを取り除く
///
/// フェンスが無ければ前後の空白を除いたものを返す
///
/// # Examples
/// ```
/// use sprinkler_report_common::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n[]\n```"), "[]");
/// assert_eq!(strip_code_fence("  [] "), "[]");
/// ```
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 言語タグ（json など）を読み飛ばす
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// 抽出応答をパース
///
/// # Arguments
/// * `response` - モデルが返したテキスト
/// * `source_file` - 各レコードに付与する元ファイル名
///
/// # Returns
/// * `Ok(Vec<DeficiencyRecord>)` - 応答順のレコード
/// * `Err(Error::Parse)` - JSONとして不正
/// * `Err(Error::Schema)` - 配列でない
///
/// オブジェクトでない要素は warn ログを残して読み飛ばす
pub fn parse_deficiency_response(response: &str, source_file: &str) -> Result<Vec<DeficiencyRecord>> {
    let json_str = strip_code_fence(response);

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        error!(source_file, raw = %response, "AI output is not valid JSON");
        Error::Parse(e.to_string())
    })?;

    let Value::Array(items) = value else {
        let e = Error::Schema(format!("expected a JSON array, got {}", value_kind(&value)));
        error!(source_file, raw = %response, error = %e, "AI output does not match the deficiency schema");
        return Err(e);
    };

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| record_from_value(index, item, source_file))
        .collect())
}

fn record_from_value(index: usize, item: &Value, source_file: &str) -> Option<DeficiencyRecord> {
    let Some(map) = item.as_object() else {
        warn!(source_file, index, raw = %item, kind = value_kind(item), "skipping non-object item");
        return None;
    };

    let mut inspector_notes = get_string(map, &["inspectorNotes"]);
    let quantity = match get_quantity(map) {
        Ok(quantity) => quantity,
        Err(raw) => {
            // 数値でない数量は空にし、原文は備考に残す
            warn!(source_file, index, raw = %raw, "non-numeric quantity moved to inspector notes");
            let note = format!("Quantity: {}", raw);
            if inspector_notes.is_empty() {
                inspector_notes = note;
            } else {
                inspector_notes = format!("{}; {}", inspector_notes, note);
            }
            String::new()
        }
    };

    Some(DeficiencyRecord {
        property: get_string(map, &["property"]),
        report_date: get_string(map, &["reportDate"]),
        category: get_string(map, &["category"]),
        section_label: get_string(map, &["section", "sectionLabel"]),
        device_type: get_string(map, &["deviceType"]),
        location: get_string(map, &["location"]),
        issue_description: get_string(map, &["issue", "issueDescription"]),
        quantity,
        action_required: get_string(map, &["actionRequired"]),
        result_mark: get_string(map, &["resultMark"]),
        inspector_notes,
        photo_links: get_string(map, &["photoLinks"]),
        source_file: source_file.to_string(),
    })
}

/// 最初に見つかったキーの値を文字列で取得（null/欠落は空文字）
fn get_string(map: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match map.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
        }
    }
    String::new()
}

/// 数量を表示用文字列に変換
///
/// 数値として解釈できない値は原文を Err で返す
fn get_quantity(map: &Map<String, Value>) -> std::result::Result<String, String> {
    match map.get("quantity") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::Number(n)) => Ok(format_number(n)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s.parse::<f64>().is_ok() {
                Ok(s.to_string())
            } else {
                Err(s.to_string())
            }
        }
        Some(other) => Err(other.to_string()),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
