//! アップロードファイルのBase64化
//!
//! 読み込みは tokio::fs で非同期に行う。失敗は ReportError::Read として
//! そのまま呼び出し側へ返す（リトライしない）

use std::path::Path;

use sprinkler_report_common::{strip_data_url_prefix, EncodedPayload};
use tracing::debug;

use crate::error::{ReportError, Result};

/// 対応拡張子とMIMEタイプ
const SUPPORTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// 拡張子からMIMEタイプを判定（大文字小文字は区別しない）
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    SUPPORTED_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像またはPDFか
pub fn is_supported_mime(mime: &str) -> bool {
    mime == "application/pdf" || mime.starts_with("image/")
}

/// メモリ上のファイルをペイロード化
pub fn encode_upload(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<EncodedPayload> {
    if !is_supported_mime(mime_type) {
        return Err(ReportError::UnsupportedType {
            file: file_name.to_string(),
            mime: mime_type.to_string(),
        });
    }
    Ok(EncodedPayload::from_bytes(file_name, mime_type, bytes))
}

/// Data URL文字列からペイロードを作る（"data:" で始まらない場合はBase64本体とみなす）
pub fn encode_data_url(file_name: &str, mime_type: &str, data_url: &str) -> Result<EncodedPayload> {
    if !is_supported_mime(mime_type) {
        return Err(ReportError::UnsupportedType {
            file: file_name.to_string(),
            mime: mime_type.to_string(),
        });
    }
    let payload = EncodedPayload {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        data: strip_data_url_prefix(data_url).to_string(),
    };
    if payload.decode().is_err() {
        return Err(ReportError::InvalidPayload { file: payload.file_name });
    }
    Ok(payload)
}

/// ファイルを読み込んでペイロード化
pub async fn encode_file(path: &Path) -> Result<EncodedPayload> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mime_type = mime_for_path(path).ok_or_else(|| ReportError::UnsupportedType {
        file: file_name.clone(),
        mime: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| "unknown".to_string()),
    })?;

    let bytes = tokio::fs::read(path).await.map_err(|source| ReportError::Read {
        file: file_name.clone(),
        source,
    })?;
    debug!(file = %file_name, mime_type, bytes = bytes.len(), "encoded upload");

    encode_upload(&file_name, mime_type, &bytes)
}
