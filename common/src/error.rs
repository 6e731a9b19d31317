//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 応答がJSONとして解釈できない
    #[error("Failed to parse AI response as JSON: {0}")]
    Parse(String),

    /// JSONだが期待する形ではない
    #[error("AI response has an unexpected shape: {0}")]
    Schema(String),

    /// 別の処理が実行中
    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Export error: {0}")]
    Export(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
