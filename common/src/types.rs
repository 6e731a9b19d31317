//! 共有データ型
//!
//! CLIとデスクトップで共有される型:
//! - EncodedPayload: Base64化したアップロードファイル
//! - DeficiencyRecord: 抽出された不備1件
//! - ConversationTurn: チャット1ターン
//! - ProcessingStatus: バッチ処理の進捗とエラー

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// アップロードファイルのBase64表現
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPayload {
    pub file_name: String,
    pub mime_type: String,
    /// data URLプレフィックスを除いたBase64本体
    pub data: String,
}

impl EncodedPayload {
    /// バイト列をBase64化してペイロードを作る
    pub fn from_bytes(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// "data:<mime>;base64,<body>" 形式に戻す
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Base64本体をデコードして元のバイト列を返す
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Data URLからBase64データ部分を取り出す
///
/// "data:" で始まらない文字列はそのまま返す
///
/// # Examples
/// ```
/// use sprinkler_report_common::strip_data_url_prefix;
///
/// assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBORw0KGgo="), "iVBORw0KGgo=");
/// assert_eq!(strip_data_url_prefix("iVBORw0KGgo="), "iVBORw0KGgo=");
/// ```
pub fn strip_data_url_prefix(data: &str) -> &str {
    if !data.starts_with("data:") {
        return data;
    }
    match data.split_once(',') {
        Some((_, body)) => body,
        None => data,
    }
}

/// 表の列順（camelCaseのフィールドキー）
pub const DEFICIENCY_FIELDS: [&str; 13] = [
    "property",
    "reportDate",
    "category",
    "sectionLabel",
    "deviceType",
    "location",
    "issueDescription",
    "quantity",
    "actionRequired",
    "resultMark",
    "inspectorNotes",
    "photoLinks",
    "sourceFile",
];

/// 検査報告書から抽出した不備1件
///
/// 生成後は変更しない。数量は数値として解釈できる文字列で保持する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeficiencyRecord {
    pub property: String,
    pub report_date: String,
    pub category: String,
    pub section_label: String,
    pub device_type: String,
    pub location: String,
    pub issue_description: String,
    pub quantity: String,
    pub action_required: String,
    pub result_mark: String,
    pub inspector_notes: String,
    pub photo_links: String,
    pub source_file: String,
}

impl DeficiencyRecord {
    /// フィールドキーから値を取得（未知のキーは空文字）
    pub fn field_value(&self, key: &str) -> &str {
        match key {
            "property" => &self.property,
            "reportDate" => &self.report_date,
            "category" => &self.category,
            "sectionLabel" => &self.section_label,
            "deviceType" => &self.device_type,
            "location" => &self.location,
            "issueDescription" => &self.issue_description,
            "quantity" => &self.quantity,
            "actionRequired" => &self.action_required,
            "resultMark" => &self.result_mark,
            "inspectorNotes" => &self.inspector_notes,
            "photoLinks" => &self.photo_links,
            "sourceFile" => &self.source_file,
            _ => "",
        }
    }

    /// 数量を数値として取得
    pub fn quantity_value(&self) -> Option<f64> {
        self.quantity.trim().parse::<f64>().ok()
    }
}

/// 発話者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// チャット1ターン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

/// バッチ処理の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStatus {
    pub is_processing: bool,
    /// 0-100、1バッチ内で単調非減少
    pub progress: u8,
    /// 最後に発生したエラー（後勝ち）
    pub error: Option<String>,
}

impl ProcessingStatus {
    /// 新しいバッチの開始。進捗とエラーをリセットする
    pub fn begin_batch(&mut self) {
        self.is_processing = true;
        self.progress = 0;
        self.error = None;
    }

    /// ファイル完了時の進捗更新（成功・失敗どちらでも呼ぶ）
    pub fn record_progress(&mut self, done: usize, total: usize) {
        let percent = crate::progress::progress_percent(done, total);
        self.progress = self.progress.max(percent);
    }

    /// ファイル単位の失敗を記録
    pub fn record_failure(&mut self, file_name: &str, message: &str) {
        self.error = Some(format!("Critical Failure on {}: {}", file_name, message));
    }

    /// バッチ完了
    pub fn finish_batch(&mut self) {
        self.is_processing = false;
        self.progress = 100;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
