//! 推論API連携（chat completions 形式）
//!
//! リクエスト: { model, temperature, messages: [{role, content}] }
//! レスポンス: choices[0].message.content
//!
//! 抽出・チャットの各クライアントは InferenceBackend 越しに呼び出す。
//! 本番は OpenAiBackend、テストでは差し替え可能

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::ApiSettings;
use crate::error::{ReportError, Result};

/// 推論APIリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn parts(role: &str, parts: Vec<ContentPart>) -> Self {
        Self {
            role: role.to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    File { file: FileData },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    pub filename: String,
    pub file_data: String,
}

/// 推論APIレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// 最初の候補の本文。無い・空白のみなら EmptyResponse
    pub fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ReportError::EmptyResponse)
    }
}

/// 推論APIの送信口
pub trait InferenceBackend {
    /// 1回のリモート呼び出し。非成功ステータスは RemoteService エラー
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<ChatResponse>> + Send;
}

impl<T: InferenceBackend + Sync> InferenceBackend for &T {
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<ChatResponse>> + Send {
        (**self).complete(request)
    }
}

/// 本文を読めなかった非成功応答の body
fn error_body_unreadable(e: &dyn std::fmt::Display) -> String {
    format!("<unreadable response body: {}>", e)
}

/// OpenAI互換エンドポイント
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

impl InferenceBackend for OpenAiBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "sending inference request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(status = status.as_u16(), error = %e, "failed to read error body");
                error_body_unreadable(&e)
            });
            error!(status = status.as_u16(), body = %body, "inference API request failed");
            return Err(ReportError::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(body = %body, "inference API returned an unreadable body");
            ReportError::Json(e)
        })?;
        Ok(parsed)
    }
}
