//! 見積アシスタント（チャット）クライアント
//!
//! 応答テキストはそのまま返す。JSONとしての解釈はしない

use sprinkler_report_common::{ConversationTurn, Error as CommonError, ESTIMATOR_SYSTEM_PROMPT};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::Result;
use crate::inference::{ChatMessage, ChatRequest, InferenceBackend, OpenAiBackend};

pub struct ConversationClient<B> {
    backend: B,
    model: String,
}

impl ConversationClient<OpenAiBackend> {
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Ok(Self::new(OpenAiBackend::new(settings)?, settings.model.clone()))
    }
}

impl<B: InferenceBackend> ConversationClient<B> {
    pub fn new(backend: B, model: impl Into<String>) -> Self {
        Self { backend, model: model.into() }
    }

    /// システム指示 + 履歴 + 今回の発言
    pub fn build_request(&self, message: &str, history: &[ConversationTurn]) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::text("system", ESTIMATOR_SYSTEM_PROMPT));
        messages.extend(
            history
                .iter()
                .map(|turn| ChatMessage::text(turn.role.as_str(), turn.text.clone())),
        );
        messages.push(ChatMessage::text("user", message));

        ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages,
        }
    }

    /// 質問を送り、返答テキストを返す
    ///
    /// 空白のみのメッセージは送信せずに EmptyMessage
    pub async fn ask(&self, message: &str, history: &[ConversationTurn]) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(CommonError::EmptyMessage.into());
        }
        let request = self.build_request(message, history);
        debug!(history = history.len(), "sending estimator question");
        self.backend.complete(&request).await?.into_content()
    }
}
