//! 不備抽出クライアント
//!
//! 固定のシステム指示 + ファイル（または報告書テキスト）を1回送信し、
//! 応答をJSON配列として厳密にパースする。リトライはしない

use sprinkler_report_common::{
    build_file_instruction, parse_deficiency_response, DeficiencyRecord, EncodedPayload,
    EXTRACTION_SYSTEM_PROMPT,
};
use tracing::{debug, info};

use crate::config::ApiSettings;
use crate::encoder::is_supported_mime;
use crate::error::{ReportError, Result};
use crate::inference::{
    ChatMessage, ChatRequest, ContentPart, FileData, ImageUrl, InferenceBackend, OpenAiBackend,
};

pub struct ExtractionClient<B> {
    backend: B,
    model: String,
}

impl ExtractionClient<OpenAiBackend> {
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Ok(Self::new(OpenAiBackend::new(settings)?, settings.model.clone()))
    }
}

impl<B: InferenceBackend> ExtractionClient<B> {
    pub fn new(backend: B, model: impl Into<String>) -> Self {
        Self { backend, model: model.into() }
    }

    /// 添付ファイル用リクエスト
    pub fn build_file_request(&self, payload: &EncodedPayload) -> Result<ChatRequest> {
        if !is_supported_mime(&payload.mime_type) {
            return Err(ReportError::UnsupportedType {
                file: payload.file_name.clone(),
                mime: payload.mime_type.clone(),
            });
        }
        // 壊れたBase64は送信しない
        if payload.decode().is_err() {
            return Err(ReportError::InvalidPayload { file: payload.file_name.clone() });
        }

        let attachment = if payload.is_pdf() {
            ContentPart::File {
                file: FileData {
                    filename: payload.file_name.clone(),
                    file_data: payload.data_url(),
                },
            }
        } else {
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: payload.data_url() },
            }
        };

        Ok(self.build_request(ChatMessage::parts(
            "user",
            vec![
                ContentPart::Text { text: build_file_instruction(&payload.file_name) },
                attachment,
            ],
        )))
    }

    /// 報告書テキスト用リクエスト
    pub fn build_text_request(&self, report_text: &str) -> ChatRequest {
        self.build_request(ChatMessage::text("user", report_text))
    }

    fn build_request(&self, user: ChatMessage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![ChatMessage::text("system", EXTRACTION_SYSTEM_PROMPT), user],
        }
    }

    /// ファイル1件から不備を抽出
    pub async fn extract(&self, payload: &EncodedPayload) -> Result<Vec<DeficiencyRecord>> {
        let request = self.build_file_request(payload)?;
        self.run(&request, &payload.file_name).await
    }

    /// 報告書テキストから不備を抽出
    ///
    /// # Arguments
    /// * `report_text` - 抽出済みの報告書本文
    /// * `source_file` - レコードに付与する元ファイル名
    pub async fn extract_text(&self, report_text: &str, source_file: &str) -> Result<Vec<DeficiencyRecord>> {
        let request = self.build_text_request(report_text);
        self.run(&request, source_file).await
    }

    async fn run(&self, request: &ChatRequest, source_file: &str) -> Result<Vec<DeficiencyRecord>> {
        debug!(source_file, "requesting deficiency extraction");
        let content = self.backend.complete(request).await?.into_content()?;
        let records = parse_deficiency_response(&content, source_file)?;
        info!(source_file, count = records.len(), "extracted deficiencies");
        Ok(records)
    }
}
