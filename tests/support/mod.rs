//! テスト用の推論バックエンド
//!
//! 事前に積んだ応答を順番に返し、受け取ったリクエストを記録する

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use sprinkler_report::error::{ReportError, Result};
use sprinkler_report::inference::{ChatRequest, ChatResponse, Choice, InferenceBackend, ResponseMessage};

pub enum Reply {
    Content(String),
    Status(u16, String),
    NoContent,
}

#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeBackend {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_content(content: &str) -> Self {
        Self::new(vec![Reply::Content(content.to_string())])
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn response_with(content: Option<String>) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: ResponseMessage { content },
        }],
    }
}

impl InferenceBackend for FakeBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Content(text)) => Ok(response_with(Some(text))),
            Some(Reply::Status(status, body)) => Err(ReportError::RemoteService { status, body }),
            Some(Reply::NoContent) | None => Ok(response_with(None)),
        }
    }
}

/// 1件分の正常応答
pub fn deficiency_json(issue: &str, quantity: u32) -> String {
    format!(
        r#"[{{"category":"Sprinkler","section":"A-1","deviceType":"Head","location":"Room 3","issue":"{}","quantity":{},"actionRequired":"Replace"}}]"#,
        issue, quantity
    )
}
