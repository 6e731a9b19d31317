//! 画面の状態機械とチャット履歴
//!
//! Idle → BatchInFlight → Idle、Idle → ChatInFlight → Idle のみ許可する。
//! 実行中に別の操作を始めようとすると Error::Busy

use crate::error::{Error, Result};
use crate::types::{ConversationTurn, Role};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    BatchInFlight,
    ChatInFlight,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    fn busy_error(&self) -> Error {
        match self {
            SessionState::BatchInFlight => Error::Busy("A batch extraction"),
            SessionState::ChatInFlight => Error::Busy("A chat request"),
            SessionState::Idle => Error::Busy("Nothing"),
        }
    }
}

/// 追記専用のチャット履歴
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// 操作の重なりを防ぐセッション
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    transcript: Transcript,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// バッチ開始
    pub fn begin_batch(&mut self) -> Result<()> {
        if !self.state.is_idle() {
            return Err(self.state.busy_error());
        }
        self.state = SessionState::BatchInFlight;
        Ok(())
    }

    pub fn finish_batch(&mut self) {
        if self.state == SessionState::BatchInFlight {
            self.state = SessionState::Idle;
        }
    }

    /// チャット送信開始
    ///
    /// 空白のみのメッセージは拒否する。受理したらユーザーターンを追記し、
    /// 送信用の履歴（今回のターンを含まない）とトリム済みメッセージを返す
    pub fn begin_chat(&mut self, message: &str) -> Result<(Vec<ConversationTurn>, String)> {
        if !self.state.is_idle() {
            return Err(self.state.busy_error());
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let history = self.transcript.turns().to_vec();
        self.transcript.push(ConversationTurn::user(message));
        self.state = SessionState::ChatInFlight;
        Ok((history, message.to_string()))
    }

    /// チャット完了。成功時のみアシスタントターンを追記する
    pub fn finish_chat(&mut self, reply: Option<String>) {
        if self.state != SessionState::ChatInFlight {
            return;
        }
        if let Some(text) = reply {
            self.transcript.push(ConversationTurn { role: Role::Assistant, text });
        }
        self.state = SessionState::Idle;
    }

    pub fn clear_transcript(&mut self) -> Result<()> {
        if self.state == SessionState::ChatInFlight {
            return Err(self.state.busy_error());
        }
        self.transcript.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_rejected_while_chat_in_flight() {
        let mut session = Session::new();
        session.begin_chat("How many heads?").unwrap();
        let second = session.begin_chat("Another question");
        assert!(matches!(second, Err(Error::Busy(_))));
        assert_eq!(session.transcript().len(), 1);

        session.finish_chat(Some("Four.".to_string()));
        assert!(session.begin_chat("Another question").is_ok());
    }

    #[test]
    fn test_chat_rejected_while_batch_in_flight() {
        let mut session = Session::new();
        session.begin_batch().unwrap();
        assert!(matches!(session.begin_chat("hi"), Err(Error::Busy(_))));
        assert!(matches!(session.begin_batch(), Err(Error::Busy(_))));
        session.finish_batch();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_batch_rejected_while_chat_in_flight() {
        let mut session = Session::new();
        session.begin_chat("hi").unwrap();
        let err = session.begin_batch().unwrap_err();
        assert_eq!(format!("{}", err), "A chat request is already in progress");
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut session = Session::new();
        assert!(matches!(session.begin_chat("   "), Err(Error::EmptyMessage)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_history_excludes_current_turn() {
        let mut session = Session::new();
        let (history, message) = session.begin_chat("  first  ").unwrap();
        assert!(history.is_empty());
        assert_eq!(message, "first");
        session.finish_chat(Some("reply one".to_string()));

        let (history, _) = session.begin_chat("second").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], ConversationTurn::user("first"));
        assert_eq!(history[1], ConversationTurn::assistant("reply one"));
    }

    #[test]
    fn test_failed_chat_keeps_user_turn_only() {
        let mut session = Session::new();
        session.begin_chat("question").unwrap();
        session.finish_chat(None);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.transcript().turns(), &[ConversationTurn::user("question")]);
    }

    #[test]
    fn test_clear_transcript() {
        let mut session = Session::new();
        session.begin_chat("q").unwrap();
        assert!(session.clear_transcript().is_err());
        session.finish_chat(Some("a".to_string()));
        session.clear_transcript().unwrap();
        assert!(session.transcript().is_empty());
    }
}
