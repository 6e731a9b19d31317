//! 対話モード（見積アシスタント）
//!
//! 1行ずつ送信し、返答を表示する。送信中は次の入力を受け付けない。
//! 失敗時はエラー行を表示し、ユーザーの発言だけが履歴に残る

use dialoguer::Input;
use sprinkler_report_common::{Session, Transcript};
use tracing::warn;

use crate::conversation::ConversationClient;
use crate::error::{ReportError, Result};
use crate::inference::InferenceBackend;

/// 入力行の解釈
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Quit,
    Reset,
    Empty,
    Message(String),
}

pub fn parse_chat_line(line: &str) -> ChatCommand {
    match line.trim() {
        "" => ChatCommand::Empty,
        "/quit" | "/exit" => ChatCommand::Quit,
        "/reset" => ChatCommand::Reset,
        text => ChatCommand::Message(text.to_string()),
    }
}

/// 1回分の送受信。返答（失敗時はエラーメッセージ）を返す
pub async fn submit<B: InferenceBackend>(
    client: &ConversationClient<B>,
    session: &mut Session,
    message: &str,
) -> std::result::Result<String, String> {
    let (history, message) = session.begin_chat(message).map_err(|e| e.to_string())?;

    match client.ask(&message, &history).await {
        Ok(reply) => {
            session.finish_chat(Some(reply.clone()));
            Ok(reply)
        }
        Err(e) => {
            warn!(error = %e, "chat request failed");
            session.finish_chat(None);
            Err(e.to_string())
        }
    }
}

pub async fn run_chat<B: InferenceBackend>(client: &ConversationClient<B>) -> Result<Transcript> {
    let mut session = Session::new();

    println!("💬 Assistant Mode - consult with the NICET III estimator");
    println!("   /reset clears the history, /quit exits\n");

    loop {
        let line: String = Input::new()
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ReportError::Prompt(e.to_string()))?;

        match parse_chat_line(&line) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => break,
            ChatCommand::Reset => {
                session.clear_transcript()?;
                println!("✔ History cleared\n");
            }
            ChatCommand::Message(text) => match submit(client, &mut session, &text).await {
                Ok(reply) => println!("\nestimator> {}\n", reply),
                Err(message) => eprintln!("\n✖ {}\n", message),
            },
        }
    }

    Ok(session.transcript().clone())
}
