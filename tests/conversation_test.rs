//! チャットのテスト
//!
//! 履歴の送信形式・エラー伝播・同時送信の拒否を検証

mod support;

use sprinkler_report::chat::submit;
use sprinkler_report::conversation::ConversationClient;
use sprinkler_report::error::ReportError;
use sprinkler_report_common::{
    ConversationTurn, Error as CommonError, Role, Session, SessionState, ESTIMATOR_SYSTEM_PROMPT,
};
use support::{FakeBackend, Reply};

/// 返答はそのまま返る（JSONとして解釈しない）
#[tokio::test]
async fn test_ask_returns_reply_verbatim() {
    let backend = FakeBackend::with_content("Replace 4 heads.\n{not json}");
    let client = ConversationClient::new(backend, "gpt-4o-mini");

    let reply = client.ask("What should I quote?", &[]).await.unwrap();
    assert_eq!(reply, "Replace 4 heads.\n{not json}");
}

/// システム指示 → 履歴 → 今回の発言の順
#[test]
fn test_request_contains_history() {
    let client = ConversationClient::new(FakeBackend::default(), "gpt-4o-mini");
    let history = vec![
        ConversationTurn::user("How long to swap a head?"),
        ConversationTurn::assistant("About 30 minutes."),
    ];

    let request = client.build_request("And ten heads?", &history);
    let json = serde_json::to_value(&request).unwrap();
    let messages = json["messages"].as_array().unwrap();

    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], ESTIMATOR_SYSTEM_PROMPT);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "About 30 minutes.");
    assert_eq!(messages[3]["content"], "And ten heads?");
    assert_eq!(json["temperature"], 0.0);
}

/// 空白のみのメッセージは送信しない
#[tokio::test]
async fn test_ask_rejects_blank() {
    let client = ConversationClient::new(FakeBackend::default(), "gpt-4o-mini");
    let result = client.ask("   ", &[]).await;
    assert!(matches!(result, Err(ReportError::Common(CommonError::EmptyMessage))));
}

/// 非成功ステータスは呼び出し側へ伝播
#[tokio::test]
async fn test_ask_propagates_remote_error() {
    let backend = FakeBackend::new(vec![Reply::Status(503, "overloaded".to_string())]);
    let client = ConversationClient::new(backend, "gpt-4o-mini");

    let result = client.ask("hello", &[]).await;
    assert!(matches!(result, Err(ReportError::RemoteService { status: 503, .. })));
}

/// 成功時はユーザー→アシスタントの順で履歴に残る
#[tokio::test]
async fn test_submit_appends_turns_in_order() {
    let backend = FakeBackend::new(vec![
        Reply::Content("first reply".to_string()),
        Reply::Content("second reply".to_string()),
    ]);
    let client = ConversationClient::new(backend, "gpt-4o-mini");
    let mut session = Session::new();

    assert_eq!(submit(&client, &mut session, "first").await.unwrap(), "first reply");
    assert_eq!(submit(&client, &mut session, "second").await.unwrap(), "second reply");

    let roles: Vec<Role> = session.transcript().turns().iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(session.state(), SessionState::Idle);
}

/// 失敗時はエラーを返し、アシスタントの発言は追加しない
#[tokio::test]
async fn test_submit_failure_is_reported_inline() {
    let backend = FakeBackend::new(vec![Reply::Status(500, "boom".to_string())]);
    let client = ConversationClient::new(&backend, "gpt-4o-mini");
    let mut session = Session::new();

    let err = submit(&client, &mut session, "question").await.unwrap_err();
    assert!(err.contains("500"));
    assert_eq!(session.transcript().turns(), &[ConversationTurn::user("question")]);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(backend.request_count(), 1);
}

/// 送信中は2件目を送らない
#[tokio::test]
async fn test_submit_rejected_while_in_flight() {
    let backend = FakeBackend::new(vec![Reply::Content("late".to_string())]);
    let client = ConversationClient::new(&backend, "gpt-4o-mini");
    let mut session = Session::new();

    // 1件目が送信中の状態を作る
    session.begin_chat("outstanding").unwrap();

    let err = submit(&client, &mut session, "second").await.unwrap_err();
    assert!(err.contains("already in progress"));
    assert_eq!(backend.request_count(), 0);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.state(), SessionState::ChatInFlight);
}
