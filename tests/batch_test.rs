//! バッチ抽出のテスト
//!
//! 順次処理・失敗時の継続・進捗率・エラーの後勝ちを検証

mod support;

use std::path::Path;

use sprinkler_report::batch::{run_batch, InputMode};
use sprinkler_report::extraction::ExtractionClient;
use sprinkler_report::scanner::{scan_folder, ReportFile};
use sprinkler_report_common::{Accumulator, ProcessingStatus};
use support::{deficiency_json, FakeBackend, Reply};
use tempfile::tempdir;

fn make_reports(dir: &Path, names: &[&str]) -> Vec<ReportFile> {
    for name in names {
        std::fs::write(dir.join(name), b"%PDF-1.4 dummy").unwrap();
    }
    scan_folder(dir).unwrap()
}

/// N件中k件が失敗しても、成功分だけが元の順序で残る
#[tokio::test]
async fn test_batch_continues_after_failures() {
    let dir = tempdir().expect("Failed to create temp dir");
    let files = make_reports(dir.path(), &["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);

    let backend = FakeBackend::new(vec![
        Reply::Content(deficiency_json("from a", 1)),
        Reply::Status(500, "upstream exploded".to_string()),
        Reply::Content(deficiency_json("from c", 2)),
        Reply::Content("[{\"issue\": \"bad\",}]".to_string()),
    ]);
    let client = ExtractionClient::new(backend, "gpt-4o-mini");

    let mut accumulator = Accumulator::new();
    let mut status = ProcessingStatus::default();
    let mut progress = Vec::new();

    let summary = run_batch(
        &client,
        &files,
        InputMode::Attachment,
        &mut accumulator,
        &mut status,
        |done, total, _, status| progress.push((done, total, status.progress)),
    )
    .await;

    let issues: Vec<&str> = accumulator
        .records()
        .iter()
        .map(|r| r.issue_description.as_str())
        .collect();
    assert_eq!(issues, vec!["from a", "from c"]);
    assert_eq!(accumulator.records()[0].source_file, "a.pdf");
    assert_eq!(accumulator.records()[1].source_file, "c.pdf");

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.records_added, 2);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.failures[0].0, "b.pdf");

    // 最後に失敗したファイル名が残る
    let error = status.error.as_deref().expect("エラーが記録されていない");
    assert!(error.starts_with("Critical Failure on d.pdf:"), "{}", error);

    assert_eq!(progress, vec![(1, 4, 25), (2, 4, 50), (3, 4, 75), (4, 4, 100)]);
    assert!(!status.is_processing);
    assert_eq!(status.progress, 100);
}

/// 進捗率は round(100 * i / N) で単調非減少
#[tokio::test]
async fn test_batch_progress_rounding() {
    let dir = tempdir().unwrap();
    let files = make_reports(dir.path(), &["1.pdf", "2.pdf", "3.pdf"]);
    let backend = FakeBackend::new(vec![
        Reply::Content("[]".to_string()),
        Reply::Content("[]".to_string()),
        Reply::Content("[]".to_string()),
    ]);
    let client = ExtractionClient::new(backend, "gpt-4o-mini");

    let mut accumulator = Accumulator::new();
    let mut status = ProcessingStatus::default();
    let mut seen = Vec::new();

    run_batch(&client, &files, InputMode::Attachment, &mut accumulator, &mut status, |_, _, _, s| {
        seen.push(s.progress)
    })
    .await;

    assert_eq!(seen, vec![33, 67, 100]);
    assert!(accumulator.is_empty());
    assert_eq!(status.error, None);
}

/// 読み込めないファイルは ReadError としてそのファイルだけ失敗する
#[tokio::test]
async fn test_batch_unreadable_file() {
    let dir = tempdir().unwrap();
    let mut files = make_reports(dir.path(), &["ok.pdf"]);
    files.insert(
        0,
        ReportFile {
            path: dir.path().join("missing.pdf"),
            file_name: "missing.pdf".to_string(),
        },
    );

    let backend = FakeBackend::new(vec![Reply::Content(deficiency_json("found", 1))]);
    let client = ExtractionClient::new(backend, "gpt-4o-mini");

    let mut accumulator = Accumulator::new();
    let mut status = ProcessingStatus::default();
    let summary = run_batch(&client, &files, InputMode::Attachment, &mut accumulator, &mut status, |_, _, _, _| {}).await;

    assert_eq!(accumulator.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(status.error.as_deref().unwrap().contains("missing.pdf"));
}

/// 新しいバッチ開始時にエラーと進捗はリセットされ、蓄積は引き継がれる
#[tokio::test]
async fn test_second_batch_appends() {
    let dir = tempdir().unwrap();
    let files = make_reports(dir.path(), &["x.pdf"]);

    let backend = FakeBackend::new(vec![
        Reply::Status(401, "bad key".to_string()),
        Reply::Content(deficiency_json("second run", 5)),
    ]);
    let client = ExtractionClient::new(backend, "gpt-4o-mini");

    let mut accumulator = Accumulator::new();
    let mut status = ProcessingStatus::default();

    run_batch(&client, &files, InputMode::Attachment, &mut accumulator, &mut status, |_, _, _, _| {}).await;
    assert!(status.error.is_some());

    run_batch(&client, &files, InputMode::Attachment, &mut accumulator, &mut status, |_, _, _, _| {}).await;
    assert_eq!(status.error, None);
    assert_eq!(accumulator.len(), 1);
    assert_eq!(accumulator.records()[0].quantity, "5");
}

/// テキストモードは本文をそのまま送る
#[tokio::test]
async fn test_batch_text_mode() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("report.txt"), "2 corroded heads in Room 3").unwrap();
    let files = vec![ReportFile {
        path: dir.path().join("report.txt"),
        file_name: "report.txt".to_string(),
    }];

    let backend = FakeBackend::new(vec![Reply::Content(deficiency_json("Corroded head", 2))]);
    let client = ExtractionClient::new(backend, "gpt-4o-mini");

    let mut accumulator = Accumulator::new();
    let mut status = ProcessingStatus::default();
    run_batch(&client, &files, InputMode::Text, &mut accumulator, &mut status, |_, _, _, _| {}).await;

    assert_eq!(accumulator.len(), 1);
    assert_eq!(accumulator.records()[0].source_file, "report.txt");
}
