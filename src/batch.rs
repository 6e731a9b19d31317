//! バッチ抽出
//!
//! ファイルを1件ずつ順番に処理する（並列化しない）。
//! 1件の失敗はバッチを止めず、ProcessingStatus.error に後勝ちで記録する。
//! 進捗は成功・失敗に関わらず各ファイル完了時に round(100 * (i+1) / N)

use std::path::Path;

use sprinkler_report_common::{Accumulator, DeficiencyRecord, ProcessingStatus};
use tracing::{info, warn};

use crate::encoder::encode_file;
use crate::error::{ReportError, Result};
use crate::extraction::ExtractionClient;
use crate::inference::InferenceBackend;
use crate::scanner::ReportFile;

/// 入力の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// PDF・画像をBase64で添付
    #[default]
    Attachment,
    /// テキストファイルを報告書本文として送る
    Text,
}

/// ファイル1件の処理結果
#[derive(Debug)]
pub struct FileOutcome {
    pub index: usize,
    pub total: usize,
    pub file_name: String,
    pub result: Result<Vec<DeficiencyRecord>>,
}

/// バッチ全体の集計
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub records_added: usize,
    pub failures: Vec<(String, String)>,
}

/// ファイル1件を読み込み、抽出まで行う
pub async fn process_file<B: InferenceBackend>(
    client: &ExtractionClient<B>,
    path: &Path,
    file_name: &str,
    mode: InputMode,
) -> Result<Vec<DeficiencyRecord>> {
    match mode {
        InputMode::Attachment => {
            let payload = encode_file(path).await?;
            client.extract(&payload).await
        }
        InputMode::Text => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ReportError::Read { file: file_name.to_string(), source })?;
            client.extract_text(&text, file_name).await
        }
    }
}

/// 全ファイルを順番に処理し、1件ごとに結果を渡す
pub async fn extract_each<B, F>(
    client: &ExtractionClient<B>,
    files: &[ReportFile],
    mode: InputMode,
    mut on_outcome: F,
) where
    B: InferenceBackend,
    F: FnMut(FileOutcome),
{
    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        let result = process_file(client, &file.path, &file.file_name, mode).await;
        on_outcome(FileOutcome {
            index,
            total,
            file_name: file.file_name.clone(),
            result,
        });
    }
}

/// 処理結果を蓄積と状態に反映する
///
/// 成功時は追加件数、失敗時はエラーメッセージを返す
pub fn apply_outcome(
    outcome: FileOutcome,
    accumulator: &mut Accumulator,
    status: &mut ProcessingStatus,
) -> std::result::Result<usize, String> {
    let applied = match outcome.result {
        Ok(records) => {
            let count = records.len();
            let total_records = accumulator.append(records);
            info!(file = %outcome.file_name, count, total_records, "file processed");
            Ok(count)
        }
        Err(e) => {
            let message = e.to_string();
            warn!(file = %outcome.file_name, error = %message, "file failed");
            status.record_failure(&outcome.file_name, &message);
            Err(message)
        }
    };
    status.record_progress(outcome.index + 1, outcome.total);
    applied
}

/// バッチ実行
///
/// # Arguments
/// * `on_progress` - 各ファイル完了後に (完了件数, 総数, ファイル名, 状態) で呼ばれる
pub async fn run_batch<B, F>(
    client: &ExtractionClient<B>,
    files: &[ReportFile],
    mode: InputMode,
    accumulator: &mut Accumulator,
    status: &mut ProcessingStatus,
    mut on_progress: F,
) -> BatchSummary
where
    B: InferenceBackend,
    F: FnMut(usize, usize, &str, &ProcessingStatus),
{
    status.begin_batch();
    let mut summary = BatchSummary::default();

    extract_each(client, files, mode, |outcome| {
        let done = outcome.index + 1;
        let total = outcome.total;
        let file_name = outcome.file_name.clone();
        match apply_outcome(outcome, accumulator, status) {
            Ok(count) => summary.records_added += count,
            Err(message) => summary.failures.push((file_name.clone(), message)),
        }
        summary.processed += 1;
        on_progress(done, total, &file_name, status);
    })
    .await;

    status.finish_batch();
    summary
}
