use sprinkler_report::batch::FileOutcome;
use sprinkler_report_common::{Accumulator, ProcessingStatus, Session};

/// UIスレッドだけが所有する画面状態
#[derive(Debug, Default)]
pub struct AppState {
    pub accumulator: Accumulator,
    pub status: ProcessingStatus,
    pub session: Session,
    pub chat_input: String,
    pub chat_error: Option<String>,
    pub notice: String,
}

/// バックグラウンドスレッドからの通知
pub enum UiMessage {
    FileDone(FileOutcome),
    BatchDone,
    BatchAborted(String),
    ChatDone(Result<String, String>),
}
