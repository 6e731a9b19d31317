//! Sprinkler Report Common Library
//!
//! CLIとデスクトップで共有される型・プロンプト・パーサー・エクスポート

pub mod types;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod progress;
pub mod accumulator;
pub mod session;
pub mod export;

pub use types::{
    strip_data_url_prefix, ConversationTurn, DeficiencyRecord, EncodedPayload, ProcessingStatus,
    Role, DEFICIENCY_FIELDS,
};
pub use error::{Error, Result};
pub use prompts::{build_file_instruction, ESTIMATOR_SYSTEM_PROMPT, EXTRACTION_SYSTEM_PROMPT};
pub use parser::{parse_deficiency_response, strip_code_fence};
pub use progress::progress_percent;
pub use accumulator::Accumulator;
pub use session::{Session, SessionState, Transcript};
pub use export::header_label;
pub use export::tsv::generate_tsv;
