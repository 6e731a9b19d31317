//! Sprinkler Report
//!
//! 検査報告書から不備を抽出し、表として蓄積・出力する。
//! 推論APIとの通信・ファイル読み込みなど非同期処理を担当

pub mod cli;
pub mod config;
pub mod error;
pub mod encoder;
pub mod scanner;
pub mod inference;
pub mod extraction;
pub mod conversation;
pub mod batch;
pub mod chat;
pub mod export;
pub mod logging;
