use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sprinkler-report")]
#[command(about = "Fire sprinkler inspection deficiency extractor and estimator assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 検査報告書（PDF・画像）から不備を抽出
    Extract {
        /// 報告書ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TSVの出力先（出力指定が無ければ標準出力へTSV）
        #[arg(long)]
        tsv: Option<PathBuf>,

        /// Excelの出力先
        #[arg(long)]
        excel: Option<PathBuf>,

        /// 入力をテキストの報告書本文として扱う
        #[arg(long)]
        text: bool,
    },

    /// 見積アシスタントと対話
    Chat,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// 推論APIを使うコマンドか
    pub fn needs_api(&self) -> bool {
        matches!(self, Commands::Extract { .. } | Commands::Chat)
    }
}
