use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sprinkler_report::{batch, chat, cli, config, conversation, error, export, extraction, logging, scanner};
use sprinkler_report_common::{generate_tsv, Accumulator, ProcessingStatus};
use batch::InputMode;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // config サブコマンドは壊れた設定ファイルでも上書きできるようにする
    let config = if matches!(cli.command, Commands::Config { .. }) {
        Config::load_or_default()?
    } else {
        Config::load()?
    };
    // 認証情報が無ければ何もせず終了
    let settings = if cli.command.needs_api() {
        Some(config.require_api_key()?)
    } else {
        None
    };

    match cli.command {
        Commands::Extract { paths, output, tsv, excel, text } => {
            let Some(settings) = settings else {
                return Err(error::ReportError::MissingApiKey);
            };
            eprintln!("🧯 sprinkler-report - deficiency extraction\n");

            let files = scanner::collect_reports(&paths)?;
            if files.is_empty() {
                let joined = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
                return Err(error::ReportError::NoReportsFound(joined));
            }
            eprintln!("✔ {} report(s) queued", files.len());

            let client = extraction::ExtractionClient::from_settings(&settings)?;
            let mode = if text { InputMode::Text } else { InputMode::Attachment };
            let mut accumulator = Accumulator::new();
            let mut status = ProcessingStatus::default();

            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let summary = batch::run_batch(
                &client,
                &files,
                mode,
                &mut accumulator,
                &mut status,
                |done, total, file_name, status| {
                    bar.set_position(status.progress as u64);
                    bar.set_message(format!("[{}/{}] {}", done, total, file_name));
                },
            )
            .await;
            bar.finish_and_clear();

            eprintln!(
                "✔ {} item(s) mapped from {} report(s), {} failed",
                accumulator.len(),
                summary.processed,
                summary.failures.len()
            );
            if let Some(message) = &status.error {
                eprintln!("✖ {}", message);
            }

            let records = accumulator.records();
            let mut wrote_any = false;
            if let Some(path) = output {
                let path = export::write_json(records, &path)?;
                eprintln!("✔ JSON: {}", path.display());
                wrote_any = true;
            }
            if let Some(path) = tsv {
                let path = export::write_tsv(records, &path)?;
                eprintln!("✔ TSV: {}", path.display());
                wrote_any = true;
            }
            if let Some(path) = excel {
                let path = export::write_excel(records, &path)?;
                eprintln!("✔ Excel: {}", path.display());
                wrote_any = true;
            }
            if !wrote_any {
                // 出力指定が無ければTSVを標準出力へ（Excelに貼り付け可能）
                println!("{}", generate_tsv(records));
            }
        }

        Commands::Chat => {
            let Some(settings) = settings else {
                return Err(error::ReportError::MissingApiKey);
            };
            let client = conversation::ConversationClient::from_settings(&settings)?;
            chat::run_chat(&client).await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ API key saved");
            }

            if show {
                let has_key = config.resolve_api_key(std::env::var(config::API_KEY_ENV).ok()).is_some();
                println!("Settings:");
                println!("  Model: {}", config.model);
                println!("  Endpoint: {}", config.endpoint);
                println!("  Timeout: {}s", config.timeout_seconds);
                println!("  API key: {}", if has_key { "set" } else { "not set" });
            }
        }
    }

    Ok(())
}
