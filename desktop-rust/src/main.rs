mod app;
mod io;
mod model;

use app::DesktopApp;
use sprinkler_report::config::Config;
use sprinkler_report::logging;
use tracing::error;

fn main() -> eframe::Result<()> {
    logging::init(false);

    // 認証情報が無い場合は設定エラー画面だけを出す
    let settings = Config::load()
        .and_then(|config| config.require_api_key())
        .map_err(|err| {
            error!(error = %err, "startup configuration failed");
            err.to_string()
        });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Sprinkler Deficiency Extractor",
        options,
        Box::new(move |_cc| Box::new(DesktopApp::new(settings))),
    )
}
