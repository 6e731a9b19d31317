use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use eframe::egui::DroppedFile;
use sprinkler_report::export::write_excel;
use sprinkler_report_common::DeficiencyRecord;

pub fn pick_reports() -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Reports", &["pdf", "png", "jpg", "jpeg", "gif", "webp"])
        .pick_files()
        .unwrap_or_default()
}

/// ドロップされたファイルのうちパスを持つものだけ採用
pub fn dropped_paths(files: &[DroppedFile]) -> Vec<PathBuf> {
    files.iter().filter_map(|f| f.path.clone()).collect()
}

pub fn save_excel(records: &[DeficiencyRecord]) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Excel", &["xlsx"])
        .set_file_name("deficiencies.xlsx")
        .save_file()
    else {
        return Ok(None);
    };
    let written = write_excel(records, &path).with_context(|| format!("write {}", path.display()))?;
    Ok(Some(written))
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("report")
        .to_string()
}
