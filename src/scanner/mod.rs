use crate::encoder::mime_for_path;
use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl ReportFile {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path: path.to_path_buf(), file_name }
    }
}

/// フォルダ直下の報告書ファイル（PDF・画像）をファイル名順に列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<ReportFile>> {
    if !folder.exists() {
        return Err(ReportError::PathNotFound(folder.display().to_string()));
    }

    let mut reports: Vec<ReportFile> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && mime_for_path(e.path()).is_some())
        .map(|e| ReportFile::from_path(e.path()))
        .collect();

    reports.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(reports)
}

/// CLI引数のパスを展開する
///
/// ファイルは拡張子に関わらず指定順で採用（非対応形式はバッチ中のエラーになる）。
/// フォルダは scan_folder で展開する
pub fn collect_reports(paths: &[PathBuf]) -> Result<Vec<ReportFile>> {
    let mut reports = Vec::new();

    for path in paths {
        if path.is_dir() {
            reports.extend(scan_folder(path)?);
        } else if path.is_file() {
            reports.push(ReportFile::from_path(path));
        } else {
            return Err(ReportError::PathNotFound(path.display().to_string()));
        }
    }

    Ok(reports)
}
