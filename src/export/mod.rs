use sprinkler_report_common::export::excel_core::generate_excel_buffer;
use sprinkler_report_common::{generate_tsv, DeficiencyRecord};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// 出力先にファイル名が無ければタイムスタンプ付きの既定名を使う
pub fn output_path_for(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        output.join(format!("deficiencies-{}.{}", stamp, extension))
    } else {
        output.to_path_buf()
    }
}

pub fn write_tsv(records: &[DeficiencyRecord], output: &Path) -> Result<PathBuf> {
    let path = output_path_for(output, "tsv");
    ensure_parent(&path)?;
    std::fs::write(&path, generate_tsv(records))?;
    Ok(path)
}

pub fn write_json(records: &[DeficiencyRecord], output: &Path) -> Result<PathBuf> {
    let path = output_path_for(output, "json");
    ensure_parent(&path)?;
    std::fs::write(&path, serde_json::to_string_pretty(records)?)?;
    Ok(path)
}

pub fn write_excel(records: &[DeficiencyRecord], output: &Path) -> Result<PathBuf> {
    let path = output_path_for(output, "xlsx");
    ensure_parent(&path)?;
    let buffer = generate_excel_buffer(records)?;
    std::fs::write(&path, buffer)?;
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
