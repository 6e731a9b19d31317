//! 進捗率の計算

/// 完了件数から進捗率（0-100）を求める
///
/// `round(100 * done / total)`。0.5は切り上げ。`total == 0` は0
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u8
}
