//! 抽出結果の蓄積
//!
//! 全ファイル・全バッチの DeficiencyRecord を到着順に保持する。
//! 重複排除はしない。容量上限もない

use crate::types::DeficiencyRecord;

#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    records: Vec<DeficiencyRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加し、追加後の総件数を返す
    pub fn append(&mut self, records: impl IntoIterator<Item = DeficiencyRecord>) -> usize {
        self.records.extend(records);
        self.records.len()
    }

    /// 全件削除
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[DeficiencyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(issue: &str, source: &str) -> DeficiencyRecord {
        DeficiencyRecord {
            issue_description: issue.to_string(),
            source_file: source.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_append_returns_total() {
        let mut acc = Accumulator::new();
        assert_eq!(acc.append(vec![record("a", "1.pdf")]), 1);
        assert_eq!(acc.append(vec![record("b", "2.pdf"), record("c", "2.pdf")]), 3);
        assert_eq!(acc.append(Vec::new()), 3);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut acc = Accumulator::new();
        acc.append(vec![record("a", "1.pdf"), record("b", "1.pdf")]);
        acc.append(vec![record("c", "2.pdf")]);
        let issues: Vec<&str> = acc.records().iter().map(|r| r.issue_description.as_str()).collect();
        assert_eq!(issues, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_deduplication() {
        let mut acc = Accumulator::new();
        acc.append(vec![record("same", "1.pdf")]);
        acc.append(vec![record("same", "1.pdf")]);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut acc = Accumulator::new();
        acc.append(vec![record("a", "1.pdf")]);
        acc.reset();
        assert!(acc.is_empty());
        assert_eq!(acc.append(vec![record("b", "2.pdf")]), 1);
    }
}
