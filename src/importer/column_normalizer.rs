// ==========================================
// 保险业务数据导入 - 列归一化
// ==========================================
// 阶段 1: 原始行 → 归一化行
// 规则:
// - 列名: trim + 小写 + 空白替换为下划线
// - 单元格: 空串/纯空白 → None（与"缺失"合并）
// - 全空行: 丢弃（保留其余行的源行号）
// ==========================================

use crate::domain::import::{RawCell, RawRow};
use tracing::debug;

pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 归一化列名（"Payment Date" → "payment_date"）
    pub fn normalize_header(&self, header: &str) -> String {
        header
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect::<String>()
            .to_lowercase()
    }

    /// 归一化单元格值
    pub fn normalize_value(&self, value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    /// 归一化全部行
    pub fn normalize(&self, rows: Vec<RawRow>) -> Vec<RawRow> {
        let total = rows.len();

        let normalized: Vec<RawRow> = rows
            .into_iter()
            .map(|row| RawRow {
                row_number: row.row_number,
                cells: row
                    .cells
                    .into_iter()
                    .map(|cell| RawCell {
                        column: self.normalize_header(&cell.column),
                        value: self.normalize_value(cell.value),
                    })
                    .collect(),
            })
            .filter(|row| !row.is_blank())
            .collect();

        debug!(
            total_rows = total,
            kept_rows = normalized.len(),
            dropped_blank = total - normalized.len(),
            "列归一化完成"
        );

        normalized
    }
}

impl Default for ColumnNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row_number: usize, cells: &[(&str, Option<&str>)]) -> RawRow {
        let mut row = RawRow::new(row_number);
        for (column, value) in cells {
            row.push(*column, value.map(|v| v.to_string()));
        }
        row
    }

    #[test]
    fn test_normalize_header() {
        let normalizer = ColumnNormalizer::new();
        assert_eq!(normalizer.normalize_header("Payment Date"), "payment_date");
        assert_eq!(normalizer.normalize_header("  Customer ID "), "customer_id");
        assert_eq!(normalizer.normalize_header("First\tName"), "first_name");
        assert_eq!(normalizer.normalize_header("amount"), "amount");
    }

    #[test]
    fn test_empty_and_absent_cells_collapse() {
        let normalizer = ColumnNormalizer::new();
        let rows = normalizer.normalize(vec![row(
            1,
            &[("Amount", Some("10")), ("Notes", Some("   ")), ("City", Some(""))],
        )]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("amount"), Some("10"));
        assert_eq!(rows[0].get("notes"), None);
        assert_eq!(rows[0].get("city"), None);
        assert_eq!(rows[0].get("missing_column"), None);
    }

    #[test]
    fn test_blank_rows_dropped_and_positions_kept() {
        let normalizer = ColumnNormalizer::new();
        let rows = normalizer.normalize(vec![
            row(1, &[("a", Some("x"))]),
            row(2, &[("a", Some(" "))]),
            row(3, &[("a", None)]),
            row(4, &[("a", Some("y"))]),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[1].row_number, 4);
    }
}
