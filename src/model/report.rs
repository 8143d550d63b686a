//! 映射报告：把映射表渲染为 markdown 表格

use crate::model::mapping::MappingTable;

/// 报告下载时的默认文件名
pub const REPORT_FILE_NAME: &str = "field-mapping-plan.md";

pub const REPORT_TITLE: &str = "## Field Mappings\n\n";

/// 没有任何有效映射时的占位文本
pub const REPORT_PLACEHOLDER: &str = "## Field Mappings\n\nNo field mappings configured yet. Create mappings in the table above to generate the implementation plan.";

const HEADER_ROW: &str = "| Source Field (Left) | Target Field (Right) | Status |\n";
const SEPARATOR_ROW: &str = "|---|---|---|\n";
const STATUS_MAPPED: &str = "✓ Mapped";

/// 生成报告；行顺序与映射表迭代顺序一致，目标为空的条目整行省略
pub fn generate(table: &MappingTable) -> String {
    if table.mapped_count() == 0 {
        return REPORT_PLACEHOLDER.to_string();
    }

    let mut plan = String::from(REPORT_TITLE);
    plan.push_str(HEADER_ROW);
    plan.push_str(SEPARATOR_ROW);
    for (source, target) in table.iter().filter(|(_, t)| !t.is_empty()) {
        plan.push_str(&format!("| `{}` | `{}` | {} |\n", source, target, STATUS_MAPPED));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_placeholder() {
        assert_eq!(generate(&MappingTable::new()), REPORT_PLACEHOLDER);
    }

    #[test]
    fn test_all_cleared_entries_placeholder() {
        let table = MappingTable::from_iter([("a", ""), ("b", "")]);
        assert_eq!(generate(&table), REPORT_PLACEHOLDER);
    }

    #[test]
    fn test_single_row() {
        let table = MappingTable::from_iter([("user.name", "user.id")]);
        let expected = "## Field Mappings\n\n\
            | Source Field (Left) | Target Field (Right) | Status |\n\
            |---|---|---|\n\
            | `user.name` | `user.id` | ✓ Mapped |\n";
        assert_eq!(generate(&table), expected);
    }

    #[test]
    fn test_rows_follow_table_order_and_skip_empty() {
        let table = MappingTable::from_iter([("zeta", "z"), ("alpha", ""), ("mid", "m")])
            .select("zeta", "z2");
        let report = generate(&table);
        let rows: Vec<&str> = report.lines().skip(4).collect();
        assert_eq!(rows, vec!["| `zeta` | `z2` | ✓ Mapped |", "| `mid` | `m` | ✓ Mapped |"]);
        assert!(!report.contains("alpha"));
        assert!(!report.contains("Pending"));
    }
}
