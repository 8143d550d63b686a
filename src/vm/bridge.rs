//! VM桥接层：把 MapperState 转为命令行可展示的文本
//!
//! 只做展示与参数转换，不持有状态。

use serde::Serialize;

use crate::model::data_core::{AppError, MapperState};
use crate::model::field_paths::{AllFields, FieldPath};
use crate::model::shadow_tree::{DocumentTree, JsonTreeNode};

// === 常量定义（消除魔法值） ===
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_SAVED: &str = "报告已保存到";
pub const STATUS_FORMATTED: &str = "格式化完成";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

/// 下拉框的未选择项
pub const SELECT_PLACEHOLDER: &str = "-- Select field --";
const CONTAINER_MARK: &str = "(container)";

/// 解析 `SRC=DST` 形式的映射参数；`SRC=` 表示选择空目标
pub fn parse_mapping_arg(arg: &str) -> Result<(String, String), AppError> {
    let (source, target) = arg
        .split_once('=')
        .ok_or_else(|| AppError::State(format!("映射参数应为 SRC=DST: {}", arg)))?;
    let source = source.trim();
    if source.is_empty() {
        return Err(AppError::State(format!("映射参数缺少源字段: {}", arg)));
    }
    Ok((source.to_string(), target.trim().to_string()))
}

/// 全部字段列表，容器节点加标记
pub fn all_fields_lines(all: &AllFields) -> Vec<String> {
    all.extracted()
        .into_iter()
        .map(|f| {
            if f.is_container {
                format!("{} {}", f.path, CONTAINER_MARK)
            } else {
                f.path
            }
        })
        .collect()
}

/// 树形视图中的一行（附带展开状态，叶子为 None）
#[derive(Debug, Serialize)]
pub struct TreeRowView<'a> {
    #[serde(flatten)]
    pub node: &'a JsonTreeNode,
    pub expanded: Option<bool>,
}

/// 叶子字段列表的 JSON 输出
pub fn leaf_fields_json(fields: &[FieldPath]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(fields)?)
}

/// 全部字段（附容器标记）的 JSON 输出
pub fn all_fields_json(all: &AllFields) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&all.extracted())?)
}

/// 当前可见树节点的 JSON 输出
pub fn tree_json(tree: &DocumentTree) -> Result<String, AppError> {
    let rows: Vec<TreeRowView> = tree
        .visible_rows()
        .into_iter()
        .map(|node| TreeRowView {
            node,
            expanded: node.kind.is_container().then(|| tree.state.is_expanded(&node.path)),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// 映射表视图：标题 + 每个源字段及其当前目标
pub fn mapping_table_lines(state: &MapperState) -> Vec<String> {
    if state.field_count() == 0 {
        return Vec::new();
    }
    let mut lines = vec![format!("Field Mapping ({} fields detected)", state.field_count())];
    for field in &state.leaf_fields {
        let target = match state.target_of(field) {
            "" => SELECT_PLACEHOLDER,
            t => t,
        };
        lines.push(format!("  {} -> {}", field, target));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field_paths::{extract_all_fields, extract_leaf_fields};
    use serde_json::{json, Value};

    #[test]
    fn test_parse_mapping_arg() {
        assert_eq!(
            parse_mapping_arg("user.name=user.id").unwrap(),
            ("user.name".to_string(), "user.id".to_string())
        );
        assert_eq!(parse_mapping_arg("name=").unwrap(), ("name".to_string(), String::new()));
        assert!(parse_mapping_arg("no-separator").is_err());
        assert!(parse_mapping_arg("=target").is_err());
    }

    #[test]
    fn test_all_fields_lines_mark_containers() {
        let lines = all_fields_lines(&extract_all_fields(r#"{"user":{"id":5}}"#));
        assert_eq!(lines, vec!["user (container)", "user.id"]);
    }

    #[test]
    fn test_mapping_table_lines() {
        let mut state = MapperState::default();
        assert!(mapping_table_lines(&state).is_empty());

        state.set_source_text(r#"{"name": "John", "age": 30}"#);
        state.set_target_text(r#"{"fullName": "John"}"#);
        state.select("name", "fullName").unwrap();

        assert_eq!(
            mapping_table_lines(&state),
            vec![
                "Field Mapping (2 fields detected)".to_string(),
                format!("  age -> {}", SELECT_PLACEHOLDER),
                "  name -> fullName".to_string(),
            ]
        );
    }

    #[test]
    fn test_fields_json_output() {
        let text = r#"{"user":{"id":5,"tags":[null,"a"]}}"#;

        let leaves: Value = serde_json::from_str(&leaf_fields_json(&extract_leaf_fields(text)).unwrap()).unwrap();
        assert_eq!(leaves, json!(["user.id", "user.tags[1]"]));

        let all: Value = serde_json::from_str(&all_fields_json(&extract_all_fields(text)).unwrap()).unwrap();
        assert_eq!(
            all,
            json!([
                {"path": "user", "is_container": true},
                {"path": "user.id", "is_container": false},
                {"path": "user.tags", "is_container": true},
                {"path": "user.tags[1]", "is_container": false}
            ])
        );
    }

    #[test]
    fn test_tree_json_output() {
        let tree = DocumentTree::from_value(&json!({"user": {"name": "John", "deep": {"x": 1}}}));
        let rows: Value = serde_json::from_str(&tree_json(&tree).unwrap()).unwrap();

        // 深度 2 的 deep 默认折叠，其子节点不输出
        assert_eq!(
            rows,
            json!([
                {"name": "root", "path": "", "kind": "Object", "children": 1, "preview": "{1}", "depth": 0, "expanded": true},
                {"name": "user", "path": "user", "kind": "Object", "children": 2, "preview": "{2}", "depth": 1, "expanded": true},
                {"name": "name", "path": "user.name", "kind": "String", "children": 0, "preview": "\"John\"", "depth": 2, "expanded": null},
                {"name": "deep", "path": "user.deep", "kind": "Object", "children": 1, "preview": "{1}", "depth": 2, "expanded": false}
            ])
        );
    }
}
