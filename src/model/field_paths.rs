//! 字段路径提取：把任意 JSON 展平为有序、去重的字段路径集合
//!
//! 路径格式：对象访问追加 `.key`（顶层不带前导分隔符），数组访问追加 `[index]`，
//! 例如 `user.addresses[0].city`。解析失败或空输入一律返回空结果。

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::model::document::parse_document;

/// 字段路径（字符串即身份）
pub type FieldPath = String;

/// 单个提取出的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedField {
    pub path: FieldPath,
    /// 对象/数组节点（不可作为映射目标）
    pub is_container: bool,
}

/// 完整模式的提取结果：全部路径 + 容器路径子集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllFields {
    /// 按字典序排序的全部路径（叶子与容器）
    pub fields: Vec<FieldPath>,
    pub containers: BTreeSet<FieldPath>,
}

impl AllFields {
    pub fn is_container(&self, path: &str) -> bool {
        self.containers.contains(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.binary_search_by(|p| p.as_str().cmp(path)).is_ok()
    }

    /// 按 `fields` 顺序附带容器标记
    pub fn extracted(&self) -> Vec<ExtractedField> {
        self.fields
            .iter()
            .map(|path| ExtractedField {
                path: path.clone(),
                is_container: self.is_container(path),
            })
            .collect()
    }
}

/// 目标字段下拉项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOption {
    pub path: FieldPath,
    /// 层级化显示文本
    pub label: String,
    /// 容器节点仅展示，不可选
    pub disabled: bool,
}

/// 子路径拼接：对象键
fn key_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// 子路径拼接：数组下标
fn index_path(prefix: &str, idx: usize) -> String {
    format!("{}[{}]", prefix, idx)
}

fn is_container_value(v: &Value) -> bool {
    matches!(v, Value::Object(_) | Value::Array(_))
}

/// 深度优先遍历；`with_containers` 为真时容器路径在递归前先记入
fn walk(
    v: &Value,
    prefix: &str,
    with_containers: bool,
    fields: &mut BTreeSet<FieldPath>,
    containers: &mut BTreeSet<FieldPath>,
) {
    match v {
        Value::Object(map) => {
            if with_containers && !prefix.is_empty() {
                containers.insert(prefix.to_string());
                fields.insert(prefix.to_string());
            }
            for (key, child) in map {
                let field_path = key_path(prefix, key);
                if is_container_value(child) {
                    walk(child, &field_path, with_containers, fields, containers);
                } else {
                    fields.insert(field_path);
                }
            }
        }
        Value::Array(arr) => {
            if with_containers && !prefix.is_empty() {
                containers.insert(prefix.to_string());
                fields.insert(prefix.to_string());
            }
            for (idx, child) in arr.iter().enumerate() {
                walk(child, &index_path(prefix, idx), with_containers, fields, containers);
            }
        }
        // 数组中的 null 元素不产生字段（对象键下的 null 仍是叶子，见上方分支）
        Value::Null => {}
        // 数组元素中的原始值；顶层原始值（空前缀）不产生字段
        _ => {
            if !prefix.is_empty() {
                fields.insert(prefix.to_string());
            }
        }
    }
}

/// 从已解析的值提取叶子字段
pub fn leaf_fields_of(root: &Value) -> Vec<FieldPath> {
    let mut fields = BTreeSet::new();
    let mut unused = BTreeSet::new();
    walk(root, "", false, &mut fields, &mut unused);
    fields.into_iter().collect()
}

/// 从已解析的值提取全部字段（含容器标记）
pub fn all_fields_of(root: &Value) -> AllFields {
    let mut fields = BTreeSet::new();
    let mut containers = BTreeSet::new();
    walk(root, "", true, &mut fields, &mut containers);
    AllFields {
        fields: fields.into_iter().collect(),
        containers,
    }
}

/// 源文档：只提取可映射的叶子字段，空输入或非法 JSON 返回空列表
pub fn extract_leaf_fields(text: &str) -> Vec<FieldPath> {
    parse_document(text)
        .map(|v| leaf_fields_of(&v))
        .unwrap_or_default()
}

/// 目标文档：提取全部字段，并标记容器节点
pub fn extract_all_fields(text: &str) -> AllFields {
    parse_document(text)
        .map(|v| all_fields_of(&v))
        .unwrap_or_default()
}

/// 把字段路径渲染为层级节点：每个 `.` 一级缩进标记，后接最后一段
pub fn node_label(path: &str) -> String {
    let mut parts: Vec<&str> = path.split('.').collect();
    let depth = parts.len() - 1;
    let last = parts.pop().unwrap_or_default();
    format!("{}{}", "┗\u{00A0}".repeat(depth), last)
}

/// 生成目标字段下拉项，顺序与 `fields` 一致
pub fn target_options(all: &AllFields) -> Vec<TargetOption> {
    all.fields
        .iter()
        .map(|path| TargetOption {
            path: path.clone(),
            label: node_label(path),
            disabled: all.is_container(path),
        })
        .collect()
}
