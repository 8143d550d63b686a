//! 字段映射表：源字段路径 → 目标字段路径
//!
//! 空字符串表示“未选择目标”。表按插入顺序迭代，重新赋值不改变位置。

use indexmap::IndexMap;

use crate::model::field_paths::FieldPath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: IndexMap<FieldPath, FieldPath>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 选择目标字段；与当前值相同则取消选择（置为空）。返回新表，不修改原表
    pub fn select(&self, source: &str, target: &str) -> MappingTable {
        let mut entries = self.entries.clone();
        let next = if self.entries.get(source).map(String::as_str) == Some(target) {
            String::new()
        } else {
            target.to_string()
        };
        entries.insert(source.to_string(), next);
        MappingTable { entries }
    }

    /// 当前目标；未映射时为空串
    pub fn target_of(&self, source: &str) -> &str {
        self.entries.get(source).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 目标非空的条目数
    pub fn mapped_count(&self) -> usize {
        self.entries.values().filter(|t| !t.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// 仅返回仍属于当前叶子字段集合的条目（过期键不展示）
    ///
    /// `leaf_fields` 须按字典序排序（提取结果即如此）。
    pub fn visible_entries<'a>(
        &'a self,
        leaf_fields: &'a [FieldPath],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter(move |(s, _)| is_current(leaf_fields, s))
    }

    /// 去掉过期键；只删除，不改写任何值。`leaf_fields` 须已排序
    pub fn pruned(&self, leaf_fields: &[FieldPath]) -> MappingTable {
        let entries = self
            .entries
            .iter()
            .filter(|(s, _)| is_current(leaf_fields, s))
            .map(|(s, t)| (s.clone(), t.clone()))
            .collect();
        MappingTable { entries }
    }
}

/// 在已排序的叶子字段中二分查找
fn is_current(leaf_fields: &[FieldPath], source: &str) -> bool {
    leaf_fields
        .binary_search_by(|f| f.as_str().cmp(source))
        .is_ok()
}

impl<S: Into<FieldPath>, T: Into<FieldPath>> FromIterator<(S, T)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        MappingTable {
            entries: iter.into_iter().map(|(s, t)| (s.into(), t.into())).collect(),
        }
    }
}

/// 函数式入口：`select(table, source, target)`
pub fn select(table: &MappingTable, source: &str, target: &str) -> MappingTable {
    table.select(source, target)
}
