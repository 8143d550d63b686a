//! 影子树（Shadow Tree）：仅存结构与路径，供树形视图与展开/折叠状态使用
//!
//! 展开状态按字段路径记录而非节点身份，文档重新解析后仍可按路径对齐。

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::model::field_paths::FieldPath;

/// 默认展开的深度上限（根为 0，深度 0、1 默认展开）
pub const AUTO_EXPAND_DEPTH: u32 = 2;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonTreeNode {
    /// 节点在父级中的键名或索引；根节点为 `root`
    pub name: String,
    /// 字段路径（根为空串）
    pub path: FieldPath,
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: u32,
    /// 轻量预览
    pub preview: String,
    /// 节点深度（用于缩进显示）
    pub depth: u32,
}

fn kind_of(v: &Value) -> NodeKind {
    match v {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::String(_) => NodeKind::String,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Bool,
        Value::Null => NodeKind::Null,
    }
}

fn preview_of(v: &Value) -> String {
    match v {
        Value::String(s) => {
            if s.chars().count() > 32 {
                let truncated: String = s.chars().take(32).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("{{{}}}", m.len()),
        Value::Array(a) => format!("[{}]", a.len()),
    }
}

/// 从根 Value 按先序构建扁平影子树
pub fn build_shadow_tree(root: &Value) -> Vec<JsonTreeNode> {
    fn walk(out: &mut Vec<JsonTreeNode>, v: &Value, path: &str, name: &str, depth: u32) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(JsonTreeNode {
            name: name.to_string(),
            path: path.to_string(),
            kind: kind_of(v),
            children,
            preview: preview_of(v),
            depth,
        });
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    let field_path = if path.is_empty() {
                        k.clone()
                    } else {
                        format!("{}.{}", path, k)
                    };
                    walk(out, child, &field_path, k, depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    walk(out, child, &item_path, &idx.to_string(), depth + 1);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(&mut out, root, "", "root", 0);
    out
}

/// 容器节点的展开/折叠状态，按路径寻址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeState {
    expanded: BTreeMap<FieldPath, bool>,
}

impl TreeState {
    /// 按默认策略初始化：深度小于 2 的容器展开，其余折叠
    pub fn from_rows(rows: &[JsonTreeNode]) -> Self {
        let expanded = rows
            .iter()
            .filter(|n| n.kind.is_container())
            .map(|n| (n.path.clone(), n.depth < AUTO_EXPAND_DEPTH))
            .collect();
        Self { expanded }
    }

    pub fn new(root: &Value) -> Self {
        Self::from_rows(&build_shadow_tree(root))
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.get(path).copied().unwrap_or(false)
    }

    /// 仅翻转该节点自身状态；未知路径（叶子或不存在）忽略并返回 None
    pub fn toggle(&mut self, path: &str) -> Option<bool> {
        let slot = self.expanded.get_mut(path)?;
        *slot = !*slot;
        Some(*slot)
    }

    /// 针对新文档重建状态：仍为容器的路径保留原状态，新路径取默认值
    pub fn reconcile(&self, rows: &[JsonTreeNode]) -> Self {
        let mut next = Self::from_rows(rows);
        for (path, state) in next.expanded.iter_mut() {
            if let Some(prev) = self.expanded.get(path) {
                *state = *prev;
            }
        }
        next
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// 影子树 + 展开状态
#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    pub rows: Vec<JsonTreeNode>,
    pub state: TreeState,
}

impl DocumentTree {
    pub fn from_value(root: &Value) -> Self {
        let rows = build_shadow_tree(root);
        let state = TreeState::from_rows(&rows);
        Self { rows, state }
    }

    /// 文档变化后重建，按路径保留用户的展开/折叠操作
    pub fn reconcile(&self, root: &Value) -> Self {
        let rows = build_shadow_tree(root);
        let state = self.state.reconcile(&rows);
        Self { rows, state }
    }

    pub fn toggle(&mut self, path: &str) -> Option<bool> {
        self.state.toggle(path)
    }

    pub fn visible_rows(&self) -> Vec<&JsonTreeNode> {
        visible_rows(&self.rows, &self.state)
    }

    pub fn render(&self) -> Vec<String> {
        render_tree(&self.rows, &self.state)
    }
}

/// 根节点总是可见；其余节点当且仅当所有容器祖先均已展开时可见
pub fn visible_rows<'a>(rows: &'a [JsonTreeNode], state: &TreeState) -> Vec<&'a JsonTreeNode> {
    let mut out = Vec::with_capacity(rows.len());
    // 折叠节点的深度：其后更深的节点都属于它的子树
    let mut collapsed_at: Option<u32> = None;
    for node in rows {
        if let Some(depth) = collapsed_at {
            if node.depth > depth {
                continue;
            }
            collapsed_at = None;
        }
        out.push(node);
        if node.kind.is_container() && !state.is_expanded(&node.path) {
            collapsed_at = Some(node.depth);
        }
    }
    out
}

/// 纯文本树形渲染：`▾`/`▸` 标记展开/折叠，空容器展开时显示 `{}` / `[]`
pub fn render_tree(rows: &[JsonTreeNode], state: &TreeState) -> Vec<String> {
    let mut lines = Vec::new();
    for node in visible_rows(rows, state) {
        let indent = "  ".repeat(node.depth as usize);
        if node.kind.is_container() {
            let expanded = state.is_expanded(&node.path);
            let marker = match (node.children, expanded) {
                (0, _) => ' ',
                (_, true) => '▾',
                (_, false) => '▸',
            };
            lines.push(format!("{}{} {}: {}", indent, marker, node.name, node.preview));
            if expanded && node.children == 0 {
                let empty = if node.kind == NodeKind::Array { "[]" } else { "{}" };
                lines.push(format!("{}    {}", indent, empty));
            }
        } else {
            lines.push(format!("{}  {}: {}", indent, node.name, node.preview));
        }
    }
    lines
}
