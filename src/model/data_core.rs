//! MapperState：一次映射会话的核心状态
//!
//! 持有源/目标文档文本及其派生数据（字段列表、影子树）和映射表。
//! 文本每次变化都全量重算派生数据；映射表跨重算保留，只在出报告时剔除过期键。

use std::path::Path;

use thiserror::Error;

use crate::model::document::parse_document;
use crate::model::field_paths::{all_fields_of, leaf_fields_of, target_options, AllFields, FieldPath, TargetOption};
use crate::model::mapping::MappingTable;
use crate::model::report::generate;
use crate::model::shadow_tree::DocumentTree;
use crate::utils::fs::read_text_file;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("状态错误: {0}")]
    State(String),
}

/// 文档的一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

#[derive(Debug, Default)]
pub struct MapperState {
    pub source_text: String,
    pub target_text: String,
    /// 源文档叶子字段（可映射）
    pub leaf_fields: Vec<FieldPath>,
    /// 目标文档全部字段（含容器标记）
    pub target_fields: AllFields,
    /// 解析失败或为空时为 None
    pub source_tree: Option<DocumentTree>,
    pub target_tree: Option<DocumentTree>,
    pub mappings: MappingTable,
}

/// 解析成功则按路径对齐旧的展开状态，否则丢弃树
fn rebuild_tree(prev: Option<&DocumentTree>, text: &str) -> Option<DocumentTree> {
    let value = parse_document(text)?;
    Some(match prev {
        Some(tree) => tree.reconcile(&value),
        None => DocumentTree::from_value(&value),
    })
}

impl MapperState {
    /// 更新源文档并重算叶子字段；映射表不变
    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
        let parsed = parse_document(&self.source_text);
        self.leaf_fields = parsed.as_ref().map(leaf_fields_of).unwrap_or_default();
        self.source_tree = rebuild_tree(self.source_tree.as_ref(), &self.source_text);
        tracing::debug!("源文档更新：{} 个叶子字段", self.leaf_fields.len());
    }

    /// 更新目标文档并重算全部字段
    pub fn set_target_text(&mut self, text: impl Into<String>) {
        self.target_text = text.into();
        let parsed = parse_document(&self.target_text);
        self.target_fields = parsed.as_ref().map(all_fields_of).unwrap_or_default();
        self.target_tree = rebuild_tree(self.target_tree.as_ref(), &self.target_text);
        tracing::debug!(
            "目标文档更新：{} 个字段，其中 {} 个容器",
            self.target_fields.fields.len(),
            self.target_fields.containers.len()
        );
    }

    /// 从文件加载源文档
    pub fn load_source_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        self.set_source_text(text);
        tracing::info!("已加载源文档: {}", p.display());
        Ok(())
    }

    /// 从文件加载目标文档
    pub fn load_target_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        self.set_target_text(text);
        tracing::info!("已加载目标文档: {}", p.display());
        Ok(())
    }

    /// 选择映射目标（重复选择同一目标即取消）
    ///
    /// 源字段必须是当前叶子字段；非空目标必须是当前目标文档中的非容器字段。
    /// 校验失败时映射表保持不变。
    pub fn select(&mut self, source: &str, target: &str) -> Result<(), AppError> {
        if self.leaf_fields.binary_search_by(|f| f.as_str().cmp(source)).is_err() {
            return Err(AppError::State(format!("源字段不存在: {}", source)));
        }
        if !target.is_empty() {
            if !self.target_fields.contains(target) {
                return Err(AppError::State(format!("目标字段不存在: {}", target)));
            }
            if self.target_fields.is_container(target) {
                return Err(AppError::State(format!("容器节点不可作为映射目标: {}", target)));
            }
        }

        self.mappings = self.mappings.select(source, target);
        match self.mappings.target_of(source) {
            "" => tracing::info!("取消映射: {}", source),
            t => tracing::info!("映射: {} -> {}", source, t),
        }
        Ok(())
    }

    /// 某个源字段当前选择的目标（未映射为空串）
    pub fn target_of(&self, source: &str) -> &str {
        self.mappings.target_of(source)
    }

    /// 检测到的源字段数量
    pub fn field_count(&self) -> usize {
        self.leaf_fields.len()
    }

    /// 目标字段下拉项
    pub fn target_options(&self) -> Vec<TargetOption> {
        target_options(&self.target_fields)
    }

    /// 生成报告；源文档中已不存在的字段不会出现
    pub fn report(&self) -> String {
        generate(&self.mappings.pruned(&self.leaf_fields))
    }

    pub fn tree(&self, side: Side) -> Option<&DocumentTree> {
        match side {
            Side::Source => self.source_tree.as_ref(),
            Side::Target => self.target_tree.as_ref(),
        }
    }

    /// 切换某侧树节点的展开状态
    pub fn toggle_node_expanded(&mut self, side: Side, path: &str) -> Option<bool> {
        let tree = match side {
            Side::Source => self.source_tree.as_mut(),
            Side::Target => self.target_tree.as_mut(),
        }?;
        let state = tree.toggle(path);
        if state.is_none() {
            tracing::warn!("不是可展开的节点: {:?}", path);
        }
        state
    }
}
