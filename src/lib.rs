//! JSON字段映射工具库
//!
//! 把源/目标 JSON 文档展平为字段路径，声明源叶子字段到目标字段的映射，
//! 并生成 markdown 映射报告；另提供带展开/折叠状态的影子树。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, MapperState, Side};
pub use model::field_paths::{extract_all_fields, extract_leaf_fields, AllFields, ExtractedField, FieldPath};
pub use model::mapping::{select, MappingTable};
pub use model::report::generate;
pub use model::shadow_tree::{build_shadow_tree, DocumentTree, JsonTreeNode, NodeKind, TreeState};
