pub mod data_core;
pub mod document;
pub mod field_paths;
pub mod mapping;
pub mod report;
pub mod shadow_tree;
