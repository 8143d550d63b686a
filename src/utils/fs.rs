//! IO helper: 读取文档文本、写出报告

use std::{fs, path::Path, path::PathBuf};

use crate::model::data_core::AppError;
use crate::model::report::REPORT_FILE_NAME;

/// 读取整个文件为文本
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 写出文本文件（覆盖）
pub fn write_text_file(p: &Path, text: &str) -> Result<(), AppError> {
    fs::write(p, text)?;
    Ok(())
}

/// 报告输出路径：目标为目录时使用默认文件名
pub fn report_output_path(p: &Path) -> PathBuf {
    if p.is_dir() {
        p.join(REPORT_FILE_NAME)
    } else {
        p.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().expect("创建临时目录失败");
        let path = dir.path().join("plan.md");

        write_text_file(&path, "## Field Mappings\n").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "## Field Mappings\n");
    }

    #[test]
    fn test_report_output_path_for_directory() {
        let dir = tempdir().expect("创建临时目录失败");
        assert_eq!(report_output_path(dir.path()), dir.path().join(REPORT_FILE_NAME));

        let file = dir.path().join("custom.md");
        assert_eq!(report_output_path(&file), file);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_text_file(Path::new("/nonexistent/input.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
