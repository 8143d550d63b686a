//! 文档解析与格式化（美化 / 压缩）

use serde_json::Value;

use crate::model::data_core::AppError;

/// 软解析：空白或非法 JSON 返回 None，不向上抛错
pub fn parse_document(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// 带诊断的解析：空白输入视为“尚无文档”，非法 JSON 返回解析错误
pub fn diagnose(text: &str) -> Result<Option<Value>, AppError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

/// 美化：两空格缩进，保持键顺序
pub fn beautify(text: &str) -> Result<String, AppError> {
    let v: Value = serde_json::from_str(text)?;
    Ok(serde_json::to_string_pretty(&v)?)
}

/// 压缩为单行
pub fn minify(text: &str) -> Result<String, AppError> {
    let v: Value = serde_json::from_str(text)?;
    Ok(serde_json::to_string(&v)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_soft_failure() {
        assert!(parse_document("").is_none());
        assert!(parse_document("  ").is_none());
        assert!(parse_document("{invalid}").is_none());
        assert!(parse_document(r#"{"a":1}"#).is_some());
    }

    #[test]
    fn test_diagnose_reports_parse_error() {
        assert!(matches!(diagnose(""), Ok(None)));
        assert!(matches!(diagnose("[1,2]"), Ok(Some(Value::Array(_)))));

        let err = diagnose(r#"{"invalid": json content}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_beautify_preserves_key_order() {
        let out = beautify(r#"{"zebra":1,"apple":{"b":true}}"#).unwrap();
        assert_eq!(out, "{\n  \"zebra\": 1,\n  \"apple\": {\n    \"b\": true\n  }\n}");
    }

    #[test]
    fn test_minify() {
        let out = minify("{\n  \"name\": \"John\",\n  \"tags\": [1, 2]\n}").unwrap();
        assert_eq!(out, r#"{"name":"John","tags":[1,2]}"#);
    }

    #[test]
    fn test_format_rejects_invalid_json() {
        assert!(beautify("{oops").is_err());
        assert!(minify("").is_err());
    }
}
