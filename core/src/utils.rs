//! 工具函数模块

/// 验证字段名是否安全
pub fn is_safe_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 转义 SQL 标识符（PostgreSQL 使用双引号）
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// PostgreSQL 位置占位符，index 从 0 开始
pub fn placeholder(index: usize) -> String {
    format!("${}", index + 1)
}
