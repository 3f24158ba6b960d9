/// 主键 ID 类型（PostgreSQL SERIAL）
pub type Id = i32;

/// Model trait 定义了模型的基本元数据
pub trait Model: Sized {
    /// 表名
    const TABLE: &'static str;
    /// 主键字段名
    const PK: &'static str;
    /// SELECT / RETURNING 使用的列清单，可包含 `AS` 别名，
    /// 别名需与 `FromRow` 读取的列名一致
    const SELECT_COLUMNS: &'static str;

    /// `SELECT <columns> FROM <table>`
    fn select_sql() -> String {
        format!(
            "SELECT {} FROM {}",
            Self::SELECT_COLUMNS,
            crate::utils::escape_identifier(Self::TABLE)
        )
    }
}
