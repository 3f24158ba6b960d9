use crate::utils::{escape_identifier, placeholder};
use bigdecimal::BigDecimal;

/// 绑定值，用于安全地传递参数
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    String(String),
    Int32(i32),
    Decimal(BigDecimal),
    /// 带类型的 NULL，PostgreSQL 需要知道参数类型
    Null(NullKind),
}

/// NULL 绑定值对应的列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullKind {
    Int32,
    Decimal,
}

/// SQL 操作符枚举
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operator {
    /// 等于: =
    Eq,
    /// 大于等于: >=
    Ge,
    /// 不区分大小写的 LIKE（PostgreSQL ILIKE）
    ILike,
    /// 大于零: > 0，不占用绑定参数
    Positive,
}

impl Operator {
    /// 将操作符转换为 SQL 字符串，需要绑定参数的操作符会推进 bind_index
    fn to_sql(self, bind_index: &mut usize) -> String {
        let sql = match self {
            Operator::Eq => format!("= {}", placeholder(*bind_index)),
            Operator::Ge => format!(">= {}", placeholder(*bind_index)),
            Operator::ILike => format!("ILIKE {}", placeholder(*bind_index)),
            Operator::Positive => return "> 0".to_string(),
        };
        *bind_index += 1;
        sql
    }
}

/// 安全的查询构建器，使用绑定参数而非字符串拼接
///
/// 所有条件按添加顺序以 AND 连接；条件中的占位符序号与 `binds` 中的位置一一对应。
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_sql: String,
    conditions: Vec<(String, Operator)>,
    order_by: Vec<(String, bool)>, // (field, ascending)
    binds: Vec<BindValue>,
}

impl QueryBuilder {
    pub fn new(base_sql: impl Into<String>) -> Self {
        Self {
            base_sql: base_sql.into(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            binds: Vec::new(),
        }
    }

    /// 替换基础 SQL（保留已有的条件、排序和绑定）
    pub fn with_base_sql(mut self, base_sql: impl Into<String>) -> Self {
        self.base_sql = base_sql.into();
        self
    }

    pub fn and_eq(mut self, field: &str, value: impl Into<BindValue>) -> Self {
        self.conditions.push((field.to_string(), Operator::Eq));
        self.binds.push(value.into());
        self
    }

    pub fn and_ge(mut self, field: &str, value: impl Into<BindValue>) -> Self {
        self.conditions.push((field.to_string(), Operator::Ge));
        self.binds.push(value.into());
        self
    }

    /// 不区分大小写的子串匹配（%value%）
    pub fn and_ilike(mut self, field: &str, value: impl Into<String>) -> Self {
        let s = value.into();
        self.conditions.push((field.to_string(), Operator::ILike));
        self.binds.push(BindValue::String(format!("%{}%", s)));
        self
    }

    /// 字段值大于零
    pub fn and_positive(mut self, field: &str) -> Self {
        self.conditions.push((field.to_string(), Operator::Positive));
        self
    }

    pub fn order_by(mut self, field: &str, ascending: bool) -> Self {
        self.order_by.push((field.to_string(), ascending));
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// 生成条件部分的 SQL（不包含 WHERE 关键字、base_sql 和 ORDER BY）
    ///
    /// 占位符从 `start_bind_index` 开始编号，返回 (sql, 下一个可用的 bind_index)
    pub fn build_where_sql(&self, start_bind_index: usize) -> (String, usize) {
        let mut bind_index = start_bind_index;
        let parts: Vec<String> = self
            .conditions
            .iter()
            .map(|(field, op)| format!("{} {}", escape_identifier(field), op.to_sql(&mut bind_index)))
            .collect();
        (parts.join(" AND "), bind_index)
    }

    pub fn into_sql(&self) -> String {
        let mut sql = self.base_sql.clone();

        if self.has_conditions() {
            sql.push_str(" WHERE ");
            let (conditions_sql, _) = self.build_where_sql(0);
            sql.push_str(&conditions_sql);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, ascending)| {
                    let escaped_field = escape_identifier(field);
                    if *ascending {
                        escaped_field
                    } else {
                        format!("{} DESC", escaped_field)
                    }
                })
                .collect();
            sql.push_str(&order.join(", "));
        }

        sql
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// 消费构建器，返回 (sql, binds)
    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        let sql = self.into_sql();
        (sql, self.binds)
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

impl From<i32> for BindValue {
    fn from(i: i32) -> Self {
        BindValue::Int32(i)
    }
}

impl From<BigDecimal> for BindValue {
    fn from(d: BigDecimal) -> Self {
        BindValue::Decimal(d)
    }
}

impl From<Option<i32>> for BindValue {
    fn from(v: Option<i32>) -> Self {
        v.map_or(BindValue::Null(NullKind::Int32), BindValue::Int32)
    }
}

impl From<Option<BigDecimal>> for BindValue {
    fn from(v: Option<BigDecimal>) -> Self {
        v.map_or(BindValue::Null(NullKind::Decimal), BindValue::Decimal)
    }
}
