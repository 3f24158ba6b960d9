//! Update Builder - 部分更新：只更新显式提供的字段

use super::query_builder::{BindValue, QueryBuilder};
use crate::error::{JoblyError, Result};
use crate::traits::Model;
use crate::utils::{escape_identifier, is_safe_field_name, placeholder};
use std::marker::PhantomData;

/// 字段名到列名的静态映射
///
/// 查不到的字段名直接作为列名使用。
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    entries: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn column(&self, field: &'static str) -> &'static str {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// SET 子句及其按占位符顺序排列的绑定值
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// 把待更新字段转换为 `"col1"=$1, "col2"=$2` 形式的 SET 子句
///
/// 第 i 个占位符对应 `binds[i - 1]`。`fields` 为空时返回 `InvalidInput`。
pub fn build_set_clause(
    fields: Vec<(&'static str, BindValue)>,
    columns: &ColumnMap,
) -> Result<SetClause> {
    if fields.is_empty() {
        return Err(JoblyError::InvalidInput("No data".to_string()));
    }

    let mut set_parts = Vec::with_capacity(fields.len());
    let mut binds = Vec::with_capacity(fields.len());

    for (index, (field, value)) in fields.into_iter().enumerate() {
        let column = columns.column(field);
        if !is_safe_field_name(column) {
            return Err(JoblyError::InvalidInput(format!(
                "Invalid column name '{}'",
                column
            )));
        }
        set_parts.push(format!("{}={}", escape_identifier(column), placeholder(index)));
        binds.push(value);
    }

    Ok(SetClause {
        sql: set_parts.join(", "),
        binds,
    })
}

/// 补丁类型实现此 trait，声明可更新字段并给出本次提供的字段值
pub trait UpdateFields {
    /// 字段名到列名的映射
    const COLUMNS: ColumnMap;

    /// 允许更新的字段名
    const ALLOWED: &'static [&'static str];

    /// 本次显式提供的字段，按固定顺序返回
    fn changed_fields(&self) -> Vec<(&'static str, BindValue)>;
}

/// Update Builder - 生成 `UPDATE ... SET ... WHERE pk = $n RETURNING ...`
pub struct UpdateBuilder<M: Model> {
    fields: Vec<(&'static str, BindValue)>,
    columns: ColumnMap,
    allowed: Option<&'static [&'static str]>,
    _phantom: PhantomData<M>,
}

impl<M: Model> Default for UpdateBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> UpdateBuilder<M> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            columns: ColumnMap::new(&[]),
            allowed: None,
            _phantom: PhantomData,
        }
    }

    /// 从补丁类型创建，字段、列映射和允许列表均取自补丁
    pub fn from_patch<P: UpdateFields>(patch: &P) -> Self {
        Self {
            fields: patch.changed_fields(),
            columns: P::COLUMNS,
            allowed: Some(P::ALLOWED),
            _phantom: PhantomData,
        }
    }

    /// 指定要更新的字段（可链式调用多次）
    pub fn set(mut self, field: &'static str, value: impl Into<BindValue>) -> Self {
        self.fields.push((field, value.into()));
        self
    }

    pub fn columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// 生成按主键更新的 SQL 以及绑定值（SET 的值在前，主键在最后）
    pub fn build_by_id(self, id: impl Into<BindValue>) -> Result<(String, Vec<BindValue>)> {
        for (field, _) in &self.fields {
            if *field == M::PK {
                return Err(JoblyError::InvalidInput(format!(
                    "Cannot update primary key field '{}'",
                    M::PK
                )));
            }
            if let Some(allowed) = self.allowed {
                if !allowed.contains(field) {
                    return Err(JoblyError::InvalidInput(format!(
                        "Field '{}' cannot be updated in '{}'",
                        field,
                        M::TABLE
                    )));
                }
            }
        }

        let SetClause { sql: set_sql, mut binds } = build_set_clause(self.fields, &self.columns)?;

        let where_builder = QueryBuilder::new("").and_eq(M::PK, id);
        let (where_sql, _) = where_builder.build_where_sql(binds.len());
        let (_, where_binds) = where_builder.into_parts();
        binds.extend(where_binds);

        let sql = format!(
            "UPDATE {} SET {} WHERE {} RETURNING {}",
            escape_identifier(M::TABLE),
            set_sql,
            where_sql,
            M::SELECT_COLUMNS
        );
        Ok((sql, binds))
    }
}
