//! Insert Builder - 支持指定插入字段

use super::query_builder::BindValue;
use crate::error::{JoblyError, Result};
use crate::traits::Model;
use crate::utils::{escape_identifier, is_safe_field_name, placeholder};
use std::marker::PhantomData;

/// Insert Builder - 生成 `INSERT ... VALUES (...) RETURNING ...`
pub struct InsertBuilder<M: Model> {
    values: Vec<(&'static str, BindValue)>,
    _phantom: PhantomData<M>,
}

impl<M: Model> Default for InsertBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> InsertBuilder<M> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// 指定要插入的列及其值（可链式调用多次）
    pub fn value(mut self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// 生成 SQL 以及与占位符顺序一致的绑定值
    pub fn build(self) -> Result<(String, Vec<BindValue>)> {
        if self.values.is_empty() {
            return Err(JoblyError::InvalidInput("No data".to_string()));
        }

        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        let mut binds = Vec::with_capacity(self.values.len());

        for (index, (column, value)) in self.values.into_iter().enumerate() {
            if column == M::PK {
                return Err(JoblyError::InvalidInput(format!(
                    "Primary key '{}' is assigned by the database",
                    M::PK
                )));
            }
            if !is_safe_field_name(column) {
                return Err(JoblyError::InvalidInput(format!(
                    "Invalid column name '{}'",
                    column
                )));
            }
            columns.push(escape_identifier(column));
            placeholders.push(placeholder(index));
            binds.push(value);
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            escape_identifier(M::TABLE),
            columns.join(", "),
            placeholders.join(", "),
            M::SELECT_COLUMNS
        );
        Ok((sql, binds))
    }
}
