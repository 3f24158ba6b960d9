//! Delete Builder - 按 WHERE 条件删除

use super::query_builder::{BindValue, QueryBuilder};
use crate::error::{JoblyError, Result};
use crate::traits::Model;
use crate::utils::escape_identifier;
use std::marker::PhantomData;

/// Delete Builder - 生成 `DELETE FROM ... WHERE ... RETURNING pk`
///
/// 没有任何条件时拒绝生成 SQL，避免整表删除。
pub struct DeleteBuilder<M: Model> {
    where_builder: QueryBuilder,
    _phantom: PhantomData<M>,
}

impl<M: Model> Default for DeleteBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> DeleteBuilder<M> {
    pub fn new() -> Self {
        Self {
            where_builder: QueryBuilder::new(""),
            _phantom: PhantomData,
        }
    }

    /// 添加 WHERE 条件（复用 QueryBuilder）
    pub fn condition<F>(mut self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        self.where_builder = f(self.where_builder);
        self
    }

    pub fn by_id(self, id: impl Into<BindValue>) -> Self {
        self.condition(|q| q.and_eq(M::PK, id))
    }

    pub fn build(self) -> Result<(String, Vec<BindValue>)> {
        if !self.where_builder.has_conditions() {
            return Err(JoblyError::InvalidInput(format!(
                "Refusing to delete from '{}' without conditions",
                M::TABLE
            )));
        }

        let (where_sql, _) = self.where_builder.build_where_sql(0);
        let sql = format!(
            "DELETE FROM {} WHERE {} RETURNING {}",
            escape_identifier(M::TABLE),
            where_sql,
            escape_identifier(M::PK)
        );
        let (_, binds) = self.where_builder.into_parts();
        Ok((sql, binds))
    }
}
