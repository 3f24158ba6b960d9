//! 通用 CRUD 执行函数
//!
//! 每个函数只发出一条语句，执行器可以是连接池、连接或调用方持有的事务。

use crate::builder::query_builder::{BindValue, NullKind, QueryBuilder};
use crate::builder::{DeleteBuilder, InsertBuilder, UpdateBuilder};
use crate::error::Result;
use crate::traits::{Id, Model};
use bigdecimal::BigDecimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;

/// 将单个绑定值应用到查询中，`sqlx::query` 与 `sqlx::query_as` 共用
macro_rules! apply_bind_value {
    ($query:expr, $bind:expr) => {
        match $bind {
            BindValue::String(s) => $query.bind(s),
            BindValue::Int32(i) => $query.bind(i),
            BindValue::Decimal(d) => $query.bind(d),
            BindValue::Null(kind) => match kind {
                NullKind::Int32 => $query.bind(Option::<i32>::None),
                NullKind::Decimal => $query.bind(Option::<BigDecimal>::None),
            },
        }
    };
}

fn apply_binds_to_query(
    mut query: Query<'_, Postgres, PgArguments>,
    binds: Vec<BindValue>,
) -> Query<'_, Postgres, PgArguments> {
    for bind in binds {
        query = apply_bind_value!(query, bind);
    }
    query
}

fn apply_binds_to_query_as<M>(
    mut query: QueryAs<'_, Postgres, M, PgArguments>,
    binds: Vec<BindValue>,
) -> QueryAs<'_, Postgres, M, PgArguments> {
    for bind in binds {
        query = apply_bind_value!(query, bind);
    }
    query
}

/// 插入一条记录并返回数据库中保存的结果（包含生成的主键）
pub async fn insert<'c, M, E>(executor: E, builder: InsertBuilder<M>) -> Result<M>
where
    M: Model + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let (sql, binds) = builder.build()?;
    tracing::debug!(table = M::TABLE, sql = %sql, binds = binds.len(), "insert");

    let query = apply_binds_to_query_as(sqlx::query_as::<Postgres, M>(&sql), binds);
    Ok(query.fetch_one(executor).await?)
}

/// 根据主键查找记录
pub async fn find_by_id<'c, M, E>(executor: E, id: Id) -> Result<Option<M>>
where
    M: Model + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let (sql, binds) = QueryBuilder::new(M::select_sql()).and_eq(M::PK, id).into_parts();
    tracing::debug!(table = M::TABLE, sql = %sql, binds = binds.len(), "find_by_id");

    let query = apply_binds_to_query_as(sqlx::query_as::<Postgres, M>(&sql), binds);
    Ok(query.fetch_optional(executor).await?)
}

/// 根据查询构建器查找所有记录
///
/// 构建器的 base_sql 会被替换为模型的 `SELECT <columns> FROM <table>`，
/// 条件、排序和绑定值保留。
pub async fn find_all<'c, M, E>(executor: E, builder: QueryBuilder) -> Result<Vec<M>>
where
    M: Model + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let (sql, binds) = builder.with_base_sql(M::select_sql()).into_parts();
    tracing::debug!(table = M::TABLE, sql = %sql, binds = binds.len(), "find_all");

    let query = apply_binds_to_query_as(sqlx::query_as::<Postgres, M>(&sql), binds);
    Ok(query.fetch_all(executor).await?)
}

/// 按主键部分更新，返回更新后的记录；主键不存在时返回 `None`
pub async fn update_by_id<'c, M, E>(
    executor: E,
    builder: UpdateBuilder<M>,
    id: Id,
) -> Result<Option<M>>
where
    M: Model + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let (sql, binds) = builder.build_by_id(id)?;
    tracing::debug!(table = M::TABLE, sql = %sql, binds = binds.len(), "update_by_id");

    let query = apply_binds_to_query_as(sqlx::query_as::<Postgres, M>(&sql), binds);
    Ok(query.fetch_optional(executor).await?)
}

/// 按主键物理删除，返回是否删除了记录
pub async fn delete_by_id<'c, M, E>(executor: E, id: Id) -> Result<bool>
where
    M: Model,
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let (sql, binds) = DeleteBuilder::<M>::new().by_id(id).build()?;
    tracing::debug!(table = M::TABLE, sql = %sql, binds = binds.len(), "delete_by_id");

    let query = apply_binds_to_query(sqlx::query(&sql), binds);
    let row = query.fetch_optional(executor).await?;
    Ok(row.is_some())
}
