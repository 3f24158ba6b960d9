pub mod builder;
pub mod crud;
pub mod db_pool;
pub mod error;
pub mod models;
pub mod traits;
pub mod utils;

pub use builder::{
    build_set_clause, BindValue, ColumnMap, DeleteBuilder, InsertBuilder, QueryBuilder, SetClause,
    UpdateBuilder, UpdateFields,
};
pub use db_pool::{DbPool, PoolConfig};
pub use error::{JoblyError, Result};
pub use models::{Job, JobFilter, JobUpdate, NewJob};
pub use traits::{Id, Model};

/// 建表语句（companies、jobs）
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");
