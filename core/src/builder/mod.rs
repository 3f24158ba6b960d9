//! CRUD Builder 模块
//!
//! 提供 UpdateBuilder、InsertBuilder、DeleteBuilder 和 QueryBuilder，生成带位置参数的 PostgreSQL 语句

pub mod delete_builder;
pub mod insert_builder;
pub mod query_builder;
pub mod update_builder;

pub use delete_builder::DeleteBuilder;
pub use insert_builder::InsertBuilder;
pub use query_builder::{BindValue, NullKind, QueryBuilder};
pub use update_builder::{build_set_clause, ColumnMap, SetClause, UpdateBuilder, UpdateFields};
