//! 职位（jobs 表）的数据访问

use crate::builder::{BindValue, ColumnMap, InsertBuilder, QueryBuilder, UpdateBuilder, UpdateFields};
use crate::crud;
use crate::error::{JoblyError, Result};
use crate::traits::{Id, Model};
use bigdecimal::BigDecimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::Postgres;
use std::str::FromStr;

/// 职位记录
///
/// `equity` 以数据库中保存的十进制文本返回（`equity::text`），不做精度换算。
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Id,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    #[sqlx(rename = "companyHandle")]
    pub company_handle: String,
}

impl Model for Job {
    const TABLE: &'static str = "jobs";
    const PK: &'static str = "id";
    const SELECT_COLUMNS: &'static str =
        r#"id, title, salary, equity::text AS equity, company_handle AS "companyHandle""#;
}

/// 新建职位的请求数据
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_equity")]
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        if let Some(salary) = self.salary {
            validate_salary(salary)?;
        }
        if let Some(equity) = &self.equity {
            validate_equity(equity)?;
        }
        if self.company_handle.trim().is_empty() {
            return Err(JoblyError::InvalidInput(
                "companyHandle must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 职位的部分更新
///
/// 外层 `None` 表示字段未提供；可空列使用 `Some(None)` 表示置为 NULL。
/// `id`、`companyHandle` 等不可变字段出现在请求中时反序列化失败。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some_equity")]
    pub equity: Option<Option<BigDecimal>>,
}

/// 区分“字段缺失”和“显式 null”
fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// equity 只接受十进制字符串，JSON 数字会经过 f64 丢失精度，直接拒绝
fn deserialize_equity<'de, D>(deserializer: D) -> std::result::Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) => BigDecimal::from_str(text.trim())
            .map(Some)
            .map_err(|_| D::Error::custom(format!("equity must be a decimal string, got '{}'", text))),
    }
}

fn deserialize_some_equity<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<BigDecimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_equity(deserializer).map(Some)
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.salary.is_none() && self.equity.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(Some(salary)) = self.salary {
            validate_salary(salary)?;
        }
        if let Some(Some(equity)) = &self.equity {
            validate_equity(equity)?;
        }
        Ok(())
    }
}

impl UpdateFields for JobUpdate {
    const COLUMNS: ColumnMap =
        ColumnMap::new(&[("title", "title"), ("salary", "salary"), ("equity", "equity")]);

    const ALLOWED: &'static [&'static str] = &["title", "salary", "equity"];

    fn changed_fields(&self) -> Vec<(&'static str, BindValue)> {
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(("title", BindValue::from(title.clone())));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", BindValue::from(salary)));
        }
        if let Some(equity) = &self.equity {
            fields.push(("equity", BindValue::from(equity.clone())));
        }
        fields
    }
}

/// 职位列表的过滤条件
///
/// `has_equity` 只有为 `Some(true)` 时才生效，`Some(false)` 与缺省相同。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn validate(&self) -> Result<()> {
        if let Some(min_salary) = self.min_salary {
            if min_salary < 0 {
                return Err(JoblyError::InvalidInput(
                    "minSalary must be non-negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// 按 title、minSalary、hasEquity 的顺序追加条件，占位符编号随绑定值递增
    pub fn apply(&self, builder: QueryBuilder) -> QueryBuilder {
        let mut builder = builder;
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.and_ilike("title", title);
        }
        if let Some(min_salary) = self.min_salary {
            builder = builder.and_ge("salary", min_salary);
        }
        if self.has_equity == Some(true) {
            builder = builder.and_positive("equity");
        }
        builder
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(JoblyError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_salary(salary: i32) -> Result<()> {
    if salary < 0 {
        return Err(JoblyError::InvalidInput("salary must be non-negative".to_string()));
    }
    Ok(())
}

fn validate_equity(equity: &BigDecimal) -> Result<()> {
    if *equity < BigDecimal::from(0) || *equity > BigDecimal::from(1) {
        return Err(JoblyError::InvalidInput(format!(
            "equity must be between 0 and 1, got {}",
            equity
        )));
    }
    Ok(())
}

impl Job {
    /// 新建职位，返回包含生成 id 的记录
    pub async fn create<'c, E>(executor: E, data: &NewJob) -> Result<Job>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        data.validate()?;
        let builder = InsertBuilder::<Job>::new()
            .value("title", data.title.clone())
            .value("salary", data.salary)
            .value("equity", data.equity.clone())
            .value("company_handle", data.company_handle.clone());
        crud::insert(executor, builder).await
    }

    /// 按过滤条件列出职位，按 id 升序
    pub async fn find_all<'c, E>(executor: E, filters: Option<&JobFilter>) -> Result<Vec<Job>>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        let mut builder = QueryBuilder::new(Job::select_sql());
        if let Some(filters) = filters {
            filters.validate()?;
            builder = filters.apply(builder);
        }
        crud::find_all::<Job, _>(executor, builder.order_by(Job::PK, true)).await
    }

    pub async fn get<'c, E>(executor: E, id: Id) -> Result<Job>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        crud::find_by_id::<Job, _>(executor, id)
            .await?
            .ok_or_else(|| JoblyError::NotFound(format!("No job: {}", id)))
    }

    /// 部分更新：只修改 `data` 中提供的字段，companyHandle 永不修改
    pub async fn update<'c, E>(executor: E, id: Id, data: &JobUpdate) -> Result<Job>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        data.validate()?;
        let builder = UpdateBuilder::<Job>::from_patch(data);
        crud::update_by_id::<Job, _>(executor, builder, id)
            .await?
            .ok_or_else(|| JoblyError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove<'c, E>(executor: E, id: Id) -> Result<()>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        if crud::delete_by_id::<Job, _>(executor, id).await? {
            Ok(())
        } else {
            Err(JoblyError::NotFound(format!("No job: {}", id)))
        }
    }
}
