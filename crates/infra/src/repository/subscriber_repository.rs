//! # SubscriberRepository
//!
//! 有効な有料購読者を取得するリポジトリ。
//!
//! 読み取るテーブルは運用設定（`SUBSCRIBERS_TABLE`）で切り替える。
//! テーブル名は SQL に埋め込むため、[`TableName`] で識別子として検証してから使う。

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use nicheshunter_domain::subscriber::Subscriber;

use crate::{db::LazyPgPool, error::InfraError};

/// `SUBSCRIBERS_TABLE` 未設定時のテーブル名
pub const DEFAULT_SUBSCRIBERS_TABLE: &str = "paid_newsletter_subscribers_test";

/// PostgreSQL の識別子の最大長
const MAX_IDENTIFIER_LEN: usize = 63;

/// 検証済みのテーブル名
///
/// `[A-Za-z_][A-Za-z0-9_]*` かつ 63 文字以内のものだけを受け付ける。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self, InfraError> {
        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid_head && valid_tail && name.len() <= MAX_IDENTIFIER_LEN {
            Ok(Self(name.to_string()))
        } else {
            Err(InfraError::configuration(format!(
                "SUBSCRIBERS_TABLE に不正なテーブル名が指定されています: {name:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 購読者リポジトリトレイト
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// `is_active = true` の購読者を取得する
    async fn find_active(&self) -> Result<Vec<Subscriber>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriberRow {
    id:          String,
    email:       String,
    customer_id: Option<String>,
    is_active:   bool,
    plan_type:   Option<String>,
}

impl From<SubscriberRow> for Subscriber {
    fn from(row: SubscriberRow) -> Self {
        Self {
            id:          row.id,
            email:       row.email,
            customer_id: row.customer_id,
            is_active:   row.is_active,
            plan_type:   row.plan_type,
        }
    }
}

/// PostgreSQL 実装の SubscriberRepository
pub struct PostgresSubscriberRepository {
    pool:  Arc<LazyPgPool>,
    table: TableName,
}

impl PostgresSubscriberRepository {
    pub fn new(pool: Arc<LazyPgPool>, table: TableName) -> Self {
        Self { pool, table }
    }

    fn find_active_sql(&self) -> String {
        format!(
            r#"
            SELECT
                id::text                AS id,
                COALESCE(email, '')     AS email,
                customer_id,
                is_active,
                plan_type
            FROM "{}"
            WHERE is_active = true
            "#,
            self.table
        )
    }
}

#[async_trait]
impl SubscriberRepository for PostgresSubscriberRepository {
    #[tracing::instrument(skip(self), fields(table = %self.table), level = "debug")]
    async fn find_active(&self) -> Result<Vec<Subscriber>, InfraError> {
        let pool = self.pool.get().await?;

        let sql = self.find_active_sql();
        let rows = sqlx::query_as::<_, SubscriberRow>(&sql)
            .fetch_all(pool)
            .await?;

        tracing::debug!(count = rows.len(), "有効な購読者を取得しました");
        Ok(rows.into_iter().map(Subscriber::from).collect())
    }
}
