//! # NicheRepository
//!
//! 最新のニッチを取得するリポジトリ。
//!
//! `stats` / `market_analysis` / `trending` は `to_jsonb()` で読み出す。
//! text カラムなら JSON 文字列、jsonb カラムなら構造化済みの値として届き、
//! どちらもドメイン層の `decode_or_default` で同じ型に解釈できる。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nicheshunter_domain::niche::{Niche, Score};
use serde_json::Value;

use crate::{db::LazyPgPool, error::InfraError};

/// ニッチリポジトリトレイト
#[async_trait]
pub trait NicheRepository: Send + Sync {
    /// 作成日時の新しい順に最大 `limit` 件を取得する
    ///
    /// 0 件は正常な結果として空の Vec を返す。
    async fn find_latest(&self, limit: u32) -> Result<Vec<Niche>, InfraError>;
}

/// `niches` テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct NicheRow {
    id:               String,
    title:            String,
    category:         String,
    tags:             Vec<String>,
    score:            f64,
    opportunity:      String,
    gap:              String,
    recommended_move: String,
    stats:            Option<Value>,
    market_analysis:  Option<Value>,
    key_learnings:    Vec<String>,
    trending:         Option<Value>,
    display_code:     String,
    created_at:       DateTime<Utc>,
}

impl From<NicheRow> for Niche {
    fn from(row: NicheRow) -> Self {
        Self {
            id:               row.id,
            title:            row.title,
            category:         row.category,
            tags:             row.tags,
            score:            Score::new(row.score),
            opportunity:      row.opportunity,
            gap:              row.gap,
            recommended_move: row.recommended_move,
            stats:            row.stats,
            market_analysis:  row.market_analysis,
            key_learnings:    row.key_learnings,
            trending:         row.trending,
            display_code:     row.display_code,
            created_at:       row.created_at,
        }
    }
}

const FIND_LATEST_SQL: &str = r#"
    SELECT
        id::text                                AS id,
        COALESCE(title, '')                     AS title,
        COALESCE(category, '')                  AS category,
        COALESCE(tags, '{}')                    AS tags,
        COALESCE(score, 0)::float8              AS score,
        COALESCE(opportunity, '')               AS opportunity,
        COALESCE(gap, '')                       AS gap,
        COALESCE("move", '')                    AS recommended_move,
        to_jsonb(stats)                         AS stats,
        to_jsonb(market_analysis)               AS market_analysis,
        COALESCE(key_learnings, '{}')           AS key_learnings,
        to_jsonb(trending)                      AS trending,
        COALESCE(display_code, '')              AS display_code,
        created_at
    FROM niches
    ORDER BY created_at DESC
    LIMIT $1
"#;

/// PostgreSQL 実装の NicheRepository
pub struct PostgresNicheRepository {
    pool: Arc<LazyPgPool>,
}

impl PostgresNicheRepository {
    pub fn new(pool: Arc<LazyPgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NicheRepository for PostgresNicheRepository {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_latest(&self, limit: u32) -> Result<Vec<Niche>, InfraError> {
        let pool = self.pool.get().await?;

        let rows = sqlx::query_as::<_, NicheRow>(FIND_LATEST_SQL)
            .bind(i64::from(limit))
            .fetch_all(pool)
            .await?;

        tracing::debug!(count = rows.len(), "ニッチを取得しました");
        Ok(rows.into_iter().map(Niche::from).collect())
    }
}
