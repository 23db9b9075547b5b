//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成と、初回使用時まで接続を遅らせる [`LazyPgPool`] を提供する。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use nicheshunter_infra::db::LazyPgPool;
//!
//! let pool = LazyPgPool::new(std::env::var("DATABASE_URL").ok());
//! // DATABASE_URL がなければここで設定エラーになる
//! let pg = pool.get().await?;
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::OnceCell;

use crate::error::InfraError;

/// PostgreSQL 接続プールを作成する
///
/// - `max_connections(5)`: 1 日 1 回のバッチ処理なので少数で足りる
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// 初回使用時に接続する PostgreSQL 接続プール
///
/// 接続に成功したプールはプロセス終了までキャッシュする。
/// 接続に失敗した場合はキャッシュせず、次の呼び出しで再度接続を試みる。
pub struct LazyPgPool {
    database_url: Option<String>,
    pool:         OnceCell<PgPool>,
}

impl LazyPgPool {
    /// 接続 URL を保持するだけで、この時点では接続しない
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url: database_url.filter(|url| !url.trim().is_empty()),
            pool:         OnceCell::new(),
        }
    }

    /// 接続済みのプールから作成する（テスト用）
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            database_url: None,
            pool:         OnceCell::new_with(Some(pool)),
        }
    }

    /// 接続プールを取得する
    ///
    /// 接続 URL がない場合は設定エラー、接続に失敗した場合はデータベースエラー。
    pub async fn get(&self) -> Result<&PgPool, InfraError> {
        self.pool
            .get_or_try_init(|| async {
                let url = self
                    .database_url
                    .as_deref()
                    .ok_or_else(|| InfraError::configuration("DATABASE_URL が設定されていません"))?;
                tracing::debug!("データベースに接続します");
                Ok(create_pool(url).await?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_lazy_pg_poolはsendとsyncを実装している() {
        assert_send_sync::<LazyPgPool>();
    }

    #[tokio::test]
    async fn test_urlがなければ設定エラーを返す() {
        let sut = LazyPgPool::new(None);

        let err = sut.get().await.unwrap_err();

        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_空白のurlは未設定として扱う() {
        let sut = LazyPgPool::new(Some("  ".to_string()));

        let err = sut.get().await.unwrap_err();

        assert!(err.is_configuration());
    }
}
