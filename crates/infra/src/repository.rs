//! # リポジトリ実装
//!
//! ニッチと有料購読者を PostgreSQL から読み取るリポジトリ。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: どちらのテーブルも外部システムが所有しており、このサービスは書き込まない
//! - **テスタビリティ**: トレイト経由でモック可能な設計
//! - **実行時クエリ**: 購読者テーブル名が設定値のため、`sqlx::query_as` を使う

pub mod niche_repository;
pub mod subscriber_repository;

pub use niche_repository::{NicheRepository, PostgresNicheRepository};
pub use subscriber_repository::{
    DEFAULT_SUBSCRIBERS_TABLE,
    PostgresSubscriberRepository,
    SubscriberRepository,
    TableName,
};
