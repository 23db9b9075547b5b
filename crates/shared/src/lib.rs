//! # Niches Hunter 共有ユーティリティ
//!
//! ニュースレターサービスとプレビューツールで共通して使うユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - トレーシング初期化は `observability` feature の背後に置き、
//!   ライブラリとして使う側に subscriber の依存を強制しない

pub mod event_log;
pub mod health;
pub mod observability;

pub use health::HealthResponse;
