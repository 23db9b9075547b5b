//! # ユースケース層
//!
//! ニュースレター生成のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・外部 API クライアントを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: HTTP ハンドラとスケジューラは [`NewsletterPipeline::run`] を呼ぶだけ
//!
//! ## モジュール構成
//!
//! - `summary`: ニッチごとの AI 要約（失敗時は生データにフォールバック）
//! - `renderer`: メール HTML の生成
//! - `mailer`: レート制限付きの逐次バッチ送信
//! - `notifier`: 運用者への結果通知
//! - `pipeline`: 上記を順に実行するオーケストレーター

pub mod mailer;
pub mod notifier;
pub mod pipeline;
pub mod renderer;
pub mod summary;

pub use mailer::BatchMailer;
pub use notifier::Notifier;
pub use pipeline::{NewsletterPipeline, RunOutcome};
pub use renderer::NewsletterRenderer;
pub use summary::SummaryGenerator;
