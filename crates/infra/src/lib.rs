//! # Niches Hunter インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ユースケース層が依存するトレイト（リポジトリ、AI クライアント、メール送信、
//! メッセージング）と、その具体的な実装を提供する。外部システムの詳細を
//! カプセル化し、ユースケース層をインフラの変更から保護する。
//!
//! ## 遅延初期化
//!
//! 接続プールや API クライアントは最初に使われた時点で初期化する。
//! 認証情報の欠落は起動時ではなく初回使用時に設定エラーとして表面化する。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プール（遅延初期化）
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - ニッチ・購読者の読み取り
//! - [`ai`] - チャット補完 API クライアント
//! - [`email`] - メール送信（Resend / SMTP / Noop）
//! - [`messaging`] - 運用者向けメッセージ送信（Telegram）

pub mod ai;
pub mod db;
pub mod email;
pub mod error;
pub mod messaging;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
