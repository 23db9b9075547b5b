//! # Niches Hunter ドメイン層
//!
//! 有料ニュースレター生成の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **外部サービスに依存しない**: DB、AI API、メール API の詳細はインフラ層に閉じ込める
//! - **不変な読み取りモデル**: ニッチ・購読者は外部ストアが所有し、このシステムは読むだけ
//! - **派生モデルは 1 回の実行で使い捨て**: [`summary::NicheSummary`] は永続化しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! newsletter-service → infra → domain
//!                  ↘           ↗
//!                     domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（メール内の日付表示用）
//! - [`json`] - 文字列または構造化済みの JSON フィールドの解釈
//! - [`niche`] - ニッチ（市場機会分析レコード）
//! - [`notification`] - メール・メッセージ送信のモデルとエラー
//! - [`subscriber`] - 有料購読者
//! - [`summary`] - ニュースレター用サマリーとタイトル生成

pub mod clock;
pub mod json;
pub mod niche;
pub mod notification;
pub mod subscriber;
pub mod summary;
