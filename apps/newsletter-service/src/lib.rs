//! # ニュースレターサービス ライブラリ
//!
//! ニュースレター生成パイプラインと HTTP ハンドラを公開する。
//! バイナリ（サーバー・プレビューツール）と統合テストから利用する。

pub mod config;
pub mod error;
pub mod handler;
pub mod scheduler;
pub mod usecase;
pub mod wiring;
