//! # ニュースレター生成エラー
//!
//! 1 回の生成実行を中断させるエラーを定義する。
//!
//! AI 要約の失敗・個別のメール送信失敗・運用者通知の失敗はここに含まれない。
//! それぞれサマリー生成・バッチ送信・通知の内部で吸収される。

use nicheshunter_infra::{InfraError, InfraErrorKind};
use thiserror::Error;

/// ニュースレター生成を中断させるエラー
#[derive(Debug, Error)]
pub enum NewsletterError {
    /// 必要な設定・認証情報が存在しない
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// データストアへのアクセスに失敗
    #[error("データアクセスエラー: {0}")]
    DataAccess(InfraError),

    /// メール本文の生成に失敗
    #[error("HTML の生成に失敗: {0}")]
    Render(String),
}

impl NewsletterError {
    /// ログの `error.kind` に出力する種別
    pub fn kind(&self) -> &'static str {
        use nicheshunter_shared::event_log::error::kind;

        match self {
            Self::Configuration(_) => kind::CONFIGURATION,
            Self::DataAccess(_) => kind::DATABASE,
            Self::Render(_) => kind::RENDER,
        }
    }
}

impl From<InfraError> for NewsletterError {
    fn from(err: InfraError) -> Self {
        match err.kind() {
            InfraErrorKind::Configuration(msg) => Self::Configuration(msg.clone()),
            _ => Self::DataAccess(err),
        }
    }
}

impl From<tera::Error> for NewsletterError {
    fn from(err: tera::Error) -> Self {
        // tera のエラーは原因を source に持つため連結して残す
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Render(message)
    }
}
