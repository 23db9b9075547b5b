//! # 依存関係の組み立て
//!
//! 設定からインフラ実装を選び、パイプラインに注入する。
//! サーバーとプレビューツールの双方から使う。
//!
//! ここで作るハンドルはどれも接続を開かない。DB 接続と認証情報の検証は初回使用時に行う。

use std::sync::Arc;

use nicheshunter_domain::clock::SystemClock;
use nicheshunter_infra::{
    ai::{ChatCompletionClient, OpenAiClient},
    db::LazyPgPool,
    email::{EmailSender, NoopEmailSender, ResendEmailSender, SmtpEmailSender},
    messaging::{Messenger, TelegramMessenger},
    repository::{PostgresNicheRepository, PostgresSubscriberRepository},
};

use crate::{
    config::{EmailBackend, NewsletterConfig},
    error::NewsletterError,
    usecase::{BatchMailer, NewsletterPipeline, NewsletterRenderer, Notifier, SummaryGenerator},
};

/// 設定からパイプラインを組み立てる
pub fn build_pipeline(config: &NewsletterConfig) -> Result<NewsletterPipeline, NewsletterError> {
    let pool = Arc::new(LazyPgPool::new(config.database_url.clone()));

    Ok(NewsletterPipeline::new(
        Arc::new(PostgresNicheRepository::new(Arc::clone(&pool))),
        Arc::new(PostgresSubscriberRepository::new(
            pool,
            config.subscribers_table.clone(),
        )),
        SummaryGenerator::new(chat_client(config)),
        renderer(config)?,
        BatchMailer::new(email_sender(config), config.email.send_delay),
        Notifier::new(messenger(config)),
        config.niche_limit,
    ))
}

/// AI 要約クライアント
pub fn chat_client(config: &NewsletterConfig) -> Arc<dyn ChatCompletionClient> {
    let client = OpenAiClient::new(
        config.openai.api_key.clone(),
        &config.openai.model,
        &config.openai.base_url,
    );
    if !client.is_configured() {
        tracing::warn!("OPENAI_API_KEY が未設定のため、サマリーは生データから作成されます");
    }
    Arc::new(client)
}

/// HTML レンダラー（本文の日付はシステム時刻）
pub fn renderer(config: &NewsletterConfig) -> Result<NewsletterRenderer, NewsletterError> {
    NewsletterRenderer::new(&config.site_url, Arc::new(SystemClock))
}

/// `EMAIL_BACKEND` に応じたメール送信実装
pub fn email_sender(config: &NewsletterConfig) -> Arc<dyn EmailSender> {
    let email = &config.email;
    tracing::info!(backend = %email.backend, "メール送信バックエンドを選択しました");

    match email.backend {
        EmailBackend::Resend => Arc::new(ResendEmailSender::new(
            email.resend_api_key.clone(),
            &email.resend_base_url,
            email.from_address.clone(),
        )),
        EmailBackend::Smtp => Arc::new(SmtpEmailSender::new(
            &email.smtp_host,
            email.smtp_port,
            email.from_address.clone(),
        )),
        EmailBackend::Noop => Arc::new(NoopEmailSender),
    }
}

/// 運用者通知の送信先
///
/// ボットトークンとチャット ID の両方が揃っている場合のみ作る。
pub fn messenger(config: &NewsletterConfig) -> Option<Arc<dyn Messenger>> {
    let telegram = &config.telegram;
    match (&telegram.bot_token, &telegram.chat_id) {
        (Some(token), Some(chat_id)) => Some(Arc::new(TelegramMessenger::new(
            token.clone(),
            chat_id.clone(),
            &telegram.api_base_url,
        ))),
        _ => {
            tracing::warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID が未設定のため運用者通知は行いません");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> NewsletterConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NewsletterConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn test_トークンとチャットidが揃えば通知先を作る() {
        let config = config(&[("TELEGRAM_BOT_TOKEN", "123:abc"), ("TELEGRAM_CHAT_ID", "42")]);

        assert!(messenger(&config).is_some());
    }

    #[test]
    fn test_チャットidがなければ通知しない() {
        let config = config(&[("TELEGRAM_BOT_TOKEN", "123:abc")]);

        assert!(messenger(&config).is_none());
    }

    #[tokio::test]
    async fn test_認証情報がなくてもパイプラインを組み立てられる() {
        let config = config(&[]);

        assert!(build_pipeline(&config).is_ok());
    }
}
