//! Noop メール送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! `EMAIL_BACKEND=noop` でのドライランに使用する。

use async_trait::async_trait;
use nicheshunter_domain::notification::{DeliveryError, EmailMessage};

use super::EmailSender;

/// Noop メール送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            html_len = email.html_body.len(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
