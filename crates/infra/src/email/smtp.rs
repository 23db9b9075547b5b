//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Message, header::ContentType},
};
use nicheshunter_domain::notification::{DeliveryError, EmailMessage};

use super::EmailSender;

/// SMTP メール送信
pub struct SmtpEmailSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpEmailSender {
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: 送信元メールアドレス
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        // TLS なし（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, DeliveryError> {
        // 送信元アドレスの不正は全宛先で失敗するため設定エラー扱い
        let from = self
            .from_address
            .parse()
            .map_err(|e| DeliveryError::NotConfigured(format!("EMAIL_FROM が不正: {e}")))?;
        let to = email
            .to
            .parse()
            .map_err(|e| DeliveryError::SendFailed(format!("宛先アドレス不正: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| DeliveryError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[tracing::instrument(skip_all, fields(to = %email.to), level = "debug")]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
