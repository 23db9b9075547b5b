//! # バッチメール送信
//!
//! 同じ本文を宛先ごとに 1 通ずつ、一定の間隔を空けて送信する。
//!
//! 個別の送信失敗は件数に数えて次の宛先へ進む。
//! 認証情報の欠落はどの宛先でも同じ結果になるため、その時点でバッチ全体を中断する。

use std::{sync::Arc, time::Duration};

use nicheshunter_domain::notification::{BatchSendResult, DeliveryError, EmailMessage};
use nicheshunter_infra::email::EmailSender;
use nicheshunter_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};

use crate::error::NewsletterError;

/// レート制限付きの逐次メール送信
pub struct BatchMailer {
    sender: Arc<dyn EmailSender>,
    delay:  Duration,
}

impl BatchMailer {
    pub fn new(sender: Arc<dyn EmailSender>, delay: Duration) -> Self {
        Self { sender, delay }
    }

    /// 全宛先に送信する
    ///
    /// 送信は宛先の順に 1 通ずつ行い、最後の 1 通を除く各送信の後に待機する。
    /// 戻り値の `success + failed` は宛先数に一致する。
    #[tracing::instrument(skip_all, fields(recipients = recipients.len()))]
    pub async fn send(
        &self,
        recipients: &[String],
        html: &str,
        subject: &str,
    ) -> Result<BatchSendResult, NewsletterError> {
        let total = recipients.len();
        let mut result = BatchSendResult::default();

        for (i, to) in recipients.iter().enumerate() {
            let position = format!("{}/{total}", i + 1);
            let message = EmailMessage {
                to:        to.clone(),
                subject:   subject.to_string(),
                html_body: html.to_string(),
            };

            match self.sender.send_email(&message).await {
                Ok(()) => {
                    result.success += 1;
                    log_business_event!(
                        event.category = event::category::EMAIL,
                        event.action = event::action::EMAIL_SENT,
                        event.result = event::result::SUCCESS,
                        email.recipient = %to,
                        email.position = %position,
                        "メール送信成功"
                    );
                }
                Err(DeliveryError::NotConfigured(key)) => {
                    tracing::error!(
                        error.category = category::EXTERNAL_SERVICE,
                        error.kind = kind::CONFIGURATION,
                        missing = %key,
                        "メール送信の認証情報がないためバッチ送信を中断します"
                    );
                    return Err(NewsletterError::Configuration(format!(
                        "{key} が設定されていません"
                    )));
                }
                Err(e) => {
                    result.failed += 1;
                    log_business_event!(
                        event.category = event::category::EMAIL,
                        event.action = event::action::EMAIL_FAILED,
                        event.result = event::result::FAILURE,
                        email.recipient = %to,
                        email.position = %position,
                        error = %e,
                        "メール送信失敗"
                    );
                }
            }

            if i + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use nicheshunter_infra::mock::MockEmailSender;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    fn recipients(emails: &[&str]) -> Vec<String> {
        emails.iter().map(|e| e.to_string()).collect()
    }

    #[tokio::test]
    async fn test_全宛先に同じ本文を送る() {
        let sender = MockEmailSender::new();
        let sut = BatchMailer::new(Arc::new(sender.clone()), Duration::ZERO);

        let result = sut
            .send(&recipients(&["a@example.com", "b@example.com"]), "<p>hi</p>", "🎯 A")
            .await
            .unwrap();

        assert_eq!(result, BatchSendResult { success: 2, failed: 0 });
        let sent = sender.sent_emails();
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[1].to, "b@example.com");
        assert!(sent.iter().all(|m| m.subject == "🎯 A" && m.html_body == "<p>hi</p>"));
    }

    #[tokio::test]
    async fn test_送信失敗は数えて次の宛先へ進む() {
        let sender = MockEmailSender::new();
        sender.fail_for("b@example.com");
        let sut = BatchMailer::new(Arc::new(sender.clone()), Duration::ZERO);

        let result = sut
            .send(
                &recipients(&["a@example.com", "b@example.com", "c@example.com"]),
                "<p>hi</p>",
                "subject",
            )
            .await
            .unwrap();

        assert_eq!(result, BatchSendResult { success: 2, failed: 1 });
        assert_eq!(result.total(), 3);
        assert_eq!(sender.sent_emails().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_送信失敗を挟んでも送信の間に待機する() {
        let sender = MockEmailSender::new();
        sender.fail_for("b@example.com");
        let sut = BatchMailer::new(Arc::new(sender), Duration::from_millis(600));
        let started = Instant::now();

        let result = sut
            .send(
                &recipients(&["a@example.com", "b@example.com", "c@example.com"]),
                "<p>hi</p>",
                "subject",
            )
            .await
            .unwrap();

        // 最後の 1 通の後には待たない
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1200));
        assert!(elapsed < Duration::from_millis(1800));
        assert_eq!(result, BatchSendResult { success: 2, failed: 1 });
        assert_eq!(result.total(), 3);
    }

    #[tokio::test]
    async fn test_認証情報がなければバッチを中断する() {
        let sender = MockEmailSender::new();
        sender.without_credentials();
        let sut = BatchMailer::new(Arc::new(sender), Duration::ZERO);

        let err = sut
            .send(&recipients(&["a@example.com"]), "<p>hi</p>", "subject")
            .await
            .unwrap_err();

        assert!(matches!(err, NewsletterError::Configuration(msg) if msg.contains("RESEND_API_KEY")));
    }

    #[tokio::test]
    async fn test_宛先がなければ何も送らない() {
        let sender = MockEmailSender::new();
        let sut = BatchMailer::new(Arc::new(sender.clone()), Duration::from_millis(600));

        let result = sut.send(&[], "<p>hi</p>", "subject").await.unwrap();

        assert_eq!(result, BatchSendResult::default());
        assert!(sender.sent_emails().is_empty());
    }
}
