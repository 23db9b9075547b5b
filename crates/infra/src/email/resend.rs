//! Resend メール送信実装
//!
//! Resend の `POST {base_url}/emails` を使用してメールを送信する。
//! 本番環境で使用する。Resend のレート制限は 2 req/s。

use async_trait::async_trait;
use nicheshunter_domain::notification::{DeliveryError, EmailMessage};
use serde::Serialize;

use super::EmailSender;

/// `RESEND_BASE_URL` 未設定時のベース URL
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      [&'a str; 1],
    subject: &'a str,
    html:    &'a str,
}

/// Resend メール送信
///
/// API キーは送信時に検査する。キーがない場合はリクエストを送らず
/// [`DeliveryError::NotConfigured`] を返す。
pub struct ResendEmailSender {
    api_key:      Option<String>,
    base_url:     String,
    from_address: String,
    client:       reqwest::Client,
}

impl ResendEmailSender {
    /// # 引数
    ///
    /// - `api_key`: Resend の API キー
    /// - `base_url`: API のベース URL（例: `https://api.resend.com`）
    /// - `from_address`: 送信元メールアドレス（Resend で検証済みのドメイン）
    pub fn new(api_key: Option<String>, base_url: &str, from_address: String) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            from_address,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    #[tracing::instrument(skip_all, fields(to = %email.to), level = "debug")]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DeliveryError::NotConfigured("RESEND_API_KEY".to_string()))?;

        let request = SendEmailRequest {
            from:    &self.from_address,
            to:      [&email.to],
            subject: &email.subject,
            html:    &email.html_body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::SendFailed(format!("Resend への接続失敗: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::SendFailed(format!(
            "Resend が {status} を返しました: {body}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to:        "reader@example.com".to_string(),
            subject:   "🎯 🚀 Pet Care".to_string(),
            html_body: "<p>newsletter</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_宛先ごとにemails_apiを呼び出す() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::Json(json!({
                "from": "support@arianeconcept.fr",
                "to": ["reader@example.com"],
                "subject": "🎯 🚀 Pet Care",
                "html": "<p>newsletter</p>"
            })))
            .with_status(200)
            .with_body(r#"{"id": "email_123"}"#)
            .create_async()
            .await;
        let sut = ResendEmailSender::new(
            Some("re_test".to_string()),
            &server.url(),
            "support@arianeconcept.fr".to_string(),
        );

        let result = sut.send_email(&message()).await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_keyがなければnot_configuredを返す() {
        let sut = ResendEmailSender::new(
            None,
            DEFAULT_RESEND_BASE_URL,
            "support@arianeconcept.fr".to_string(),
        );

        let result = sut.send_email(&message()).await;

        assert!(matches!(result, Err(DeliveryError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_エラーステータスはsend_failedを返す() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(r#"{"message": "Invalid `to` field"}"#)
            .create_async()
            .await;
        let sut = ResendEmailSender::new(
            Some("re_test".to_string()),
            &server.url(),
            "support@arianeconcept.fr".to_string(),
        );

        let result = sut.send_email(&message()).await;

        assert!(matches!(result, Err(DeliveryError::SendFailed(msg)) if msg.contains("422")));
    }
}
