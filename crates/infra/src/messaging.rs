//! # 運用者向けメッセージ送信
//!
//! ニュースレター生成の結果を運用者のチャットに投稿する。
//! 送信は Telegram Bot API の `sendMessage` を使用する。

use async_trait::async_trait;
use nicheshunter_domain::notification::NotificationError;
use serde::Serialize;

/// `TELEGRAM_API_BASE_URL` 未設定時のベース URL
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// メッセージ送信トレイト
#[async_trait]
pub trait Messenger: Send + Sync {
    /// プレーンテキストのメッセージを送信する
    async fn send_message(&self, text: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text:    &'a str,
}

/// Telegram Bot API クライアント
pub struct TelegramMessenger {
    bot_token: String,
    chat_id:   String,
    base_url:  String,
    client:    reqwest::Client,
}

impl TelegramMessenger {
    pub fn new(bot_token: String, chat_id: String, base_url: &str) -> Self {
        Self {
            bot_token,
            chat_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn send_message(&self, text: &str) -> Result<(), NotificationError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            // reqwest のエラー文字列は URL（トークン入り）を含むため除去する
            .map_err(|e| NotificationError::SendFailed(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::SendFailed(format!(
            "Telegram が {status} を返しました: {body}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_チャットにテキストを投稿する() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": "42",
                "text": "⚠️ Paid Newsletter skipped: No niches available"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;
        let sut = TelegramMessenger::new("123:abc".to_string(), "42".to_string(), &server.url());

        let result = sut
            .send_message("⚠️ Paid Newsletter skipped: No niches available")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_エラーステータスはsend_failedを返す() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(400)
            .with_body(r#"{"ok": false, "description": "chat not found"}"#)
            .create_async()
            .await;
        let sut = TelegramMessenger::new("123:abc".to_string(), "42".to_string(), &server.url());

        let result = sut.send_message("hello").await;

        assert!(matches!(
            result,
            Err(NotificationError::SendFailed(msg)) if msg.contains("chat not found")
        ));
    }
}
