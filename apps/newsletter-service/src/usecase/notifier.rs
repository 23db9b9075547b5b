//! # 運用者通知
//!
//! 生成結果（送信・スキップ・失敗）を運用者のチャットに投稿する。
//!
//! 通知は付随的な処理であり、失敗しても生成実行の結果は変わらない。
//! メッセンジャーが未設定の場合は何もしない。

use std::sync::Arc;

use nicheshunter_infra::messaging::Messenger;
use nicheshunter_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};

/// 運用者通知
pub struct Notifier {
    messenger: Option<Arc<dyn Messenger>>,
}

impl Notifier {
    pub fn new(messenger: Option<Arc<dyn Messenger>>) -> Self {
        Self { messenger }
    }

    /// 通知しない Notifier
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// メッセージを送信する
    ///
    /// 送信失敗はログに残すだけで呼び出し元には返さない。
    pub async fn notify(&self, text: &str) {
        let Some(messenger) = &self.messenger else {
            tracing::debug!("通知先が未設定のため運用者通知をスキップします");
            return;
        };

        match messenger.send_message(text).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    "運用者通知を送信しました"
                );
            }
            Err(e) => {
                tracing::warn!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = kind::MESSAGING,
                    error = %e,
                    "運用者通知の送信に失敗しました"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nicheshunter_infra::mock::MockMessenger;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_メッセンジャーに本文を送る() {
        let messenger = MockMessenger::new();
        let sut = Notifier::new(Some(Arc::new(messenger.clone())));

        sut.notify("📰 Paid Newsletter Sent!").await;

        assert_eq!(messenger.messages(), vec!["📰 Paid Newsletter Sent!"]);
    }

    #[tokio::test]
    async fn test_送信失敗でもパニックしない() {
        let messenger = MockMessenger::new();
        messenger.fail_all();
        let sut = Notifier::new(Some(Arc::new(messenger.clone())));

        sut.notify("hello").await;

        assert_eq!(messenger.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_未設定なら何もしない() {
        Notifier::disabled().notify("hello").await;
    }
}
