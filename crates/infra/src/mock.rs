//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! nicheshunter-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use nicheshunter_domain::{
    niche::Niche,
    notification::{DeliveryError, EmailMessage, NotificationError},
    subscriber::Subscriber,
    summary::GenerationError,
};

use crate::{
    ai::ChatCompletionClient,
    email::EmailSender,
    error::InfraError,
    messaging::Messenger,
    repository::{NicheRepository, SubscriberRepository},
};

// ===== MockNicheRepository =====

#[derive(Clone, Default)]
pub struct MockNicheRepository {
    niches:  Arc<Mutex<Vec<Niche>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockNicheRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// ニッチを追加する（作成日時の新しい順に並べて渡すこと）
    pub fn add_niche(&self, niche: Niche) {
        self.niches.lock().unwrap().push(niche);
    }

    /// 以降の呼び出しをデータベースエラーとして失敗させる
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl NicheRepository for MockNicheRepository {
    async fn find_latest(&self, limit: u32) -> Result<Vec<Niche>, InfraError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(sqlx::Error::Protocol(message).into());
        }
        Ok(self
            .niches
            .lock()
            .unwrap()
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ===== MockSubscriberRepository =====

#[derive(Clone, Default)]
pub struct MockSubscriberRepository {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl MockSubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscriber(&self, subscriber: Subscriber) {
        self.subscribers.lock().unwrap().push(subscriber);
    }

    /// メールアドレスだけ指定して有効な購読者を追加する
    pub fn add_email(&self, email: &str) {
        self.add_subscriber(Subscriber {
            id:          format!("sub-{email}"),
            email:       email.to_string(),
            customer_id: None,
            is_active:   true,
            plan_type:   Some("monthly".to_string()),
        });
    }
}

#[async_trait]
impl SubscriberRepository for MockSubscriberRepository {
    async fn find_active(&self) -> Result<Vec<Subscriber>, InfraError> {
        Ok(self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }
}

// ===== MockChatCompletionClient =====

/// 用意した応答を順に返すチャット補完クライアント
///
/// 応答が尽きたら [`GenerationError::RequestFailed`] を返す。
#[derive(Clone, Default)]
pub struct MockChatCompletionClient {
    replies:  Arc<Mutex<Vec<Result<String, GenerationError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockChatCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: GenerationError) {
        self.replies.lock().unwrap().push(Err(error));
    }

    /// 受け取ったユーザープロンプト
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionClient for MockChatCompletionClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(user.to_string());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(GenerationError::RequestFailed("応答が用意されていません".to_string()));
        }
        replies.remove(0)
    }
}

// ===== MockEmailSender =====

/// 送信内容を記録するメール送信
///
/// [`fail_for`](MockEmailSender::fail_for) で指定した宛先は送信失敗になる。
#[derive(Clone, Default)]
pub struct MockEmailSender {
    sent:           Arc<Mutex<Vec<EmailMessage>>>,
    failing:        Arc<Mutex<HashSet<String>>>,
    not_configured: Arc<Mutex<bool>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_string());
    }

    /// 認証情報がない状態を再現する
    pub fn without_credentials(&self) {
        *self.not_configured.lock().unwrap() = true;
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        if *self.not_configured.lock().unwrap() {
            return Err(DeliveryError::NotConfigured("RESEND_API_KEY".to_string()));
        }
        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(DeliveryError::SendFailed(format!("{} は受信拒否", email.to)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== MockMessenger =====

#[derive(Clone, Default)]
pub struct MockMessenger {
    messages: Arc<Mutex<Vec<String>>>,
    failing:  Arc<Mutex<bool>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の送信をすべて失敗させる
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    /// 送信を試みたメッセージ（失敗したものも含む）
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, text: &str) -> Result<(), NotificationError> {
        self.messages.lock().unwrap().push(text.to_string());
        if *self.failing.lock().unwrap() {
            return Err(NotificationError::SendFailed("接続失敗".to_string()));
        }
        Ok(())
    }
}
