//! # メール送信
//!
//! 購読者へのニュースレター送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`EmailSender`] でメール送信を抽象化
//! - **3 つの実装**: Resend（本番用）、SMTP（Mailpit 開発用）、Noop（ドライラン用）
//! - **環境変数切替**: `EMAIL_BACKEND` でランタイム選択
//!
//! 実装は 1 宛先ずつ送るだけで、送信間隔の制御は呼び出し側が行う。

mod noop;
mod resend;
mod smtp;

use async_trait::async_trait;
use nicheshunter_domain::notification::{DeliveryError, EmailMessage};
pub use noop::NoopEmailSender;
pub use resend::{DEFAULT_RESEND_BASE_URL, ResendEmailSender};
pub use smtp::SmtpEmailSender;

/// メール送信トレイト
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 1 宛先分のメールを送信する
    ///
    /// 認証情報がない場合は [`DeliveryError::NotConfigured`]、
    /// 送信自体に失敗した場合は [`DeliveryError::SendFailed`] を返す。
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DeliveryError>;
}
