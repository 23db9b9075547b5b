//! # 送信
//!
//! 購読者へのメール送信と、運用者へのステータス通知に関するモデルを定義する。
//!
//! ## 設計方針
//!
//! - **メール送信の失敗は宛先単位**: [`DeliveryError::SendFailed`] は集計され、
//!   残りの宛先への送信を止めない
//! - **認証情報の欠落は致命的**: [`DeliveryError::NotConfigured`] は初回使用時に
//!   バッチ全体を中断させる
//! - **運用者通知は best-effort**: [`NotificationError`] は呼び出し元に伝播させない

use thiserror::Error;

/// メールメッセージ
///
/// 1 宛先分の送信内容。`EmailSender` に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
}

/// メール送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// 送信に必要な認証情報・設定が存在しない
    #[error("メール送信の設定がありません: {0}")]
    NotConfigured(String),

    /// 個別の送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// 運用者向けメッセージ送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// メッセージング API の呼び出しに失敗
    #[error("通知の送信に失敗: {0}")]
    SendFailed(String),
}

/// バッチ送信の集計結果
///
/// `success + failed` は常に宛先数と一致する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSendResult {
    pub success: usize,
    pub failed:  usize,
}

impl BatchSendResult {
    /// 処理した宛先の総数
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    /// 全件成功したかどうか
    pub fn all_sent(&self) -> bool {
        self.failed == 0
    }
}
