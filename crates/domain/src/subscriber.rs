//! # 有料購読者
//!
//! ニュースレターの送信先。課金システム側で管理され、このシステムからは読み取り専用。

/// 有料購読者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id:          String,
    pub email:       String,
    /// 課金システム上の顧客 ID
    pub customer_id: Option<String>,
    pub is_active:   bool,
    pub plan_type:   Option<String>,
}

/// 購読者一覧から送信先メールアドレスを取り出す
///
/// 空白のみのアドレスは除外する。順序は購読者一覧の順序を保つ。
pub fn recipient_emails(subscribers: &[Subscriber]) -> Vec<String> {
    subscribers
        .iter()
        .map(|s| s.email.trim())
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}
