//! # ビジネスイベントログの構造化ヘルパー
//!
//! ニュースレター生成の節目（開始・スキップ・送信・完了・失敗）を
//! `jq` で絞り込める形で出力するためのマクロとフィールド定数を提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` が
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用する。JSON 出力では
//! フラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` を付与し、`tracing::info!` レベルで出力する。
/// 呼び出し側のクレートは `tracing` に依存している必要がある。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: [`event::category`] の定数
/// - `event.action`: [`event::action`] の定数
/// - `event.result`: [`event::result`] の定数
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NEWSLETTER: &str = "newsletter";
        pub const EMAIL: &str = "email";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // ニュースレター生成
        pub const RUN_STARTED: &str = "newsletter.run_started";
        pub const RUN_SKIPPED: &str = "newsletter.run_skipped";
        pub const RUN_COMPLETED: &str = "newsletter.run_completed";
        pub const RUN_FAILED: &str = "newsletter.run_failed";

        // メール送信
        pub const EMAIL_SENT: &str = "email.sent";
        pub const EMAIL_FAILED: &str = "email.failed";

        // 運用者通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// データベース
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// AI / メール / メッセージング API
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const CONFIGURATION: &str = "configuration";
        pub const AI_GENERATION: &str = "ai_generation";
        pub const RENDER: &str = "render";
        pub const MESSAGING: &str = "messaging";
    }
}
