//! # ニュースレターサービス設定
//!
//! 環境変数からサービスの設定を読み込む。
//!
//! 数値の書式不正や未知のメールバックエンドは起動時エラー（[`ConfigError`]）とする。
//! 認証情報（DB 接続 URL、各種 API キー）の欠落は起動時エラーにせず、
//! 実際に使われた時点で設定エラーとして扱う。

use std::{env, str::FromStr, time::Duration};

use nicheshunter_infra::{
    ai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL},
    email::DEFAULT_RESEND_BASE_URL,
    messaging::DEFAULT_TELEGRAM_API_BASE_URL,
    repository::{DEFAULT_SUBSCRIBERS_TABLE, TableName},
};
use strum::{Display, EnumString};
use thiserror::Error;

/// 既定の定期実行スケジュール（毎日 07:00 UTC）
pub const DEFAULT_CRON: &str = "0 0 7 * * *";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数値として解釈できない
    #[error("{key} は数値である必要があります: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    /// 未知のメールバックエンド
    #[error("EMAIL_BACKEND は resend / smtp / noop のいずれかである必要があります: {0:?}")]
    UnknownEmailBackend(String),

    /// テーブル名が識別子として不正
    #[error("{0}")]
    InvalidTableName(String),
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmailBackend {
    /// Resend HTTP API（本番）
    Resend,
    /// SMTP（Mailpit などの開発用サーバー）
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// ニュースレターサービスの設定
#[derive(Debug, Clone)]
pub struct NewsletterConfig {
    /// バインドアドレス
    pub host:              String,
    /// ポート番号
    pub port:              u16,
    /// PostgreSQL 接続 URL（未設定なら初回アクセス時に設定エラー）
    pub database_url:      Option<String>,
    /// 購読者を読み取るテーブル
    pub subscribers_table: TableName,
    /// 1 回の配信に載せるニッチ数
    pub niche_limit:       u32,
    /// 公開サイトの URL（メール内リンク用）
    pub site_url:          String,
    /// 定期実行の cron 式（`None` なら定期実行しない）
    pub cron:              Option<String>,
    pub openai:            OpenAiConfig,
    pub email:             EmailConfig,
    pub telegram:          TelegramConfig,
}

/// AI 要約の設定
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key:  Option<String>,
    pub model:    String,
    pub base_url: String,
}

/// メール送信の設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub backend:         EmailBackend,
    pub resend_api_key:  Option<String>,
    pub resend_base_url: String,
    pub smtp_host:       String,
    pub smtp_port:       u16,
    /// 送信元メールアドレス
    pub from_address:    String,
    /// 送信間隔（Resend のレート制限 2 req/s に余裕を持たせた値）
    pub send_delay:      Duration,
}

/// 運用者通知の設定
///
/// トークンとチャット ID の両方が揃っている場合のみ通知する。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token:    Option<String>,
    pub chat_id:      Option<String>,
    pub api_base_url: String,
}

impl NewsletterConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    ///
    /// 空文字列（前後の空白のみを含む）は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let subscribers_table = TableName::parse(&get_or("SUBSCRIBERS_TABLE", DEFAULT_SUBSCRIBERS_TABLE))
            .map_err(|e| ConfigError::InvalidTableName(e.to_string()))?;

        let backend = match get("EMAIL_BACKEND") {
            Some(value) => {
                EmailBackend::from_str(&value).map_err(|_| ConfigError::UnknownEmailBackend(value))?
            }
            None => EmailBackend::Resend,
        };

        // 空文字列は「定期実行しない」の明示的な指定
        let cron = match lookup("NEWSLETTER_CRON") {
            Some(value) => Some(value.trim().to_string()).filter(|v| !v.is_empty()),
            None => Some(DEFAULT_CRON.to_string()),
        };

        Ok(Self {
            host: get_or("HOST", "0.0.0.0"),
            port: parse_number("PORT", get("PORT"), 3002)?,
            database_url: get("DATABASE_URL"),
            subscribers_table,
            niche_limit: parse_number("NICHE_LIMIT", get("NICHE_LIMIT"), 2)?,
            site_url: get_or("SITE_URL", "https://nicheshunter.app")
                .trim_end_matches('/')
                .to_string(),
            cron,
            openai: OpenAiConfig {
                api_key:  get("OPENAI_API_KEY"),
                model:    get_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: get_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            email: EmailConfig {
                backend,
                resend_api_key: get("RESEND_API_KEY"),
                resend_base_url: get_or("RESEND_BASE_URL", DEFAULT_RESEND_BASE_URL),
                smtp_host: get_or("SMTP_HOST", "localhost"),
                smtp_port: parse_number("SMTP_PORT", get("SMTP_PORT"), 1025)?,
                from_address: get_or("EMAIL_FROM", "support@arianeconcept.fr"),
                send_delay: Duration::from_millis(parse_number(
                    "EMAIL_SEND_DELAY_MS",
                    get("EMAIL_SEND_DELAY_MS"),
                    600,
                )?),
            },
            telegram: TelegramConfig {
                bot_token:    get("TELEGRAM_BOT_TOKEN"),
                chat_id:      get("TELEGRAM_CHAT_ID"),
                api_base_url: get_or("TELEGRAM_API_BASE_URL", DEFAULT_TELEGRAM_API_BASE_URL),
            },
        })
    }
}

fn parse_number<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
