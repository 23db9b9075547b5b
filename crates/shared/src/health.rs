//! # ヘルスチェック
//!
//! `GET /health` が返すレスポンス型。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// 稼働中を示すステータス値
pub const STATUS_OK: &str = "ok";

/// ヘルスチェックレスポンス
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nicheshunter_shared::HealthResponse;
///
/// let now = Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap();
/// let response = HealthResponse::ok("svc", "desc", "0 0 7 * * *", "0.1.0", now);
/// assert_eq!(response.status, "ok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status:      String,
    pub service:     String,
    pub description: String,
    /// 定期実行のスケジュール（cron 式）
    pub schedule:    String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version:     String,
    /// RFC 3339 形式の応答時刻
    pub timestamp:   String,
}

impl HealthResponse {
    pub fn ok(
        service: impl Into<String>,
        description: impl Into<String>,
        schedule: impl Into<String>,
        version: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status:      STATUS_OK.to_string(),
            service:     service.into(),
            description: description.into(),
            schedule:    schedule.into(),
            version:     version.into(),
            timestamp:   now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
