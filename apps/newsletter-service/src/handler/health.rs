//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "service": "Niches Hunter Paid Newsletter",
//!   "description": "Premium newsletter for paid users - fetches latest niches",
//!   "schedule": "0 0 7 * * *",
//!   "version": "0.1.0",
//!   "timestamp": "2026-10-16T07:00:00.000Z"
//! }
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use nicheshunter_shared::HealthResponse;

use super::{AppState, SERVICE_DESCRIPTION, SERVICE_NAME};

/// ヘルスチェックエンドポイント
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        SERVICE_NAME,
        SERVICE_DESCRIPTION,
        state.schedule.as_str(),
        env!("CARGO_PKG_VERSION"),
        Utc::now(),
    ))
}
