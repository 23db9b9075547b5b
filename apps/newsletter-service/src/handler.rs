//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、生成処理は [`NewsletterPipeline`] に委譲

pub mod generate;
pub mod health;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
pub use generate::{GenerateResponse, trigger_generation};
pub use health::health_check;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::NewsletterPipeline;

/// `GET /health` に表示するサービス名
pub const SERVICE_NAME: &str = "Niches Hunter Paid Newsletter";

/// `GET /health` に表示するサービス説明
pub const SERVICE_DESCRIPTION: &str = "Premium newsletter for paid users - fetches latest niches";

/// ハンドラ共通の State
pub struct AppState {
    pub pipeline: Arc<NewsletterPipeline>,
    /// 定期実行のスケジュール表示（cron 式、無効なら `"disabled"`）
    pub schedule: String,
}

/// ルーターを組み立てる
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate", post(trigger_generation))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
