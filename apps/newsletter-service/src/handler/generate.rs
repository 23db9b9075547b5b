//! # 手動実行ハンドラ
//!
//! ```text
//! POST /generate
//! ```
//!
//! 生成をバックグラウンドタスクとして起動し、完了を待たずに応答する。
//! 生成の結果はログと運用者通知でのみ確認できる。

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use super::AppState;

/// 手動実行の受付レスポンス
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: &'static str,
}

/// 生成を開始する
pub async fn trigger_generation(State(state): State<Arc<AppState>>) -> Json<GenerateResponse> {
    tracing::info!("手動でニュースレター生成が要求されました");

    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        // エラーはパイプライン内でログと失敗通知に出力済み
        if let Ok(outcome) = pipeline.run().await {
            tracing::debug!(?outcome, "手動実行が完了しました");
        }
    });

    Json(GenerateResponse {
        success: true,
        message: "Paid newsletter generation started...",
    })
}
