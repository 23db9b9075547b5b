//! # Niches Hunter Paid Newsletter Service
//!
//! 有料会員向けの日刊ニュースレターを生成・配信するサーバー。
//!
//! ## 役割
//!
//! - **定期実行**: `NEWSLETTER_CRON`（既定は毎日 07:00 UTC）に生成を起動
//! - **手動実行**: `POST /generate` で生成をバックグラウンド起動
//! - **死活監視**: `GET /health`
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（既定 `0.0.0.0`） |
//! | `PORT` | No | ポート番号（既定 `3002`） |
//! | `DATABASE_URL` | 実行時 | PostgreSQL 接続 URL |
//! | `RESEND_API_KEY` | 実行時 | Resend API キー（`EMAIL_BACKEND=resend` の場合） |
//! | `OPENAI_API_KEY` | No | 未設定ならサマリーは生データから作成 |
//! | `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` | No | 未設定なら運用者通知なし |
//! | `NEWSLETTER_CRON` | No | 定期実行の cron 式（秒から始まる 6 フィールド、UTC で解釈。既定 `0 0 7 * * *`、空文字列で無効） |
//!
//! その他の変数は [`NewsletterConfig`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p nicheshunter-newsletter-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use nicheshunter_newsletter_service::{
    config::NewsletterConfig,
    handler::{AppState, router},
    scheduler,
    wiring,
};
use nicheshunter_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("newsletter-service"));

    let config = NewsletterConfig::from_env().context("設定の読み込みに失敗しました")?;

    let pipeline = Arc::new(
        wiring::build_pipeline(&config).context("パイプラインの組み立てに失敗しました")?,
    );

    // スケジューラはドロップするとジョブが止まるため main の終了まで保持する
    let _scheduler = match &config.cron {
        Some(cron) => Some(
            scheduler::start(cron, Arc::clone(&pipeline))
                .await
                .with_context(|| format!("定期実行の登録に失敗しました: {cron}"))?,
        ),
        None => {
            tracing::warn!("NEWSLETTER_CRON が空のため定期実行は無効です");
            None
        }
    };

    let state = Arc::new(AppState {
        pipeline,
        schedule: config.cron.clone().unwrap_or_else(|| "disabled".to_string()),
    });
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} へのバインドに失敗しました"))?;

    tracing::info!(
        "Niches Hunter Paid Newsletter Service を起動します: {} (health: GET /health, 手動実行: POST /generate)",
        addr
    );

    axum::serve(listener, app).await.context("サーバーが異常終了しました")?;

    Ok(())
}
