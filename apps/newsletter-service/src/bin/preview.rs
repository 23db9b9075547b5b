//! # ニュースレタープレビュー
//!
//! 最新のニッチから配信と同じ HTML を生成してファイルに書き出す。メールは送信しない。
//!
//! ```bash
//! # AI 要約あり（OPENAI_API_KEY 未設定なら生データにフォールバック）
//! cargo run -p nicheshunter-newsletter-service --bin newsletter-preview
//!
//! # AI を呼ばずに生データだけで生成
//! cargo run -p nicheshunter-newsletter-service --bin newsletter-preview -- --fallback
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use nicheshunter_domain::summary::{NicheSummary, compose_title};
use nicheshunter_infra::{
    db::LazyPgPool,
    repository::{NicheRepository, PostgresNicheRepository},
};
use nicheshunter_newsletter_service::{config::NewsletterConfig, usecase::SummaryGenerator, wiring};
use nicheshunter_shared::observability::{TracingConfig, init_tracing};

#[derive(Parser)]
#[command(name = "newsletter-preview", about = "Render the paid newsletter to an HTML file without sending it")]
struct Cli {
    /// AI を呼ばずに生データからサマリーを作る
    #[arg(long, default_value_t = false)]
    fallback: bool,

    /// 出力先（既定は preview.html、--fallback 指定時は preview-fallback.html）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 取得するニッチ数（既定は NICHE_LIMIT）
    #[arg(short, long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(TracingConfig::from_env("newsletter-preview"));

    let cli = Cli::parse();
    let config = NewsletterConfig::from_env().context("設定の読み込みに失敗しました")?;

    let pool = Arc::new(LazyPgPool::new(config.database_url.clone()));
    let niches = PostgresNicheRepository::new(pool)
        .find_latest(cli.limit.unwrap_or(config.niche_limit))
        .await
        .context("ニッチの取得に失敗しました")?;
    if niches.is_empty() {
        anyhow::bail!("ニッチが 1 件もないためプレビューを生成できません");
    }
    tracing::info!(count = niches.len(), "ニッチを取得しました");

    let summaries = if cli.fallback {
        niches.iter().map(NicheSummary::fallback).collect::<Vec<_>>()
    } else {
        SummaryGenerator::new(wiring::chat_client(&config))
            .summarize_all(&niches)
            .await
    };

    let title = compose_title(&summaries);
    let html = wiring::renderer(&config)?
        .render(&summaries, &title)
        .context("HTML の生成に失敗しました")?;

    let output = cli.output.unwrap_or_else(|| {
        PathBuf::from(if cli.fallback {
            "preview-fallback.html"
        } else {
            "preview.html"
        })
    });
    tokio::fs::write(&output, html)
        .await
        .with_context(|| format!("{} への書き込みに失敗しました", output.display()))?;

    tracing::info!(path = %output.display(), title = %title, "プレビューを書き出しました");
    Ok(())
}
