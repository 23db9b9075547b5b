//! # ニュースレター生成パイプライン
//!
//! 1 回の生成実行を以下の順に進める。
//!
//! 1. 最新のニッチを取得（0 件ならスキップ通知して終了）
//! 2. ニッチごとにサマリーを生成
//! 3. タイトルを組み立てて HTML を生成
//! 4. 有効な購読者を取得（0 件ならスキップ通知して終了）
//! 5. 全購読者にバッチ送信
//! 6. 結果を運用者に通知
//!
//! どの段階のエラーも失敗通知を送った上で呼び出し元に返す。
//! 実行は内部の非同期 Mutex で直列化され、重なった呼び出しは前の実行の完了を待つ。

use std::sync::Arc;

use itertools::Itertools;
use nicheshunter_domain::{
    notification::BatchSendResult,
    subscriber::recipient_emails,
    summary::{NicheSummary, compose_subject, compose_title},
};
use nicheshunter_infra::repository::{NicheRepository, SubscriberRepository};
use nicheshunter_shared::{
    event_log::{error::category, event},
    log_business_event,
};
use tokio::sync::Mutex;

use super::{BatchMailer, NewsletterRenderer, Notifier, SummaryGenerator};
use crate::error::NewsletterError;

/// ニッチがない場合の通知
pub const NO_NICHES_MESSAGE: &str = "⚠️ Paid Newsletter skipped: No niches available";

/// 購読者がいない場合の通知
pub const NO_SUBSCRIBERS_MESSAGE: &str = "⚠️ Paid Newsletter generated but no subscribers to send to";

/// 1 回の生成実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// ニッチが 1 件もなかった
    SkippedNoNiches,
    /// 有効な購読者がいなかった
    SkippedNoSubscribers,
    /// 送信した
    Sent {
        title:      String,
        recipients: usize,
        result:     BatchSendResult,
    },
}

/// ニュースレター生成パイプライン
pub struct NewsletterPipeline {
    niche_repo:      Arc<dyn NicheRepository>,
    subscriber_repo: Arc<dyn SubscriberRepository>,
    summaries:       SummaryGenerator,
    renderer:        NewsletterRenderer,
    mailer:          BatchMailer,
    notifier:        Notifier,
    niche_limit:     u32,
    run_lock:        Mutex<()>,
}

impl NewsletterPipeline {
    pub fn new(
        niche_repo: Arc<dyn NicheRepository>,
        subscriber_repo: Arc<dyn SubscriberRepository>,
        summaries: SummaryGenerator,
        renderer: NewsletterRenderer,
        mailer: BatchMailer,
        notifier: Notifier,
        niche_limit: u32,
    ) -> Self {
        Self {
            niche_repo,
            subscriber_repo,
            summaries,
            renderer,
            mailer,
            notifier,
            niche_limit,
            run_lock: Mutex::new(()),
        }
    }

    /// ニュースレターを 1 回生成して配信する
    #[tracing::instrument(skip_all)]
    pub async fn run(&self) -> Result<RunOutcome, NewsletterError> {
        let _guard = self.run_lock.lock().await;

        log_business_event!(
            event.category = event::category::NEWSLETTER,
            event.action = event::action::RUN_STARTED,
            event.result = event::result::SUCCESS,
            niche_limit = self.niche_limit,
            "ニュースレター生成を開始します"
        );

        match self.execute().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let error_category = match &e {
                    NewsletterError::DataAccess(_) => category::INFRASTRUCTURE,
                    _ => category::EXTERNAL_SERVICE,
                };
                tracing::error!(
                    event.category = event::category::NEWSLETTER,
                    event.action = event::action::RUN_FAILED,
                    event.result = event::result::FAILURE,
                    error.category = error_category,
                    error.kind = e.kind(),
                    error = %e,
                    "ニュースレター生成に失敗しました"
                );
                self.notifier.notify(&failure_message(&e)).await;
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<RunOutcome, NewsletterError> {
        let niches = self.niche_repo.find_latest(self.niche_limit).await?;
        if niches.is_empty() {
            self.skip("no_niches", NO_NICHES_MESSAGE).await;
            return Ok(RunOutcome::SkippedNoNiches);
        }
        tracing::info!(count = niches.len(), "ニッチを取得しました");

        let summaries = self.summaries.summarize_all(&niches).await;
        let title = compose_title(&summaries);
        let html = self.renderer.render(&summaries, &title)?;
        tracing::debug!(title = %title, bytes = html.len(), "HTML を生成しました");

        let subscribers = self.subscriber_repo.find_active().await?;
        let recipients = recipient_emails(&subscribers);
        if recipients.is_empty() {
            self.skip("no_subscribers", NO_SUBSCRIBERS_MESSAGE).await;
            return Ok(RunOutcome::SkippedNoSubscribers);
        }

        let result = self
            .mailer
            .send(&recipients, &html, &compose_subject(&title))
            .await?;

        log_business_event!(
            event.category = event::category::NEWSLETTER,
            event.action = event::action::RUN_COMPLETED,
            event.result = event::result::SUCCESS,
            newsletter.title = %title,
            newsletter.recipients = recipients.len(),
            newsletter.sent = result.success,
            newsletter.failed = result.failed,
            "ニュースレターを配信しました"
        );
        self.notifier
            .notify(&result_message(&title, &summaries, recipients.len(), result))
            .await;

        Ok(RunOutcome::Sent {
            title,
            recipients: recipients.len(),
            result,
        })
    }

    async fn skip(&self, reason: &str, message: &str) {
        log_business_event!(
            event.category = event::category::NEWSLETTER,
            event.action = event::action::RUN_SKIPPED,
            event.result = event::result::SKIPPED,
            newsletter.skip_reason = reason,
            "ニュースレター生成をスキップしました"
        );
        self.notifier.notify(message).await;
    }
}

/// 配信結果の通知本文
pub fn result_message(
    title: &str,
    summaries: &[NicheSummary],
    subscribers: usize,
    result: BatchSendResult,
) -> String {
    let niches = summaries
        .iter()
        .map(|s| format!("• {} {} (Score: {})", s.emoji, s.title, s.score))
        .join("\n");
    let footer = if result.all_sent() {
        "✅ All sent!"
    } else {
        "⚠️ Check logs for failed emails"
    };

    format!(
        "📰 Paid Newsletter Sent! 🏆\n\n\
         📌 {title}\n\n\
         🎯 Niches:\n{niches}\n\n\
         📊 Stats:\n\
         • Paid Subscribers: {subscribers}\n\
         • Sent: {sent}\n\
         • Failed: {failed}\n\n\
         {footer}",
        sent = result.success,
        failed = result.failed,
    )
}

/// 失敗時の通知本文
pub fn failure_message(error: &NewsletterError) -> String {
    format!("❌ Paid Newsletter generation FAILED!\n\nError: {error}")
}
