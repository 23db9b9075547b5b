//! # 定期実行
//!
//! cron 式（秒から始まる 6 フィールド、UTC）に従ってパイプラインを起動する。

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::usecase::NewsletterPipeline;

/// 定期実行を開始する
///
/// 返されたスケジューラを保持している間、ジョブが実行される。
pub async fn start(
    cron: &str,
    pipeline: Arc<NewsletterPipeline>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_id, _scheduler| {
        let pipeline = Arc::clone(&pipeline);
        Box::pin(async move {
            tracing::info!("定期実行によりニュースレター生成を開始します");
            // エラーはパイプライン内でログと失敗通知に出力済み
            let _ = pipeline.run().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron, "定期実行を登録しました");

    Ok(scheduler)
}
