//! 統合テスト用のヘルパー
//!
//! すべての外部依存をインメモリのモックに差し替えたパイプラインを組み立てる。
//! モックは `Clone` で状態を共有するため、パイプラインに渡した後も検証に使える。

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use nicheshunter_domain::{
    clock::FixedClock,
    niche::{Niche, Score},
};
use nicheshunter_infra::mock::{
    MockChatCompletionClient,
    MockEmailSender,
    MockMessenger,
    MockNicheRepository,
    MockSubscriberRepository,
};
use nicheshunter_newsletter_service::usecase::{
    BatchMailer,
    NewsletterPipeline,
    NewsletterRenderer,
    Notifier,
    SummaryGenerator,
};
use serde_json::json;

pub const SITE_URL: &str = "https://nicheshunter.app";

pub struct TestSetup {
    pub niche_repo:      MockNicheRepository,
    pub subscriber_repo: MockSubscriberRepository,
    pub ai:              MockChatCompletionClient,
    pub email:           MockEmailSender,
    pub messenger:       MockMessenger,
}

impl TestSetup {
    pub fn new() -> Self {
        Self {
            niche_repo:      MockNicheRepository::new(),
            subscriber_repo: MockSubscriberRepository::new(),
            ai:              MockChatCompletionClient::new(),
            email:           MockEmailSender::new(),
            messenger:       MockMessenger::new(),
        }
    }

    /// ニッチ 2 件・送信間隔なしのパイプライン
    pub fn pipeline(&self) -> NewsletterPipeline {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap();

        NewsletterPipeline::new(
            Arc::new(self.niche_repo.clone()),
            Arc::new(self.subscriber_repo.clone()),
            SummaryGenerator::new(Arc::new(self.ai.clone())),
            NewsletterRenderer::new(SITE_URL, Arc::new(FixedClock::new(now))).unwrap(),
            BatchMailer::new(Arc::new(self.email.clone()), Duration::ZERO),
            Notifier::new(Some(Arc::new(self.messenger.clone()))),
            2,
        )
    }
}

pub fn niche(title: &str, score: f64) -> Niche {
    Niche {
        id:               format!("id-{title}"),
        title:            title.to_string(),
        category:         "Productivity".to_string(),
        tags:             vec!["b2b".to_string()],
        score:            Score::new(score),
        opportunity:      format!("{title} opportunity"),
        gap:              format!("{title} gap"),
        recommended_move: format!("{title} move"),
        stats:            Some(json!({"revenue": "$10k/mo"})),
        market_analysis:  Some(json!(r#"{"growthRate": "12%"}"#)),
        key_learnings:    vec!["Start narrow".to_string()],
        trending:         Some(json!([{"name": "Notion", "description": "Workspace", "estimatedMRR": "$5M"}])),
        display_code:     format!("NH-{title}"),
        created_at:       Utc::now(),
    }
}

/// 指定した絵文字を返す AI 応答
pub fn ai_reply(emoji: &str) -> String {
    json!({
        "emoji": emoji,
        "marketOverview": "Fast growing market.",
        "theGap": "Nobody serves solo founders.",
        "actionsToDo": ["Interview 10 users", "Ship a landing page", "Launch on Product Hunt"]
    })
    .to_string()
}
