//! # サマリー生成
//!
//! ニッチ 1 件からニュースレター掲載用のサマリー 1 件を作る。
//!
//! AI 要約を試み、API キーの欠落・通信失敗・応答の解釈失敗のいずれでも
//! ニッチの生データから組み立てたサマリーにフォールバックする。
//! このモジュールはエラーを返さない。

use std::sync::Arc;

use nicheshunter_domain::{
    json::text_field,
    niche::Niche,
    summary::{AiContent, GenerationError, NicheSummary, SummaryContent},
};
use nicheshunter_infra::ai::ChatCompletionClient;
use nicheshunter_shared::event_log::error::{category, kind};

/// プロンプトに載せる競合アプリの最大件数
const PROMPT_APP_LIMIT: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

/// システムプロンプト
pub const SYSTEM_PROMPT: &str =
    "You are a concise mobile app analyst. Always respond with valid JSON only, no markdown.";

/// サマリー生成器
pub struct SummaryGenerator {
    client: Arc<dyn ChatCompletionClient>,
}

impl SummaryGenerator {
    pub fn new(client: Arc<dyn ChatCompletionClient>) -> Self {
        Self { client }
    }

    /// ニッチを要約する
    ///
    /// 常に 1 件のサマリーを返し、`actions_to_do` は空にならない。
    #[tracing::instrument(skip_all, fields(niche = %niche.title))]
    pub async fn summarize(&self, niche: &Niche) -> NicheSummary {
        let content = match self.request_ai_content(niche).await {
            Ok(ai) => {
                tracing::debug!("AI 要約を生成しました");
                SummaryContent::Ai(ai)
            }
            Err(GenerationError::NotConfigured(key)) => {
                tracing::info!(missing = %key, "AI 要約が未設定のため生データを使用します");
                SummaryContent::Fallback
            }
            Err(e) => {
                tracing::warn!(
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = kind::AI_GENERATION,
                    error = %e,
                    "AI 要約に失敗したため生データを使用します"
                );
                SummaryContent::Fallback
            }
        };

        NicheSummary::from_content(niche, content)
    }

    /// ニッチを順に要約する
    ///
    /// 戻り値の件数と順序は入力と一致する。
    pub async fn summarize_all(&self, niches: &[Niche]) -> Vec<NicheSummary> {
        let mut summaries = Vec::with_capacity(niches.len());
        for niche in niches {
            summaries.push(self.summarize(niche).await);
        }
        summaries
    }

    async fn request_ai_content(&self, niche: &Niche) -> Result<AiContent, GenerationError> {
        let prompt = build_prompt(niche);
        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        AiContent::parse_reply(&reply)
    }
}

/// AI に渡すニッチの説明文を組み立てる
pub fn build_context(niche: &Niche) -> String {
    let stats = serde_json::Value::Object(niche.stats());
    let market = serde_json::Value::Object(niche.market_analysis());
    let field = |source: &serde_json::Value, key: &str| {
        text_field(source, key).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let key_learnings = if niche.key_learnings.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        niche
            .key_learnings
            .iter()
            .enumerate()
            .map(|(i, learning)| format!("{}. {learning}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let apps = niche.trending_apps();
    let top_apps = if apps.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        apps.into_iter()
            .take(PROMPT_APP_LIMIT)
            .map(|app| {
                format!(
                    "- {}: {} (MRR: {})",
                    app.name.as_deref().unwrap_or("Unknown App"),
                    app.description.as_deref().unwrap_or_default(),
                    app.estimated_mrr.as_deref().unwrap_or(NOT_AVAILABLE),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "NICHE: {title}\n\
         CATEGORY: {category}\n\
         SCORE: {score}/100\n\
         \n\
         MARKET DATA:\n\
         - Total Market Size: {market_size}\n\
         - Growth Rate: {growth}\n\
         - Target Audience: {audience}\n\
         - Revenue Potential: {revenue}\n\
         - Competition: {competition}\n\
         - Time to MVP: {mvp}\n\
         \n\
         OPPORTUNITY: {opportunity}\n\
         \n\
         GAP TO EXPLOIT: {gap}\n\
         \n\
         RECOMMENDED MOVE: {recommended_move}\n\
         \n\
         KEY LEARNINGS:\n\
         {key_learnings}\n\
         \n\
         TOP APPS IN THIS NICHE:\n\
         {top_apps}\n",
        title = niche.title,
        category = niche.category,
        score = niche.score,
        market_size = field(&market, "totalMarketSize"),
        growth = field(&market, "growthRate"),
        audience = field(&market, "targetAudience"),
        revenue = field(&stats, "revenue"),
        competition = field(&stats, "competition"),
        mvp = field(&stats, "timeToMVP"),
        opportunity = niche.opportunity,
        gap = niche.gap,
        recommended_move = niche.recommended_move,
    )
}

/// ユーザープロンプトを組み立てる
pub fn build_prompt(niche: &Niche) -> String {
    format!(
        r#"You are a startup analyst writing for a premium newsletter for indie app developers.

Based on this niche data, create a CONCISE and ACTIONABLE summary in JSON format.

{context}
Return a JSON object with:
{{
  "emoji": "single relevant emoji for this niche",
  "marketOverview": "2-3 sentences max. Key market facts: size, growth, who needs it, why now. Be specific with numbers.",
  "theGap": "2-3 sentences max. What's missing in current solutions? What pain point isn't solved?",
  "actionsToDo": ["action 1", "action 2", "action 3"]
}}

"actionsToDo" must contain exactly 3 concrete, specific actions to start building this.

Rules:
- Be CONCISE and PUNCHY. No fluff.
- Use specific numbers when available
- Actions must be concrete and actionable (not vague like "do market research")
- Write in a direct, confident tone
- Focus on what makes this opportunity unique NOW"#,
        context = build_context(niche)
    )
}
