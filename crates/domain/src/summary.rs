//! # ニュースレター用サマリー
//!
//! ニッチを AI で要約した、または AI が使えないときに生データから組み立てた
//! ニュースレター掲載用の投影。
//!
//! ## 設計方針
//!
//! - **2 分岐の明示**: AI 由来の内容は [`SummaryContent::Ai`]、生データ由来は
//!   [`SummaryContent::Fallback`] として区別し、[`NicheSummary::from_content`] で
//!   同じ形に解決する
//! - **アクションは必ず 1 件以上**: AI 経路は 1〜3 件、フォールバック経路はちょうど 1 件
//! - **件数は減らさない**: AI の失敗は内容を劣化させるだけで、サマリーを落とさない

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::niche::{Niche, Score};

/// AI 応答に絵文字がない場合・フォールバック時に使う絵文字
pub const DEFAULT_EMOJI: &str = "🎯";

/// 掲載するアクションの最大件数
pub const MAX_ACTIONS: usize = 3;

/// 掲載するアプリ例の最大件数
pub const MAX_APP_EXAMPLES: usize = 3;

/// タイトルに載せるニッチの最大件数
pub const MAX_TITLE_NICHES: usize = 2;

const UNKNOWN_APP_NAME: &str = "Unknown App";
const UNKNOWN_REVENUE: &str = "N/A";

/// AI 要約の生成エラー
///
/// サマリー生成の内部でのみ使われ、呼び出し元には伝播しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// AI API の認証情報がない
    #[error("AI API の設定がありません: {0}")]
    NotConfigured(String),

    /// AI API の呼び出しに失敗
    #[error("AI API の呼び出しに失敗: {0}")]
    RequestFailed(String),

    /// 応答が期待した JSON 形式ではない
    #[error("AI 応答を解釈できません: {0}")]
    InvalidReply(String),
}

/// アプリ例
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppExample {
    pub name:        String,
    pub description: String,
    /// 収益の目安（例: `$10k MRR`）
    pub mrr:         String,
}

/// AI が生成した要約内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiContent {
    pub emoji:           String,
    pub market_overview: String,
    pub the_gap:         String,
    pub actions_to_do:   Vec<String>,
}

/// AI 応答の JSON 形状
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiReply {
    emoji:           Option<String>,
    market_overview: Option<String>,
    the_gap:         Option<String>,
    actions_to_do:   Option<Vec<String>>,
}

impl AiContent {
    /// AI の応答テキストを解釈する
    ///
    /// Markdown のコードフェンスを取り除いてから厳密な JSON として読む。
    /// 市場概要・ギャップが空、または空でないアクションが 1 件もない場合は
    /// [`GenerationError::InvalidReply`] を返す。
    pub fn parse_reply(reply: &str) -> Result<Self, GenerationError> {
        let cleaned = strip_code_fences(reply);
        let parsed: AiReply = serde_json::from_str(cleaned)
            .map_err(|e| GenerationError::InvalidReply(e.to_string()))?;

        let market_overview = non_blank(parsed.market_overview)
            .ok_or_else(|| GenerationError::InvalidReply("marketOverview がありません".into()))?;
        let the_gap = non_blank(parsed.the_gap)
            .ok_or_else(|| GenerationError::InvalidReply("theGap がありません".into()))?;

        let actions_to_do: Vec<String> = parsed
            .actions_to_do
            .unwrap_or_default()
            .into_iter()
            .filter_map(|action| non_blank(Some(action)))
            .take(MAX_ACTIONS)
            .collect();
        if actions_to_do.is_empty() {
            return Err(GenerationError::InvalidReply(
                "actionsToDo がありません".into(),
            ));
        }

        Ok(Self {
            emoji: non_blank(parsed.emoji).unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            market_overview,
            the_gap,
            actions_to_do,
        })
    }
}

/// サマリーの内容（AI 由来か生データ由来か）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryContent {
    /// AI 要約に成功
    Ai(AiContent),
    /// AI が使えなかったため、ニッチの生データをそのまま使う
    Fallback,
}

/// ニュースレター掲載用のニッチサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NicheSummary {
    pub title:           String,
    pub emoji:           String,
    pub category:        String,
    pub market_overview: String,
    pub the_gap:         String,
    pub actions_to_do:   Vec<String>,
    pub app_examples:    Vec<AppExample>,
    pub display_code:    String,
    pub score:           Score,
}

impl NicheSummary {
    /// ニッチと要約内容からサマリーを組み立てる
    pub fn from_content(niche: &Niche, content: SummaryContent) -> Self {
        let (emoji, market_overview, the_gap, actions_to_do) = match content {
            SummaryContent::Ai(ai) => (ai.emoji, ai.market_overview, ai.the_gap, ai.actions_to_do),
            SummaryContent::Fallback => (
                DEFAULT_EMOJI.to_string(),
                niche.opportunity.clone(),
                niche.gap.clone(),
                vec![niche.recommended_move.clone()],
            ),
        };

        Self {
            title: niche.title.clone(),
            emoji,
            category: niche.category.clone(),
            market_overview,
            the_gap,
            actions_to_do,
            app_examples: app_examples(niche),
            display_code: niche.display_code.clone(),
            score: niche.score,
        }
    }

    /// 生データのみで組み立てたサマリー
    pub fn fallback(niche: &Niche) -> Self {
        Self::from_content(niche, SummaryContent::Fallback)
    }
}

/// 競合アプリの先頭 3 件をアプリ例に変換する
fn app_examples(niche: &Niche) -> Vec<AppExample> {
    niche
        .trending_apps()
        .into_iter()
        .take(MAX_APP_EXAMPLES)
        .map(|app| AppExample {
            name:        app.name.unwrap_or_else(|| UNKNOWN_APP_NAME.to_string()),
            description: app.description.unwrap_or_default(),
            mrr:         app.estimated_mrr.unwrap_or_else(|| UNKNOWN_REVENUE.to_string()),
        })
        .collect()
}

/// ニュースレターのタイトルを組み立てる
///
/// 先頭 [`MAX_TITLE_NICHES`] 件のサマリーの `"{emoji} {title}"` を `" & "` で連結する。
/// 3 件目以降は本文にのみ掲載する。
///
/// ```
/// # use nicheshunter_domain::summary::compose_title;
/// assert_eq!(compose_title(&[]), "");
/// ```
pub fn compose_title(summaries: &[NicheSummary]) -> String {
    summaries
        .iter()
        .take(MAX_TITLE_NICHES)
        .map(|s| format!("{} {}", s.emoji, s.title))
        .join(" & ")
}

/// メールの件名
pub fn compose_subject(title: &str) -> String {
    format!("{DEFAULT_EMOJI} {title}")
}

fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::niche::test_fixtures::niche;

    const VALID_REPLY: &str = r#"{
        "emoji": "🚀",
        "marketOverview": "A $2B market growing 15% a year.",
        "theGap": "No app handles offline sync.",
        "actionsToDo": ["Ship an MVP", "Interview 10 users", "Launch on Product Hunt"]
    }"#;

    #[test]
    fn test_parse_replyは正しいjsonを解釈する() {
        let content = AiContent::parse_reply(VALID_REPLY).unwrap();

        assert_eq!(content.emoji, "🚀");
        assert_eq!(content.market_overview, "A $2B market growing 15% a year.");
        assert_eq!(content.actions_to_do.len(), 3);
    }

    #[rstest]
    #[case::json_fence("```json\n{}\n```")]
    #[case::plain_fence("```\n{}\n```")]
    #[case::no_fence("{}")]
    fn test_parse_replyはコードフェンスを取り除く(#[case] template: &str) {
        let reply = template.replace("{}", VALID_REPLY);

        let content = AiContent::parse_reply(&reply).unwrap();

        assert_eq!(content.the_gap, "No app handles offline sync.");
    }

    #[test]
    fn test_parse_replyはアクションを3件に切り詰める() {
        let reply = json!({
            "emoji": "📈",
            "marketOverview": "overview",
            "theGap": "gap",
            "actionsToDo": ["1", "2", " ", "3", "4"]
        })
        .to_string();

        let content = AiContent::parse_reply(&reply).unwrap();

        assert_eq!(content.actions_to_do, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_replyは絵文字がなければデフォルトを使う() {
        let reply = json!({
            "marketOverview": "overview",
            "theGap": "gap",
            "actionsToDo": ["do it"]
        })
        .to_string();

        let content = AiContent::parse_reply(&reply).unwrap();

        assert_eq!(content.emoji, DEFAULT_EMOJI);
    }

    #[rstest]
    #[case::not_json("Sure! Here is your summary")]
    #[case::no_actions(r#"{"marketOverview": "o", "theGap": "g", "actionsToDo": []}"#)]
    #[case::blank_overview(r#"{"marketOverview": " ", "theGap": "g", "actionsToDo": ["a"]}"#)]
    #[case::missing_gap(r#"{"marketOverview": "o", "actionsToDo": ["a"]}"#)]
    fn test_parse_replyは不正な応答をエラーにする(#[case] reply: &str) {
        let result = AiContent::parse_reply(reply);

        assert!(matches!(result, Err(GenerationError::InvalidReply(_))));
    }

    #[test]
    fn test_フォールバックは生データとアクション1件を使う() {
        let source = niche("A", 80.0);

        let summary = NicheSummary::fallback(&source);

        assert_eq!(summary.emoji, DEFAULT_EMOJI);
        assert_eq!(summary.market_overview, "A opportunity");
        assert_eq!(summary.the_gap, "A gap");
        assert_eq!(summary.actions_to_do, vec!["A move".to_string()]);
        assert_eq!(summary.display_code, "NH-A");
    }

    #[test]
    fn test_アプリ例は3件までで欠落にプレースホルダを使う() {
        let mut source = niche("A", 80.0);
        source.trending = Some(json!([
            {"name": "One", "description": "first", "estimatedMRR": "$1k"},
            {"description": "nameless"},
            {"name": "Three", "estimatedMRR": 5000},
            {"name": "Four"}
        ]));

        let summary = NicheSummary::fallback(&source);

        assert_eq!(
            summary.app_examples,
            vec![
                AppExample {
                    name:        "One".to_string(),
                    description: "first".to_string(),
                    mrr:         "$1k".to_string(),
                },
                AppExample {
                    name:        "Unknown App".to_string(),
                    description: "nameless".to_string(),
                    mrr:         "N/A".to_string(),
                },
                AppExample {
                    name:        "Three".to_string(),
                    description: String::new(),
                    mrr:         "5000".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_ai内容からサマリーを組み立てる() {
        let source = niche("A", 80.0);
        let content = AiContent::parse_reply(VALID_REPLY).unwrap();

        let summary = NicheSummary::from_content(&source, SummaryContent::Ai(content));

        assert_eq!(summary.emoji, "🚀");
        assert_eq!(summary.title, "A");
        assert_eq!(summary.score, Score::new(80.0));
    }

    #[test]
    fn test_タイトルは1件と2件で決まった形になる() {
        let mut a = NicheSummary::fallback(&niche("A", 80.0));
        a.emoji = "🎯".to_string();
        let mut b = NicheSummary::fallback(&niche("B", 70.0));
        b.emoji = "🚀".to_string();

        assert_eq!(compose_title(std::slice::from_ref(&a)), "🎯 A");
        assert_eq!(compose_title(&[a, b]), "🎯 A & 🚀 B");
    }

    #[test]
    fn test_タイトルには先頭2件だけを載せる() {
        let summaries: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|title| NicheSummary::fallback(&niche(title, 80.0)))
            .collect();

        assert_eq!(compose_title(&summaries), "🎯 A & 🎯 B");
    }

    #[test]
    fn test_件名はタイトルに絵文字を前置する() {
        assert_eq!(compose_subject("🎯 A"), "🎯 🎯 A");
    }
}
