//! # メール HTML の生成
//!
//! サマリーの列とタイトルから、配信用の HTML 文書を生成する。
//!
//! テンプレートは `templates/newsletter.html` をバイナリに埋め込む。
//! テンプレート名が `.html` で終わるため、値はすべて HTML エスケープされる。
//! URL だけはエンコード済みの値を `safe` で出力する。

use std::sync::Arc;

use nicheshunter_domain::{
    clock::Clock,
    summary::{AppExample, NicheSummary},
};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::NewsletterError;

const TEMPLATE_NAME: &str = "newsletter.html";
const TEMPLATE: &str = include_str!("../../templates/newsletter.html");

/// 本文の日付表記（例: "Friday, October 16, 2026"）
const DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// カテゴリのアクセントカラー
///
/// 先頭から順に、カテゴリ名に部分一致（大文字小文字を区別しない）した色を使う。
const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("entertainment", "#9B59B6"),
    ("photo & video", "#E91E63"),
    ("social networking", "#3498DB"),
    ("productivity", "#27AE60"),
    ("finance", "#F39C12"),
    ("health & fitness", "#1ABC9C"),
    ("games", "#E74C3C"),
    ("lifestyle", "#FF6B6B"),
    ("education", "#5DADE2"),
    ("shopping", "#FF9F43"),
];

/// どのカテゴリにも一致しない場合の色
pub const DEFAULT_COLOR: &str = "#00CC6A";

/// カテゴリ名からアクセントカラーを決める
pub fn category_color(category: &str) -> &'static str {
    let category = category.to_lowercase();
    CATEGORY_COLORS
        .iter()
        .find(|(key, _)| category.contains(key))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// テンプレートに渡すニッチ 1 件分の表示データ
#[derive(Debug, Serialize)]
struct Card<'a> {
    color:           &'static str,
    score:           String,
    emoji:           &'a str,
    title:           &'a str,
    category:        &'a str,
    market_overview: &'a str,
    the_gap:         &'a str,
    actions_to_do:   &'a [String],
    app_examples:    &'a [AppExample],
    url:             String,
}

/// ニュースレター HTML レンダラー
pub struct NewsletterRenderer {
    tera:     Tera,
    site_url: String,
    clock:    Arc<dyn Clock>,
}

impl NewsletterRenderer {
    /// テンプレートを読み込んでレンダラーを作る
    ///
    /// `site_url` は末尾の `/` を除いて保持する。
    pub fn new(site_url: &str, clock: Arc<dyn Clock>) -> Result<Self, NewsletterError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![(TEMPLATE_NAME, TEMPLATE)])?;

        Ok(Self {
            tera,
            site_url: site_url.trim_end_matches('/').to_string(),
            clock,
        })
    }

    /// HTML 文書を生成する
    ///
    /// カードは `summaries` の順に並ぶ。同じ入力と同じ時刻からは同じ文書が得られる。
    pub fn render(&self, summaries: &[NicheSummary], title: &str) -> Result<String, NewsletterError> {
        let cards: Vec<Card<'_>> = summaries.iter().map(|s| self.card(s)).collect();

        let mut context = Context::new();
        context.insert("date", &self.clock.now().format(DATE_FORMAT).to_string());
        context.insert("title", title);
        context.insert("site_url", &self.site_url);
        context.insert("site_label", site_label(&self.site_url));
        context.insert("cards", &cards);

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// ニッチ詳細ページの URL
    pub fn niche_url(&self, display_code: &str) -> String {
        format!("{}/niches/{}", self.site_url, urlencoding::encode(display_code))
    }

    fn card<'a>(&self, summary: &'a NicheSummary) -> Card<'a> {
        Card {
            color:           category_color(&summary.category),
            score:           summary.score.to_string(),
            emoji:           &summary.emoji,
            title:           &summary.title,
            category:        &summary.category,
            market_overview: &summary.market_overview,
            the_gap:         &summary.the_gap,
            actions_to_do:   &summary.actions_to_do,
            app_examples:    &summary.app_examples,
            url:             self.niche_url(&summary.display_code),
        }
    }
}

/// フッターに表示するサイト名（スキームを除いた URL）
fn site_label(site_url: &str) -> &str {
    site_url
        .strip_prefix("https://")
        .or_else(|| site_url.strip_prefix("http://"))
        .unwrap_or(site_url)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use nicheshunter_domain::{clock::FixedClock, niche::Score};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn renderer() -> NewsletterRenderer {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap();
        NewsletterRenderer::new("https://nicheshunter.app/", Arc::new(FixedClock::new(now))).unwrap()
    }

    fn summary(title: &str, score: f64) -> NicheSummary {
        NicheSummary {
            title:           title.to_string(),
            emoji:           "🚀".to_string(),
            category:        "Productivity".to_string(),
            market_overview: format!("{title} overview"),
            the_gap:         format!("{title} gap"),
            actions_to_do:   vec!["Ship an MVP".to_string(), "Talk to users".to_string()],
            app_examples:    vec![AppExample {
                name:        "Notion".to_string(),
                description: "All-in-one workspace".to_string(),
                mrr:         "$5M".to_string(),
            }],
            display_code:    format!("NH-{title}"),
            score:           Score::new(score),
        }
    }

    #[test]
    fn test_同じ入力と時刻から同じ文書を生成する() {
        let sut = renderer();
        let summaries = vec![summary("Alpha", 80.0)];

        let first = sut.render(&summaries, "🚀 Alpha").unwrap();
        let second = sut.render(&summaries, "🚀 Alpha").unwrap();

        assert_eq!(first, second);
        assert!(first.contains("Friday, October 16, 2026"));
    }

    #[test]
    fn test_カードをサマリーの順に並べる() {
        let sut = renderer();

        let html = sut
            .render(&[summary("Alpha", 80.0), summary("Beta", 70.0)], "title")
            .unwrap();

        let alpha = html.find("Niche #1 • Score 80/100").unwrap();
        let beta = html.find("Niche #2 • Score 70/100").unwrap();
        assert!(alpha < beta);
        assert!(html.contains("Alpha overview"));
        assert!(html.contains("Talk to users"));
    }

    #[test]
    fn test_小数のスコアはそのまま表示する() {
        let html = renderer().render(&[summary("Alpha", 72.5)], "title").unwrap();

        assert!(html.contains("Score 72.5/100"));
    }

    #[test]
    fn test_値はhtmlエスケープされる() {
        let mut source = summary("Alpha", 80.0);
        source.market_overview = "<script>alert(1)</script>".to_string();

        let html = renderer().render(&[source], "A & B").unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A &amp; B"));
    }

    #[test]
    fn test_競合アプリがなければセクションを省く() {
        let mut source = summary("Alpha", 80.0);
        source.app_examples.clear();

        let html = renderer().render(&[source], "title").unwrap();

        assert!(!html.contains("Apps Already Doing This"));
    }

    #[test]
    fn test_競合アプリを表示する() {
        let html = renderer().render(&[summary("Alpha", 80.0)], "title").unwrap();

        assert!(html.contains("Apps Already Doing This"));
        assert!(html.contains("💰 $5M"));
    }

    #[test]
    fn test_詳細urlは表示コードをエンコードする() {
        let mut source = summary("Alpha", 80.0);
        source.display_code = "NH 42/b".to_string();

        let html = renderer().render(&[source], "title").unwrap();

        assert!(html.contains(r#"href="https://nicheshunter.app/niches/NH%2042%2Fb""#));
    }

    #[test]
    fn test_フッターにサイトurlを表示する() {
        let html = renderer().render(&[], "title").unwrap();

        assert!(html.contains(r#"href="https://nicheshunter.app""#));
        assert!(html.contains(">nicheshunter.app</a>"));
    }

    #[rstest]
    #[case("Entertainment", "#9B59B6")]
    #[case("Photo & Video", "#E91E63")]
    #[case("social networking", "#3498DB")]
    #[case("PRODUCTIVITY", "#27AE60")]
    #[case("Personal Finance", "#F39C12")]
    #[case("Health & Fitness", "#1ABC9C")]
    #[case("Games", "#E74C3C")]
    #[case("Lifestyle", "#FF6B6B")]
    #[case("Education", "#5DADE2")]
    #[case("Shopping", "#FF9F43")]
    #[case("Utilities", DEFAULT_COLOR)]
    #[case("", DEFAULT_COLOR)]
    fn test_カテゴリからアクセントカラーを決める(#[case] category: &str, #[case] expected: &str) {
        assert_eq!(category_color(category), expected);
    }

    #[test]
    fn test_複数に一致する場合は先に定義した色を使う() {
        assert_eq!(category_color("Entertainment Games"), "#9B59B6");
    }
}
