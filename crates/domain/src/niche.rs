//! # ニッチ
//!
//! 外部ストアに保存された市場機会分析レコード。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Niche`] | ニッチ | スコア・分析テキスト・構造化サブデータを持つ市場機会 |
//! | [`Score`] | スコア | 0〜100 の評価値。メールでは `Score N/100` と表示 |
//! | [`TrendingApp`] | 競合アプリ | ニッチ内で既に収益を上げているアプリ |
//!
//! ニッチは読み取り専用で、このシステムが更新することはない。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json::{decode_or_default, text_field};

/// ニッチのスコア
///
/// 整数値は小数点なし（`80`）、それ以外はそのままの小数表記（`72.5`）で表示する。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// ニッチ（市場機会分析レコード）
///
/// `stats` / `market_analysis` / `trending` は文字列か構造化済み JSON の
/// どちらで届いてもよいよう、生の [`Value`] のまま保持する。
/// 解釈は [`Niche::stats`] などのアクセサで行う。
#[derive(Debug, Clone, PartialEq)]
pub struct Niche {
    pub id:               String,
    pub title:            String,
    pub category:         String,
    pub tags:             Vec<String>,
    pub score:            Score,
    /// 機会の説明
    pub opportunity:      String,
    /// 既存ソリューションの穴
    pub gap:              String,
    /// 推奨アクション
    pub recommended_move: String,
    pub stats:            Option<Value>,
    pub market_analysis:  Option<Value>,
    pub key_learnings:    Vec<String>,
    pub trending:         Option<Value>,
    /// 公開ページへのディープリンクに使う表示コード
    pub display_code:     String,
    pub created_at:       DateTime<Utc>,
}

impl Niche {
    /// 市場統計（revenue, competition, timeToMVP など）
    pub fn stats(&self) -> Map<String, Value> {
        decode_or_default(self.stats.as_ref(), Map::new())
    }

    /// 市場分析（totalMarketSize, growthRate, targetAudience など）
    pub fn market_analysis(&self) -> Map<String, Value> {
        decode_or_default(self.market_analysis.as_ref(), Map::new())
    }

    /// 競合アプリ一覧
    ///
    /// オブジェクトでない要素は読み飛ばす。
    pub fn trending_apps(&self) -> Vec<TrendingApp> {
        let entries: Vec<Value> = decode_or_default(self.trending.as_ref(), Vec::new());
        entries
            .iter()
            .filter(|entry| entry.is_object())
            .map(TrendingApp::from_json)
            .collect()
    }
}

/// 競合アプリ
///
/// 元データの欠落はそのまま `None` で表す。
/// 表示用のプレースホルダへの置き換えはサマリー生成時に行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingApp {
    pub name:          Option<String>,
    pub description:   Option<String>,
    pub estimated_mrr: Option<String>,
}

impl TrendingApp {
    fn from_json(entry: &Value) -> Self {
        Self {
            name:          text_field(entry, "name"),
            description:   text_field(entry, "description"),
            estimated_mrr: text_field(entry, "estimatedMRR"),
        }
    }
}
