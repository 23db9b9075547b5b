//! # JSON サブフィールドの解釈
//!
//! ニッチの `stats` / `market_analysis` / `trending` は、カラム型によって
//! 構造化済みの JSON（jsonb）で届くこともあれば、JSON 文字列（text）で
//! 届くこともある。どちらの形でも同じ型に落とし込むためのヘルパーを提供する。

use serde::de::DeserializeOwned;
use serde_json::Value;

/// 文字列または構造化済みの JSON 値を `T` に変換する
///
/// - `None` / `null` → `fallback`
/// - 文字列 → JSON としてパースし、失敗したら `fallback`
/// - それ以外 → そのまま `T` として解釈し、型が合わなければ `fallback`
///
/// どの経路でもパニックやエラーは発生しない。
///
/// ```
/// use nicheshunter_domain::json::decode_or_default;
/// use serde_json::{Value, json};
///
/// let raw = json!("[1, 2]");
/// let decoded: Vec<Value> = decode_or_default(Some(&raw), Vec::new());
/// assert_eq!(decoded.len(), 2);
///
/// let broken = json!("{not json");
/// let decoded: Vec<Value> = decode_or_default(Some(&broken), Vec::new());
/// assert!(decoded.is_empty());
/// ```
pub fn decode_or_default<T: DeserializeOwned>(raw: Option<&Value>, fallback: T) -> T {
    match raw {
        None | Some(Value::Null) => fallback,
        Some(Value::String(text)) => serde_json::from_str(text).unwrap_or(fallback),
        Some(value) => T::deserialize(value).unwrap_or(fallback),
    }
}

/// JSON オブジェクトからテキストとして表示できる値を取り出す
///
/// 文字列はそのまま、数値・真偽値は文字列化して返す。
/// 空文字列・null・配列・オブジェクトは `None` とする。
pub fn text_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    use super::*;

    #[test]
    fn test_構造化済みの値はそのまま通す() {
        let raw = json!({"revenue": "$10k"});

        let decoded: Map<String, Value> = decode_or_default(Some(&raw), Map::new());

        assert_eq!(decoded.get("revenue"), Some(&json!("$10k")));
    }

    #[test]
    fn test_json文字列はパースする() {
        let raw = json!(r#"[{"name": "Calm"}]"#);

        let decoded: Vec<Value> = decode_or_default(Some(&raw), Vec::new());

        assert_eq!(decoded, vec![json!({"name": "Calm"})]);
    }

    #[test]
    fn test_パースできない文字列はfallbackを返す() {
        let raw = json!("not json at all");

        let decoded: Map<String, Value> = decode_or_default(Some(&raw), Map::new());

        assert!(decoded.is_empty());
    }

    #[test]
    fn test_nullと欠落はfallbackを返す() {
        let decoded: Vec<Value> = decode_or_default(Some(&Value::Null), Vec::new());
        assert!(decoded.is_empty());

        let decoded: Vec<Value> = decode_or_default(None, vec![json!(1)]);
        assert_eq!(decoded, vec![json!(1)]);
    }

    #[test]
    fn test_型が合わない構造化値はfallbackを返す() {
        let raw = json!({"name": "not an array"});

        let decoded: Vec<Value> = decode_or_default(Some(&raw), Vec::new());

        assert!(decoded.is_empty());
    }

    #[test]
    fn test_text_fieldは文字列と数値を取り出す() {
        let object = json!({"mrr": "$5k", "downloads": 1200, "empty": "  ", "list": [1]});

        assert_eq!(text_field(&object, "mrr"), Some("$5k".to_string()));
        assert_eq!(text_field(&object, "downloads"), Some("1200".to_string()));
        assert_eq!(text_field(&object, "empty"), None);
        assert_eq!(text_field(&object, "list"), None);
        assert_eq!(text_field(&object, "missing"), None);
    }
}
