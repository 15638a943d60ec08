//! 対訳辞書モジュール
//!
//! 英語キーワード → ポルトガル語キーワードの静的テーブル。
//! キー・値とも正規化して保持する。

use crate::error::{Error, Result};
use crate::normalize::normalize;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_TRANSLATIONS: &str = include_str!("../data/translations.json");

/// 英語 → ポルトガル語の対訳辞書
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationIndex {
    entries: HashMap<String, String>,
}

impl TranslationIndex {
    /// 組み込みの対訳辞書
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TRANSLATIONS)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let index = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), entries = index.len(), "translation table loaded");
        Ok(index)
    }

    /// JSON文字列（`{"garlic": "alho", ...}`）から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut pairs: Vec<(String, String)> = raw.into_iter().collect();
        // 衝突エラーのメッセージを安定させる
        pairs.sort();
        Self::from_pairs(pairs)
    }

    /// キーと値の組から構築（検証付き）
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: HashMap<String, String> = HashMap::new();
        let mut raw_keys: HashMap<String, String> = HashMap::new();

        for (raw_key, raw_value) in pairs {
            let (raw_key, raw_value) = (raw_key.as_ref(), raw_value.as_ref());
            let key = normalize(raw_key);
            let value = normalize(raw_value);

            if key.is_empty() {
                return Err(Error::Table(format!(
                    "translation key '{}' is empty after normalization",
                    raw_key
                )));
            }
            if value.is_empty() {
                return Err(Error::Table(format!(
                    "translation for '{}' is empty after normalization",
                    raw_key
                )));
            }

            if let Some(existing) = entries.get(&key) {
                if existing != &value {
                    let first = raw_keys.get(&key).map(String::as_str).unwrap_or("");
                    return Err(Error::Table(format!(
                        "keys '{}' and '{}' both normalize to '{}' with different translations ('{}' / '{}')",
                        first, raw_key, key, existing, value
                    )));
                }
                continue;
            }

            raw_keys.insert(key.clone(), raw_key.to_string());
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// 辞書をマージ（後から追加した訳語が優先）
    pub fn merge(&mut self, other: &TranslationIndex) {
        self.entries.extend(other.entries.clone());
    }

    /// 正規化済みキーワードの訳語
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let index = TranslationIndex::builtin().unwrap();
        assert!(index.len() > 300);
        assert_eq!(index.get("garlic"), Some("alho"));
        // 値も正規化される
        assert_eq!(index.get("leek"), Some("alho frances"));
        assert_eq!(index.get("apple"), Some("maca"));
    }

    #[test]
    fn test_keys_are_normalized() {
        let index = TranslationIndex::from_pairs([("Semi-Skimmed", "Leite meio-gordo")]).unwrap();
        assert_eq!(index.get("semi skimmed"), Some("leite meio gordo"));
        assert_eq!(index.get("Semi-Skimmed"), None);
    }

    #[test]
    fn test_from_json() {
        let index = TranslationIndex::from_json(r#"{"garlic": "alho", "onion": "cebola"}"#).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("onion"), Some("cebola"));
        assert_eq!(index.get("tomato"), None);
    }

    #[test]
    fn test_empty_value_rejected() {
        let err = TranslationIndex::from_pairs([("garlic", "(nada)")]).unwrap_err();
        assert!(matches!(err, Error::Table(_)));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = TranslationIndex::from_pairs([(" - ", "alho")]).unwrap_err();
        assert!(matches!(err, Error::Table(_)));
    }

    #[test]
    fn test_collision_rejected() {
        let err = TranslationIndex::from_pairs([("Pepper", "pimento"), ("pepper", "pimenta")])
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pepper"));
        assert!(message.contains("pimento"));
    }

    #[test]
    fn test_same_translation_is_not_a_collision() {
        let index = TranslationIndex::from_pairs([("Onion", "cebola"), ("onion", "Cebola")]).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        let err = TranslationIndex::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = TranslationIndex::from_pairs([("pepper", "pimento")]).unwrap();
        let custom = TranslationIndex::from_pairs([("pepper", "pimenta"), ("yam", "inhame")]).unwrap();
        base.merge(&custom);
        assert_eq!(base.get("pepper"), Some("pimenta"));
        assert_eq!(base.len(), 2);
    }
}
