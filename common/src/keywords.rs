//! 食材キーワード表
//!
//! ポルトガル語のキーワード（料理名の一部）→ 同じ食材を表す英語キーワード群。
//! 走査順を固定するため BTreeMap で保持する。

use crate::error::{Error, Result};
use crate::normalize::normalize;
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_KEYWORDS: &str = include_str!("../data/ingredient_keywords.json");

/// ポルトガル語キーワード → 英語キーワード群
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientKeywordMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl IngredientKeywordMap {
    /// 組み込みのキーワード表
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_KEYWORDS)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let map = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), entries = map.len(), "keyword table loaded");
        Ok(map)
    }

    /// JSON文字列（`{"alho": ["garlic"], ...}`）から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    /// エントリから構築（検証付き）。同じキーに正規化された値は結合する
    pub fn from_entries<I, K, V, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (raw_key, raw_values) in entries {
            let raw_key = raw_key.as_ref();
            let key = normalize(raw_key);
            if key.is_empty() {
                return Err(Error::Table(format!(
                    "ingredient keyword '{}' is empty after normalization",
                    raw_key
                )));
            }

            let mut values = Vec::new();
            for raw_value in raw_values {
                let value = normalize(raw_value.as_ref());
                if value.is_empty() {
                    return Err(Error::Table(format!(
                        "ingredient keyword '{}' has an empty equivalent",
                        raw_key
                    )));
                }
                values.push(value);
            }
            if values.is_empty() {
                return Err(Error::Table(format!(
                    "ingredient keyword '{}' has no equivalents",
                    raw_key
                )));
            }

            let slot = map.entry(key).or_default();
            for value in values {
                if !slot.contains(&value) {
                    slot.push(value);
                }
            }
        }

        Ok(Self { entries: map })
    }

    /// 表をマージ（同じキーは後から追加した値で置き換え）
    pub fn merge(&mut self, other: &IngredientKeywordMap) {
        self.entries.extend(other.entries.clone());
    }

    pub fn get(&self, native_keyword: &str) -> Option<&[String]> {
        self.entries.get(native_keyword).map(Vec::as_slice)
    }

    /// キー順に走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
