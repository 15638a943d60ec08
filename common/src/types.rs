//! レコード型定義
//!
//! 2つのカタログとエンジン出力で共有される型:
//! - NativeFoodRecord: 栄養成分表（ポルトガル語）の1食品
//! - ForeignIngredientRecord: FODMAPリスト（英語）の1食品
//! - MatchResult: 照合パスの出力（1対1）
//! - CompositeFodmapAnnotation: 料理分解の出力（1対多）

use crate::normalize::normalize;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// FODMAP重症度（制限の強さ順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Free,
    Low,
    High,
}

impl Severity {
    /// 最も重い重症度を返す（high > low > free）
    pub fn most_severe<I>(levels: I) -> Option<Severity>
    where
        I: IntoIterator<Item = Severity>,
    {
        levels.into_iter().max()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Free => "free",
            Severity::Low => "low",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Severity::Free),
            "low" => Ok(Severity::Low),
            "high" => Ok(Severity::High),
            _ => Err(format!("Unknown severity: {}. Use high, low, or free", s)),
        }
    }
}

/// FODMAPリストの大分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignCategory {
    #[serde(rename = "Vegetables and Legumes")]
    Vegetables,
    #[serde(rename = "Fruit")]
    Fruit,
    #[serde(rename = "Meats, Poultry and Meat Substitutes")]
    Meats,
    #[serde(rename = "Fish and Seafood")]
    Seafood,
    #[serde(
        rename = "Cereals, Grains, Breads, Biscuits, Pasta, Nuts and Cakes",
        alias = "Cereals, Grains, Breads, Biscuits/Cookies, Pasta, Nuts and Cakes"
    )]
    Cereals,
    #[serde(rename = "Condiments, Dips, Sweets, Sweeteners and Spreads")]
    Condiments,
    #[serde(rename = "Prebiotic Foods")]
    Prebiotic,
    #[serde(rename = "Drinks and Protein Powders")]
    Drinks,
    #[serde(rename = "Dairy Foods and Eggs", alias = "Dairy Foods")]
    Dairy,
    #[serde(rename = "Cooking ingredients")]
    CookingIngredients,
}

/// 栄養成分表の食品レコード（読み取り専用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeFoodRecord {
    /// 食品コード（数値でも文字列として保持）
    #[serde(deserialize_with = "code_from_any")]
    pub code: String,

    /// 食品名（「主名, バリエーション」形式の場合あり）
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category_level_1: Option<String>,

    #[serde(default)]
    pub category_level_2: Option<String>,

    #[serde(default)]
    pub category_level_3: Option<String>,

    /// 栄養値（エンジンでは解釈しない）
    #[serde(flatten)]
    pub nutrition: serde_json::Map<String, serde_json::Value>,
}

impl NativeFoodRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category_level_1: None,
            category_level_2: None,
            category_level_3: None,
            nutrition: serde_json::Map::new(),
        }
    }

    /// 最初のカンマより前の主名
    pub fn primary_name(&self) -> &str {
        self.name.split(',').next().unwrap_or("").trim()
    }
}

fn code_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "code must be a string or number, got {}",
            other
        ))),
    }
}

/// FODMAPリストの食品レコード（読み取り専用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignIngredientRecord {
    pub name: String,

    pub category: ForeignCategory,

    #[serde(rename = "fodmap_level", alias = "severity")]
    pub severity: Severity,

    /// 摂取量の目安
    #[serde(default)]
    pub portion_note: Option<String>,

    #[serde(default)]
    pub additional_notes: Option<String>,

    /// 正規化済みの名前（nameから導出）
    #[serde(default)]
    pub normalized_name: String,
}

impl ForeignIngredientRecord {
    pub fn new(name: impl Into<String>, category: ForeignCategory, severity: Severity) -> Self {
        let name = name.into();
        let normalized_name = normalize(&name);
        Self {
            name,
            category,
            severity,
            portion_note: None,
            additional_notes: None,
            normalized_name,
        }
    }

    pub fn with_portion_note(mut self, note: impl Into<String>) -> Self {
        self.portion_note = Some(note.into());
        self
    }

    /// 読み込み後に正規化名を再計算する
    pub fn refresh_normalized(&mut self) {
        self.normalized_name = normalize(&self.name);
    }
}

/// FODMAPカタログ内の位置（レコードの同一性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForeignId(pub usize);

impl fmt::Display for ForeignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 照合方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// 辞書訳語が部分文字列として一致
    Dictionary,
    /// 辞書訳語との類似度一致
    DictionaryPartial,
    /// 名前同士の直接類似度
    Similarity,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Dictionary => "dictionary",
            MatchType::DictionaryPartial => "dictionary_partial",
            MatchType::Similarity => "similarity",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 照合結果（スコアは常に受理閾値を超える）
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub foreign_id: ForeignId,
    pub foreign: &'a ForeignIngredientRecord,
    pub native: &'a NativeFoodRecord,
    pub score: f64,
    pub match_type: MatchType,
}

/// 料理名から検出された食材
#[derive(Debug, Clone, Serialize)]
pub struct IngredientTag<'a> {
    /// 料理名中で見つかったポルトガル語キーワード
    pub keyword: String,
    pub ingredient_id: ForeignId,
    pub ingredient: &'a ForeignIngredientRecord,
    /// 検出時点の重症度
    pub severity: Severity,
}

/// 料理のFODMAP注記
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "match_type")]
pub enum CompositeFodmapAnnotation<'a> {
    #[serde(rename = "single_ingredient")]
    Single(IngredientTag<'a>),
    #[serde(rename = "multiple_ingredients")]
    Multiple {
        ingredients: Vec<IngredientTag<'a>>,
        severity: Severity,
    },
}

impl<'a> CompositeFodmapAnnotation<'a> {
    pub fn severity(&self) -> Severity {
        match self {
            CompositeFodmapAnnotation::Single(tag) => tag.severity,
            CompositeFodmapAnnotation::Multiple { severity, .. } => *severity,
        }
    }

    /// 表示用の注記。複数食材の場合は件数の文になる
    pub fn note(&self) -> Option<String> {
        match self {
            CompositeFodmapAnnotation::Single(tag) => tag.ingredient.portion_note.clone(),
            CompositeFodmapAnnotation::Multiple { ingredients, .. } => {
                Some(format!("Contains {} FODMAP ingredients", ingredients.len()))
            }
        }
    }

    pub fn ingredients(&self) -> &[IngredientTag<'a>] {
        match self {
            CompositeFodmapAnnotation::Single(tag) => std::slice::from_ref(tag),
            CompositeFodmapAnnotation::Multiple { ingredients, .. } => ingredients,
        }
    }

    pub fn len(&self) -> usize {
        self.ingredients().len()
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, CompositeFodmapAnnotation::Multiple { .. })
    }
}
