use food_link_common::{
    CompositeFodmapAnnotation, ForeignCategory, ForeignIngredientRecord, IngredientTag,
    MatchResult, MatchType, NativeFoodRecord, Severity,
};
use serde::{Deserialize, Serialize};

pub const DATABASE_NAME: &str = "Unified Portuguese Nutritional and FODMAP Database";
pub const DATABASE_VERSION: &str = "1.0";

/// 複数食材の注記に付ける補足
pub const MULTIPLE_INGREDIENTS_NOTE: &str =
    "Multiple ingredients detected - check individual ingredients below";

/// 統合エントリの出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// 栄養成分表の食品（FODMAP情報は任意）
    NutritionalTable,
    /// どの食品にも照合されなかったFODMAPレコード
    FodmapOnly,
}

/// 統合データベースの1エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEntry {
    pub id: String,
    pub name: String,
    pub source: EntrySource,
    pub category_level_1: Option<String>,
    pub category_level_2: Option<String>,
    pub category_level_3: Option<String>,
    pub fodmap: Option<FodmapInfo>,
    /// 栄養値（栄養成分表のエントリのみ）
    pub nutrition: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UnifiedEntry {
    pub fn from_native(record: &NativeFoodRecord, fodmap: Option<FodmapInfo>) -> Self {
        Self {
            id: record.code.clone(),
            name: record.name.clone(),
            source: EntrySource::NutritionalTable,
            category_level_1: record.category_level_1.clone(),
            category_level_2: record.category_level_2.clone(),
            category_level_3: record.category_level_3.clone(),
            fodmap,
            nutrition: Some(record.nutrition.clone()),
        }
    }

    /// `FODMAP_n` 形式のIDで単独エントリを作る
    pub fn fodmap_only(sequence: usize, record: &ForeignIngredientRecord) -> Self {
        Self {
            id: format!("FODMAP_{}", sequence),
            name: record.name.clone(),
            source: EntrySource::FodmapOnly,
            category_level_1: None,
            category_level_2: None,
            category_level_3: None,
            fodmap: Some(FodmapInfo::fodmap_only(record)),
            nutrition: None,
        }
    }

    pub fn has_multiple_ingredients(&self) -> bool {
        matches!(
            self.fodmap.as_ref().map(|f| &f.search_information),
            Some(SearchInformation::MultipleIngredients { .. })
        )
    }
}

/// エントリに付くFODMAP情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FodmapInfo {
    pub level: Severity,
    pub portion_note: Option<String>,
    pub additional_notes: Option<String>,
    pub search_information: SearchInformation,
}

impl FodmapInfo {
    /// 照合パスの結果から
    pub fn from_match(result: &MatchResult<'_>) -> Self {
        let foreign = result.foreign;
        let category = foreign.category;
        let name_english = foreign.name.clone();
        let match_score = result.score;

        let search_information = match result.match_type {
            MatchType::Dictionary => SearchInformation::Dictionary {
                category,
                name_english,
                match_score,
            },
            MatchType::DictionaryPartial => SearchInformation::DictionaryPartial {
                category,
                name_english,
                match_score,
            },
            MatchType::Similarity => SearchInformation::Similarity {
                category,
                name_english,
                match_score,
            },
        };

        Self {
            level: foreign.severity,
            portion_note: foreign.portion_note.clone(),
            additional_notes: foreign.additional_notes.clone(),
            search_information,
        }
    }

    /// 料理分解の結果から
    pub fn from_annotation(annotation: &CompositeFodmapAnnotation<'_>) -> Self {
        match annotation {
            CompositeFodmapAnnotation::Single(tag) => {
                let ingredient = tag.ingredient;
                Self {
                    level: tag.severity,
                    portion_note: ingredient.portion_note.clone(),
                    additional_notes: ingredient.additional_notes.clone(),
                    search_information: SearchInformation::SingleIngredient {
                        category: ingredient.category,
                        name_english: ingredient.name.clone(),
                        detected_keyword: tag.keyword.clone(),
                    },
                }
            }
            CompositeFodmapAnnotation::Multiple {
                ingredients,
                severity,
            } => Self {
                level: *severity,
                portion_note: annotation.note(),
                additional_notes: Some(MULTIPLE_INGREDIENTS_NOTE.to_string()),
                search_information: SearchInformation::MultipleIngredients {
                    total_ingredients: ingredients.len(),
                    ingredients: ingredients.iter().map(IngredientSummary::from).collect(),
                },
            },
        }
    }

    pub fn fodmap_only(record: &ForeignIngredientRecord) -> Self {
        Self {
            level: record.severity,
            portion_note: record.portion_note.clone(),
            additional_notes: record.additional_notes.clone(),
            search_information: SearchInformation::FodmapOnly {
                category: record.category,
                name_english: record.name.clone(),
            },
        }
    }
}

/// FODMAP情報の由来
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "match_type", rename_all = "snake_case")]
pub enum SearchInformation {
    Dictionary {
        category: ForeignCategory,
        name_english: String,
        match_score: f64,
    },
    DictionaryPartial {
        category: ForeignCategory,
        name_english: String,
        match_score: f64,
    },
    Similarity {
        category: ForeignCategory,
        name_english: String,
        match_score: f64,
    },
    SingleIngredient {
        category: ForeignCategory,
        name_english: String,
        detected_keyword: String,
    },
    MultipleIngredients {
        total_ingredients: usize,
        ingredients: Vec<IngredientSummary>,
    },
    FodmapOnly {
        category: ForeignCategory,
        name_english: String,
    },
}

/// 複数食材エントリ内の1食材
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub portuguese_keyword: String,
    pub name_english: String,
    pub level: Severity,
    pub portion_note: Option<String>,
    pub category: ForeignCategory,
}

impl From<&IngredientTag<'_>> for IngredientSummary {
    fn from(tag: &IngredientTag<'_>) -> Self {
        Self {
            portuguese_keyword: tag.keyword.clone(),
            name_english: tag.ingredient.name.clone(),
            level: tag.severity,
            portion_note: tag.ingredient.portion_note.clone(),
            category: tag.ingredient.category,
        }
    }
}

/// 重症度ごとの件数（none = FODMAP情報なし）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FodmapDistribution {
    pub high: usize,
    pub low: usize,
    pub free: usize,
    pub none: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub database_name: String,
    pub version: String,
    pub creation_date: String,
    pub total_foods: usize,
    pub foods_with_nutritional_data: usize,
    pub foods_with_fodmap_data: usize,
    pub foods_with_complete_data: usize,
    pub foods_fodmap_only: usize,
    pub foods_with_multiple_ingredients: usize,
    pub fodmap_distribution: FodmapDistribution,
}

impl DatabaseMetadata {
    pub fn from_entries(entries: &[UnifiedEntry], creation_date: impl Into<String>) -> Self {
        let mut metadata = Self {
            database_name: DATABASE_NAME.to_string(),
            version: DATABASE_VERSION.to_string(),
            creation_date: creation_date.into(),
            total_foods: entries.len(),
            foods_with_nutritional_data: 0,
            foods_with_fodmap_data: 0,
            foods_with_complete_data: 0,
            foods_fodmap_only: 0,
            foods_with_multiple_ingredients: 0,
            fodmap_distribution: FodmapDistribution::default(),
        };

        for entry in entries {
            let from_table = entry.source == EntrySource::NutritionalTable;
            if from_table {
                metadata.foods_with_nutritional_data += 1;
            } else {
                metadata.foods_fodmap_only += 1;
            }

            if entry.has_multiple_ingredients() {
                metadata.foods_with_multiple_ingredients += 1;
            }

            match entry.fodmap.as_ref().map(|f| f.level) {
                Some(level) => {
                    metadata.foods_with_fodmap_data += 1;
                    if from_table {
                        metadata.foods_with_complete_data += 1;
                    }
                    match level {
                        Severity::High => metadata.fodmap_distribution.high += 1,
                        Severity::Low => metadata.fodmap_distribution.low += 1,
                        Severity::Free => metadata.fodmap_distribution.free += 1,
                    }
                }
                None => metadata.fodmap_distribution.none += 1,
            }
        }

        metadata
    }
}

/// 統合データベース（出力JSONの形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedDatabase {
    pub metadata: DatabaseMetadata,
    pub foods: Vec<UnifiedEntry>,
}
