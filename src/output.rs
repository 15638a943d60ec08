//! 出力ドキュメント（match / tag コマンド）

use crate::error::Result;
use crate::merger::IngredientSummary;
use food_link_common::{
    CompositeFodmapAnnotation, CompositeStats, ForeignCategory, ForeignIngredientRecord,
    MatchResult, MatchStats, MatchType, NativeFoodRecord, Severity,
};
use serde::Serialize;
use std::path::Path;

/// 出力するスコアの小数桁
const SCORE_DECIMALS: i32 = 3;

fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}

#[derive(Debug, Clone, Serialize)]
pub struct EquivalenceMetadata {
    pub total_fodmap_foods: usize,
    pub total_portuguese_foods: usize,
    pub total_matches: usize,
    pub dictionary_matches: usize,
    pub dictionary_partial_matches: usize,
    pub similarity_matches: usize,
    pub unmatched: usize,
    /// 照合率（%、小数1桁）
    pub match_rate: String,
}

/// 1件の対応関係
#[derive(Debug, Clone, Serialize)]
pub struct Equivalence {
    pub fodmap_name: String,
    pub fodmap_normalized: String,
    pub fodmap_level: Severity,
    pub fodmap_category: ForeignCategory,
    pub fodmap_portion_note: Option<String>,
    pub portuguese_name: String,
    pub portuguese_code: String,
    pub portuguese_category: Option<String>,
    pub match_score: f64,
    pub match_type: MatchType,
}

impl From<&MatchResult<'_>> for Equivalence {
    fn from(result: &MatchResult<'_>) -> Self {
        let foreign = result.foreign;
        let native = result.native;
        Self {
            fodmap_name: foreign.name.clone(),
            fodmap_normalized: foreign.normalized_name.clone(),
            fodmap_level: foreign.severity,
            fodmap_category: foreign.category,
            fodmap_portion_note: foreign.portion_note.clone(),
            portuguese_name: native.name.clone(),
            portuguese_code: native.code.clone(),
            portuguese_category: native.category_level_1.clone(),
            match_score: round_score(result.score),
            match_type: result.match_type,
        }
    }
}

/// `match` コマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct EquivalencesDocument {
    pub metadata: EquivalenceMetadata,
    pub matches: Vec<Equivalence>,
}

impl EquivalencesDocument {
    pub fn new(
        foreign: &[ForeignIngredientRecord],
        native: &[NativeFoodRecord],
        results: &[MatchResult<'_>],
    ) -> Self {
        let stats = MatchStats::from_results(foreign.len(), results);
        Self {
            metadata: EquivalenceMetadata {
                total_fodmap_foods: stats.total_foreign,
                total_portuguese_foods: native.len(),
                total_matches: stats.matched,
                dictionary_matches: stats.dictionary,
                dictionary_partial_matches: stats.dictionary_partial,
                similarity_matches: stats.similarity,
                unmatched: stats.unmatched,
                match_rate: format!("{:.1}%", stats.match_rate()),
            },
            matches: results.iter().map(Equivalence::from).collect(),
        }
    }
}

/// 分解された料理
#[derive(Debug, Clone, Serialize)]
pub struct TaggedDish {
    pub code: String,
    pub name: String,
    pub level: Severity,
    pub note: Option<String>,
    pub multiple: bool,
    pub ingredients: Vec<IngredientSummary>,
}

impl TaggedDish {
    pub fn new(dish: &NativeFoodRecord, annotation: &CompositeFodmapAnnotation<'_>) -> Self {
        Self {
            code: dish.code.clone(),
            name: dish.name.clone(),
            level: annotation.severity(),
            note: annotation.note(),
            multiple: annotation.is_multiple(),
            ingredients: annotation
                .ingredients()
                .iter()
                .map(IngredientSummary::from)
                .collect(),
        }
    }
}

/// `tag` コマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct TaggingDocument {
    pub metadata: CompositeStats,
    pub dishes: Vec<TaggedDish>,
}

impl TaggingDocument {
    /// 注記のある料理だけを収める（`only_multiple` なら複数食材のみ）
    pub fn new(
        native: &[NativeFoodRecord],
        annotations: &[Option<CompositeFodmapAnnotation<'_>>],
        only_multiple: bool,
    ) -> Self {
        let dishes = native
            .iter()
            .zip(annotations)
            .filter_map(|(dish, annotation)| annotation.as_ref().map(|a| (dish, a)))
            .filter(|(_, annotation)| !only_multiple || annotation.is_multiple())
            .map(|(dish, annotation)| TaggedDish::new(dish, annotation))
            .collect();

        Self {
            metadata: CompositeStats::from_annotations(annotations),
            dishes,
        }
    }
}

/// 整形済みJSONで書き出す（親ディレクトリも作成）
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
