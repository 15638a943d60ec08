//! 料理分解モジュール
//!
//! 料理名（ポルトガル語）に含まれるキーワードから食材を検出し、
//! FODMAP重症度を集約する。
//!
//! ## 処理フロー
//! 1. 料理名を正規化
//! 2. キーワード表の各キーが料理名に含まれていれば、英語の同義語でインデックスを引く
//!    （完全一致 + キーの部分一致）
//! 3. 到達したレコードをIDで重複除去
//! 4. 0件 → なし / 1件 → 単一食材 / 2件以上 → 複数食材（最も重い重症度）

use crate::ingredient_index::IngredientIndex;
use crate::keywords::IngredientKeywordMap;
use crate::normalize::normalize;
use crate::types::{CompositeFodmapAnnotation, ForeignId, IngredientTag, NativeFoodRecord, Severity};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// 重症度の集約（high > low > free）。空なら None
pub fn aggregate_severity(levels: &[Severity]) -> Option<Severity> {
    Severity::most_severe(levels.iter().copied())
}

/// 料理名から食材を検出するタガー
#[derive(Debug, Clone, Copy)]
pub struct CompositeTagger<'i, 'a> {
    index: &'i IngredientIndex<'a>,
    keywords: &'i IngredientKeywordMap,
}

impl<'i, 'a> CompositeTagger<'i, 'a> {
    pub fn new(index: &'i IngredientIndex<'a>, keywords: &'i IngredientKeywordMap) -> Self {
        Self { index, keywords }
    }

    /// 1品の料理を分解する
    pub fn tag_dish(&self, dish: &NativeFoodRecord) -> Option<CompositeFodmapAnnotation<'a>> {
        let tags = self.detect(&normalize(&dish.name));
        build_annotation(tags)
    }

    /// 全料理を分解する（入力と同じ順序）
    pub fn tag_all(
        &self,
        dishes: &[NativeFoodRecord],
        parallel: bool,
    ) -> Vec<Option<CompositeFodmapAnnotation<'a>>> {
        let annotations: Vec<_> = if parallel {
            dishes.par_iter().map(|dish| self.tag_dish(dish)).collect()
        } else {
            dishes.iter().map(|dish| self.tag_dish(dish)).collect()
        };

        let stats = CompositeStats::from_annotations(&annotations);
        tracing::info!(
            dishes = stats.total_dishes,
            single = stats.single_ingredient,
            multiple = stats.multiple_ingredients,
            untagged = stats.untagged,
            "composite pass finished"
        );

        annotations
    }

    /// 正規化済みの料理名から食材タグを検出する（発見順・重複なし）
    pub fn detect(&self, normalized_dish: &str) -> Vec<IngredientTag<'a>> {
        let mut tags = Vec::new();
        if normalized_dish.is_empty() {
            return tags;
        }

        let mut seen: HashSet<ForeignId> = HashSet::new();

        for (native_keyword, equivalents) in self.keywords.iter() {
            if !normalized_dish.contains(native_keyword) {
                continue;
            }

            for equivalent in equivalents {
                let exact = self.index.lookup(equivalent).iter().copied();
                let partial = self
                    .index
                    .containing(equivalent)
                    .flat_map(|(_, ids)| ids.iter().copied());

                for id in exact.chain(partial) {
                    if !seen.insert(id) {
                        continue;
                    }
                    if let Some(record) = self.index.record(id) {
                        tags.push(IngredientTag {
                            keyword: native_keyword.to_string(),
                            ingredient_id: id,
                            ingredient: record,
                            severity: record.severity,
                        });
                    }
                }
            }
        }

        tags
    }
}

/// タグ列から注記を組み立てる
pub fn build_annotation(mut tags: Vec<IngredientTag<'_>>) -> Option<CompositeFodmapAnnotation<'_>> {
    match tags.len() {
        0 => None,
        1 => tags.pop().map(CompositeFodmapAnnotation::Single),
        _ => {
            let levels: Vec<Severity> = tags.iter().map(|t| t.severity).collect();
            let severity = aggregate_severity(&levels)?;
            Some(CompositeFodmapAnnotation::Multiple {
                ingredients: tags,
                severity,
            })
        }
    }
}

/// 分解パスの統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositeStats {
    pub total_dishes: usize,
    pub single_ingredient: usize,
    pub multiple_ingredients: usize,
    pub untagged: usize,
}

impl CompositeStats {
    pub fn from_annotations(annotations: &[Option<CompositeFodmapAnnotation<'_>>]) -> Self {
        let mut stats = Self {
            total_dishes: annotations.len(),
            ..Default::default()
        };
        for annotation in annotations {
            match annotation {
                None => stats.untagged += 1,
                Some(a) if a.is_multiple() => stats.multiple_ingredients += 1,
                Some(_) => stats.single_ingredient += 1,
            }
        }
        stats
    }
}
