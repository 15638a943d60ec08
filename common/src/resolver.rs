//! 照合モジュール（FODMAP → 栄養成分表）
//!
//! 各FODMAPレコードについて、最もよく一致する栄養成分表レコードを1件選ぶ。
//!
//! ## 処理フロー
//! 1. 辞書フェーズ: 名前の各単語を対訳辞書で訳し、主名と部分一致・類似度で比較
//! 2. 補完フェーズ: 辞書フェーズの最高点が 0.7 未満のときだけ、名前同士の類似度で比較
//! 3. 最高点が 0.7 を超えた場合のみ結果を出す
//!
//! レコード間に依存はないため、rayon で並列に処理できる。

use crate::normalize::{keywords, normalize_primary};
use crate::similarity::ratio;
use crate::translation::TranslationIndex;
use crate::types::{ForeignId, ForeignIngredientRecord, MatchResult, MatchType, NativeFoodRecord};
use rayon::prelude::*;
use serde::Serialize;

/// 受理閾値（これを超えたスコアのみ結果になる）
pub const ACCEPT_THRESHOLD: f64 = 0.7;
/// 訳語との類似度一致の閾値
pub const PARTIAL_THRESHOLD: f64 = 0.85;
/// 補完フェーズの類似度閾値
pub const SIMILARITY_THRESHOLD: f64 = 0.8;
/// 類似度比較を行う訳語の最小文字数（これより長い訳語のみ）
pub const MIN_PARTIAL_LEN: usize = 3;

/// 照合オプション
#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// レコード単位で並列処理する
    pub parallel: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// 照合候補
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// 栄養成分表内の位置
    pub native_index: usize,
    pub score: f64,
    pub match_type: MatchType,
}

/// 候補の畳み込み。スコアが厳密に上回ったときだけ置き換える（同点は先着優先）
pub fn keep_best(best: Option<Candidate>, next: Candidate) -> Option<Candidate> {
    match best {
        Some(current) if next.score <= current.score => Some(current),
        _ => Some(next),
    }
}

/// 主名を正規化済みの栄養成分表
#[derive(Debug, Clone)]
pub struct PreparedNatives<'a> {
    records: &'a [NativeFoodRecord],
    primary_names: Vec<String>,
}

impl<'a> PreparedNatives<'a> {
    pub fn new(records: &'a [NativeFoodRecord]) -> Self {
        let primary_names = records.iter().map(|r| normalize_primary(&r.name)).collect();
        Self {
            records,
            primary_names,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 訳語と主名の比較
///
/// 部分文字列ならスコア 1.0、そうでなければ十分長い訳語に限り類似度で判定する
pub fn score_translation(translation: &str, native_name: &str) -> Option<(f64, MatchType)> {
    if translation.is_empty() || native_name.is_empty() {
        return None;
    }

    if native_name.contains(translation) || translation.contains(native_name) {
        return Some((1.0, MatchType::Dictionary));
    }

    if translation.chars().count() > MIN_PARTIAL_LEN {
        let sim = ratio(translation, native_name);
        if sim > PARTIAL_THRESHOLD {
            return Some((sim, MatchType::DictionaryPartial));
        }
    }

    None
}

/// FODMAPレコードと栄養成分表の照合器
#[derive(Debug, Clone)]
pub struct MatchResolver<'t> {
    translations: &'t TranslationIndex,
    options: ResolverOptions,
}

impl<'t> MatchResolver<'t> {
    pub fn new(translations: &'t TranslationIndex) -> Self {
        Self {
            translations,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// 全FODMAPレコードを照合し、スコア降順で返す
    pub fn resolve_matches<'a>(
        &self,
        foreign: &'a [ForeignIngredientRecord],
        native: &'a [NativeFoodRecord],
    ) -> Vec<MatchResult<'a>> {
        let natives = PreparedNatives::new(native);

        let mut results: Vec<MatchResult<'a>> = if self.options.parallel {
            foreign
                .par_iter()
                .enumerate()
                .filter_map(|(i, record)| self.resolve_one(ForeignId(i), record, &natives))
                .collect()
        } else {
            foreign
                .iter()
                .enumerate()
                .filter_map(|(i, record)| self.resolve_one(ForeignId(i), record, &natives))
                .collect()
        };

        sort_by_score(&mut results);

        let stats = MatchStats::from_results(foreign.len(), &results);
        tracing::info!(
            foreign = stats.total_foreign,
            native = native.len(),
            matched = stats.matched,
            dictionary = stats.dictionary,
            dictionary_partial = stats.dictionary_partial,
            similarity = stats.similarity,
            "match pass finished"
        );

        results
    }

    /// 1件のFODMAPレコードを照合する
    pub fn resolve_one<'a>(
        &self,
        id: ForeignId,
        foreign: &'a ForeignIngredientRecord,
        natives: &PreparedNatives<'a>,
    ) -> Option<MatchResult<'a>> {
        let best = self.best_candidate(&foreign.normalized_name, natives)?;

        if best.score <= ACCEPT_THRESHOLD {
            return None;
        }

        let native = natives.records.get(best.native_index)?;
        tracing::trace!(
            foreign = %foreign.name,
            native = %native.name,
            score = best.score,
            match_type = %best.match_type,
            "match accepted"
        );

        Some(MatchResult {
            foreign_id: id,
            foreign,
            native,
            score: best.score,
            match_type: best.match_type,
        })
    }

    /// 両フェーズを通した最良候補（閾値判定前）
    pub fn best_candidate(&self, foreign_name: &str, natives: &PreparedNatives<'_>) -> Option<Candidate> {
        let primary_names = natives.primary_names.as_slice();
        let best = dictionary_candidates(self.translations, foreign_name, primary_names)
            .fold(None, keep_best);

        let floor = best.map(|c| c.score).unwrap_or(0.0);
        if floor >= ACCEPT_THRESHOLD {
            return best;
        }

        similarity_candidates(foreign_name, primary_names).fold(best, keep_best)
    }
}

/// 辞書フェーズの候補（単語順 × 栄養成分表順）
fn dictionary_candidates<'s>(
    translations: &'s TranslationIndex,
    foreign_name: &'s str,
    primary_names: &'s [String],
) -> impl Iterator<Item = Candidate> + 's {
    keywords(foreign_name)
        .filter_map(move |keyword| translations.get(keyword))
        .flat_map(move |translation| {
            primary_names.iter().enumerate().filter_map(move |(i, native_name)| {
                score_translation(translation, native_name).map(|(score, match_type)| Candidate {
                    native_index: i,
                    score,
                    match_type,
                })
            })
        })
}

/// 補完フェーズの候補（名前同士の類似度）
fn similarity_candidates<'s>(
    foreign_name: &'s str,
    primary_names: &'s [String],
) -> impl Iterator<Item = Candidate> + 's {
    primary_names.iter().enumerate().filter_map(move |(i, native_name)| {
        let sim = ratio(foreign_name, native_name);
        (sim > SIMILARITY_THRESHOLD).then_some(Candidate {
            native_index: i,
            score: sim,
            match_type: MatchType::Similarity,
        })
    })
}

/// スコア降順の安定ソート（同点は入力順を保つ）
pub fn sort_by_score(results: &mut [MatchResult<'_>]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// どの結果にも現れないFODMAPレコード（カタログ順）
pub fn unmatched<'a>(
    foreign: &'a [ForeignIngredientRecord],
    results: &[MatchResult<'_>],
) -> Vec<(ForeignId, &'a ForeignIngredientRecord)> {
    let mut matched = vec![false; foreign.len()];
    for result in results {
        if let Some(slot) = matched.get_mut(result.foreign_id.0) {
            *slot = true;
        }
    }

    foreign
        .iter()
        .enumerate()
        .filter(|(i, _)| !matched[*i])
        .map(|(i, record)| (ForeignId(i), record))
        .collect()
}

/// 照合パスの統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    pub total_foreign: usize,
    pub matched: usize,
    pub dictionary: usize,
    pub dictionary_partial: usize,
    pub similarity: usize,
    pub unmatched: usize,
}

impl MatchStats {
    pub fn from_results(total_foreign: usize, results: &[MatchResult<'_>]) -> Self {
        let mut stats = Self {
            total_foreign,
            matched: results.len(),
            unmatched: total_foreign.saturating_sub(results.len()),
            ..Default::default()
        };
        for result in results {
            match result.match_type {
                MatchType::Dictionary => stats.dictionary += 1,
                MatchType::DictionaryPartial => stats.dictionary_partial += 1,
                MatchType::Similarity => stats.similarity += 1,
            }
        }
        stats
    }

    /// 照合率（%）
    pub fn match_rate(&self) -> f64 {
        if self.total_foreign == 0 {
            return 0.0;
        }
        self.matched as f64 / self.total_foreign as f64 * 100.0
    }
}
