//! 統合データベース生成モジュール
//!
//! 照合パスと料理分解パスの結果を、栄養成分表の全食品 + 未照合のFODMAPレコードからなる
//! 1つのデータベースにまとめる。
//!
//! ## 処理フロー
//! 1. FODMAPレコードを栄養成分表と照合（食品コードごとに最高スコアを採用）
//! 2. 料理名を分解（有効時。見つかった場合は照合結果より優先）
//! 3. 栄養成分表の各食品をエントリ化
//! 4. 照合されなかったFODMAPレコードを `FODMAP_n` として追加

pub mod types;

pub use types::{
    DatabaseMetadata, EntrySource, FodmapDistribution, FodmapInfo, IngredientSummary,
    SearchInformation, UnifiedDatabase, UnifiedEntry,
};

use food_link_common::{
    unmatched, CompositeFodmapAnnotation, CompositeTagger, ForeignIngredientRecord,
    IngredientIndex, IngredientKeywordMap, MatchResolver, MatchResult, NativeFoodRecord,
    ResolverOptions, TranslationIndex,
};
use std::collections::HashMap;

/// 統合オプション
#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// 料理名の分解を行う
    pub decompose: bool,
    /// rayonで並列処理する
    pub parallel: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            decompose: true,
            parallel: true,
        }
    }
}

pub struct DatabaseMerger<'t> {
    translations: &'t TranslationIndex,
    keywords: &'t IngredientKeywordMap,
    options: MergeOptions,
}

impl<'t> DatabaseMerger<'t> {
    pub fn new(translations: &'t TranslationIndex, keywords: &'t IngredientKeywordMap) -> Self {
        Self {
            translations,
            keywords,
            options: MergeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// 両パスを実行して統合データベースを作る（作成日は今日）
    pub fn merge(
        &self,
        foreign: &[ForeignIngredientRecord],
        native: &[NativeFoodRecord],
    ) -> UnifiedDatabase {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        self.merge_dated(foreign, native, today)
    }

    pub fn merge_dated(
        &self,
        foreign: &[ForeignIngredientRecord],
        native: &[NativeFoodRecord],
        creation_date: impl Into<String>,
    ) -> UnifiedDatabase {
        let resolver = MatchResolver::new(self.translations).with_options(ResolverOptions {
            parallel: self.options.parallel,
        });
        let matches = resolver.resolve_matches(foreign, native);

        let annotations = if self.options.decompose {
            let index = IngredientIndex::build(foreign);
            CompositeTagger::new(&index, self.keywords).tag_all(native, self.options.parallel)
        } else {
            Vec::new()
        };

        let foods = assemble(foreign, native, &matches, &annotations);
        let metadata = DatabaseMetadata::from_entries(&foods, creation_date);

        tracing::info!(
            total = metadata.total_foods,
            with_fodmap = metadata.foods_with_fodmap_data,
            fodmap_only = metadata.foods_fodmap_only,
            multiple = metadata.foods_with_multiple_ingredients,
            "unified database assembled"
        );

        UnifiedDatabase { metadata, foods }
    }
}

/// パスの出力からエントリ列を組み立てる
///
/// `matches` はスコア降順であること。`annotations` は `native` と同じ順序で、
/// 空なら分解なしとして扱う。
pub fn assemble(
    foreign: &[ForeignIngredientRecord],
    native: &[NativeFoodRecord],
    matches: &[MatchResult<'_>],
    annotations: &[Option<CompositeFodmapAnnotation<'_>>],
) -> Vec<UnifiedEntry> {
    let best_by_code = best_match_by_code(matches);

    let mut foods: Vec<UnifiedEntry> = native
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let composite = annotations
                .get(i)
                .and_then(Option::as_ref)
                .map(FodmapInfo::from_annotation);
            let fodmap = composite.or_else(|| {
                best_by_code
                    .get(record.code.as_str())
                    .map(|result| FodmapInfo::from_match(result))
            });
            UnifiedEntry::from_native(record, fodmap)
        })
        .collect();

    let leftovers = unmatched(foreign, matches);
    tracing::debug!(count = leftovers.len(), "appending fodmap-only entries");
    foods.extend(
        leftovers
            .into_iter()
            .enumerate()
            .map(|(n, (_, record))| UnifiedEntry::fodmap_only(n + 1, record)),
    );

    foods
}

/// 食品コードごとの最良の照合結果（先に現れたものが最良）
fn best_match_by_code<'m, 'a>(matches: &'m [MatchResult<'a>]) -> HashMap<&'a str, &'m MatchResult<'a>> {
    let mut best: HashMap<&'a str, &'m MatchResult<'a>> = HashMap::new();
    for result in matches {
        best.entry(result.native.code.as_str()).or_insert(result);
    }
    best
}
