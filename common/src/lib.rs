//! Food Link Common Library
//!
//! 栄養成分表（ポルトガル語）とFODMAPリスト（英語）を照合するエンジン。
//! CLIと統合データベース生成で共有される。

pub mod error;
pub mod types;
pub mod normalize;
pub mod similarity;
pub mod translation;
pub mod keywords;
pub mod ingredient_index;
pub mod resolver;
pub mod composite;

pub use error::{Error, Result};
pub use types::{
    CompositeFodmapAnnotation, ForeignCategory, ForeignId, ForeignIngredientRecord,
    IngredientTag, MatchResult, MatchType, NativeFoodRecord, Severity,
};
pub use normalize::{normalize, normalize_primary};
pub use similarity::ratio;
pub use translation::TranslationIndex;
pub use keywords::IngredientKeywordMap;
pub use ingredient_index::IngredientIndex;
pub use resolver::{unmatched, MatchResolver, MatchStats, ResolverOptions};
pub use composite::{aggregate_severity, CompositeStats, CompositeTagger};
