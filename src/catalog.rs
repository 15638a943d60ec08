//! カタログ・辞書テーブルの読み込み
//!
//! 栄養成分表とFODMAPリストは、配列そのもの、または `{"foods": [...]}` の形を受け付ける。

use crate::config::Config;
use crate::error::{FoodLinkError, Result};
use food_link_common::{
    ForeignIngredientRecord, IngredientKeywordMap, NativeFoodRecord, TranslationIndex,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile<T> {
    Bare(Vec<T>),
    Wrapped { foods: Vec<T> },
}

impl<T> CatalogFile<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            CatalogFile::Bare(records) => records,
            CatalogFile::Wrapped { foods } => foods,
        }
    }
}

fn read_catalog<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(FoodLinkError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let catalog: CatalogFile<T> = serde_json::from_str(&content)
        .map_err(|e| FoodLinkError::InvalidCatalog(format!("{}: {}", path.display(), e)))?;
    Ok(catalog.into_records())
}

/// 栄養成分表を読み込む
pub fn load_native(path: &Path) -> Result<Vec<NativeFoodRecord>> {
    let records: Vec<NativeFoodRecord> = read_catalog(path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "native catalog loaded");
    Ok(records)
}

/// FODMAPリストを読み込み、正規化名を再計算する
pub fn load_foreign(path: &Path) -> Result<Vec<ForeignIngredientRecord>> {
    let mut records: Vec<ForeignIngredientRecord> = read_catalog(path)?;
    for record in &mut records {
        record.refresh_normalized();
    }

    let unnamed = records.iter().filter(|r| r.normalized_name.is_empty()).count();
    if unnamed > 0 {
        tracing::warn!(unnamed, "foreign records with empty names are never matched");
    }

    tracing::debug!(path = %path.display(), records = records.len(), "foreign catalog loaded");
    Ok(records)
}

/// 照合に使う辞書テーブル
#[derive(Debug, Clone)]
pub struct Tables {
    pub translations: TranslationIndex,
    pub keywords: IngredientKeywordMap,
}

/// 辞書テーブルの読み込み元（CLI指定 > 設定ファイル > 組み込み）
#[derive(Debug, Clone, Default)]
pub struct TableSources<'p> {
    pub translations: Option<&'p Path>,
    pub keywords: Option<&'p Path>,
}

impl<'p> TableSources<'p> {
    /// CLI指定を優先し、なければ設定ファイルのパスを使う
    pub fn resolve(
        config: &'p Config,
        translations: Option<&'p Path>,
        keywords: Option<&'p Path>,
    ) -> Self {
        Self {
            translations: translations.or(config.translations_path.as_deref()),
            keywords: keywords.or(config.keywords_path.as_deref()),
        }
    }
}

/// 組み込みテーブルに追加テーブルをマージして返す
pub fn load_tables(sources: &TableSources<'_>) -> Result<Tables> {
    let mut translations = TranslationIndex::builtin()?;
    if let Some(path) = sources.translations {
        if !path.exists() {
            return Err(FoodLinkError::FileNotFound(path.display().to_string()));
        }
        translations.merge(&TranslationIndex::from_file(path)?);
    }

    let mut keywords = IngredientKeywordMap::builtin()?;
    if let Some(path) = sources.keywords {
        if !path.exists() {
            return Err(FoodLinkError::FileNotFound(path.display().to_string()));
        }
        keywords.merge(&IngredientKeywordMap::from_file(path)?);
    }

    tracing::debug!(
        translations = translations.len(),
        keywords = keywords.len(),
        "dictionary tables ready"
    );
    Ok(Tables {
        translations,
        keywords,
    })
}
