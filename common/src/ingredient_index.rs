//! FODMAP食材の転置インデックス
//!
//! キー（正規化済みの完全名、または3文字以上の単語）→ そのキーを含むレコード群。
//! 値は常にレコードIDの列で、単一レコードでも列として保持する。

use crate::normalize::keywords;
use crate::types::{ForeignId, ForeignIngredientRecord};
use std::collections::BTreeMap;

/// インデックス対象外の単語
pub const STOP_WORDS: [&str; 4] = ["the", "and", "with", "for"];

/// 単語キーの最小文字数
pub const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct IngredientIndex<'a> {
    records: &'a [ForeignIngredientRecord],
    keys: BTreeMap<String, Vec<ForeignId>>,
}

impl<'a> IngredientIndex<'a> {
    /// FODMAPカタログからインデックスを構築
    pub fn build(records: &'a [ForeignIngredientRecord]) -> Self {
        let mut keys: BTreeMap<String, Vec<ForeignId>> = BTreeMap::new();

        for (position, record) in records.iter().enumerate() {
            let id = ForeignId(position);
            let name = record.normalized_name.as_str();
            if name.is_empty() {
                continue;
            }

            insert_unique(&mut keys, name, id);

            for word in keywords(name) {
                if word.chars().count() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&word) {
                    insert_unique(&mut keys, word, id);
                }
            }
        }

        tracing::debug!(records = records.len(), keys = keys.len(), "ingredient index built");
        Self { records, keys }
    }

    /// 完全一致で引く（なければ空）
    pub fn lookup(&self, key: &str) -> &[ForeignId] {
        self.keys.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `fragment` を含む、または `fragment` に含まれるキー（キー順）
    pub fn containing<'s>(
        &'s self,
        fragment: &'s str,
    ) -> impl Iterator<Item = (&'s str, &'s [ForeignId])> + 's {
        self.keys
            .iter()
            .filter(move |(key, _)| {
                !fragment.is_empty() && (key.contains(fragment) || fragment.contains(key.as_str()))
            })
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }

    pub fn record(&self, id: ForeignId) -> Option<&'a ForeignIngredientRecord> {
        self.records.get(id.0)
    }

    pub fn records(&self) -> &'a [ForeignIngredientRecord] {
        self.records
    }

    /// キー数
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn insert_unique(keys: &mut BTreeMap<String, Vec<ForeignId>>, key: &str, id: ForeignId) {
    let ids = keys.entry(key.to_string()).or_default();
    if !ids.contains(&id) {
        ids.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForeignCategory, Severity};

    fn record(name: &str, severity: Severity) -> ForeignIngredientRecord {
        ForeignIngredientRecord::new(name, ForeignCategory::Vegetables, severity)
    }

    #[test]
    fn test_full_name_and_words_indexed() {
        let records = vec![record("Garlic infused oil", Severity::Free)];
        let index = IngredientIndex::build(&records);

        assert_eq!(index.lookup("garlic infused oil"), &[ForeignId(0)]);
        assert_eq!(index.lookup("garlic"), &[ForeignId(0)]);
        assert_eq!(index.lookup("oil"), &[ForeignId(0)]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_shared_key_keeps_every_record() {
        let records = vec![
            record("Garlic", Severity::High),
            record("Garlic infused oil", Severity::Free),
            record("Garlic powder", Severity::High),
        ];
        let index = IngredientIndex::build(&records);

        assert_eq!(
            index.lookup("garlic"),
            &[ForeignId(0), ForeignId(1), ForeignId(2)]
        );
    }

    #[test]
    fn test_short_and_stop_words_skipped() {
        let records = vec![record("Rice with egg and peas for kids", Severity::Low)];
        let index = IngredientIndex::build(&records);

        assert!(index.lookup("with").is_empty());
        assert!(index.lookup("and").is_empty());
        assert!(index.lookup("for").is_empty());
        assert_eq!(index.lookup("egg"), &[ForeignId(0)]);
        assert_eq!(index.lookup("rice"), &[ForeignId(0)]);
    }

    #[test]
    fn test_short_full_name_still_indexed() {
        let records = vec![record("Fig", Severity::High), record("Ox", Severity::Free)];
        let index = IngredientIndex::build(&records);
        assert_eq!(index.lookup("fig"), &[ForeignId(0)]);
        assert_eq!(index.lookup("ox"), &[ForeignId(1)]);
    }

    #[test]
    fn test_repeated_word_not_duplicated() {
        let records = vec![record("Tomato, tomato paste", Severity::Free)];
        let index = IngredientIndex::build(&records);
        assert_eq!(index.lookup("tomato"), &[ForeignId(0)]);
    }

    #[test]
    fn test_empty_name_skipped() {
        let records = vec![record("(unnamed)", Severity::High)];
        let index = IngredientIndex::build(&records);
        assert!(index.is_empty());
    }

    #[test]
    fn test_containing_both_directions() {
        let records = vec![record("Olive oil", Severity::Free), record("Oil", Severity::Free)];
        let index = IngredientIndex::build(&records);

        let keys: Vec<&str> = index.containing("oil").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["oil", "olive oil"]);

        let keys: Vec<&str> = index.containing("extra virgin olive oil").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["oil", "olive", "olive oil"]);

        assert_eq!(index.containing("").count(), 0);
    }

    #[test]
    fn test_lookup_missing_is_empty() {
        let index = IngredientIndex::build(&[]);
        assert!(index.lookup("garlic").is_empty());
        assert!(index.record(ForeignId(0)).is_none());
    }
}
