//! 統合データベース生成テスト
//!
//! カタログ読み込み → 統合 → JSON書き出しまでを通しで検証

use food_link::catalog::{self, TableSources};
use food_link::merger::{
    DatabaseMerger, EntrySource, MergeOptions, SearchInformation, UnifiedDatabase,
};
use food_link::output::write_json;
use food_link_common::Severity;
use tempfile::tempdir;

const FODMAP_JSON: &str = r#"{
    "foods": [
        {"name": "Garlic", "category": "Vegetables and Legumes", "fodmap_level": "high", "portion_note": "Avoid"},
        {"name": "Tomato", "category": "Vegetables and Legumes", "fodmap_level": "free", "portion_note": "1 medium"},
        {"name": "Wheat", "category": "Cereals, Grains, Breads, Biscuits, Pasta, Nuts and Cakes", "fodmap_level": "high"},
        {"name": "Quinoa", "category": "Cereals, Grains, Breads, Biscuits, Pasta, Nuts and Cakes", "fodmap_level": "free"},
        {"name": "Durian", "category": "Fruit", "fodmap_level": "low"}
    ]
}"#;

const TABELA_JSON: &str = r#"[
    {"code": "IS001", "name": "Alho, cru", "category_level_1": "Hortícolas", "energy_kcal": 120},
    {"code": "IS002", "name": "Esparguete com alho e tomate", "category_level_1": "Pratos", "energy_kcal": 180},
    {"code": "IS003", "name": "Quinoa, crua", "energy_kcal": 368},
    {"code": "IS004", "name": "Pescada cozida", "energy_kcal": 90}
]"#;

fn write_catalogs(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let foreign = dir.join("fodmap_database.json");
    let native = dir.join("tabela_alimentar.json");
    std::fs::write(&foreign, FODMAP_JSON).unwrap();
    std::fs::write(&native, TABELA_JSON).unwrap();
    (foreign, native)
}

fn merge(decompose: bool) -> UnifiedDatabase {
    let dir = tempdir().unwrap();
    let (foreign_path, native_path) = write_catalogs(dir.path());

    let foreign = catalog::load_foreign(&foreign_path).unwrap();
    let native = catalog::load_native(&native_path).unwrap();
    let tables = catalog::load_tables(&TableSources::default()).unwrap();

    DatabaseMerger::new(&tables.translations, &tables.keywords)
        .with_options(MergeOptions {
            decompose,
            parallel: true,
        })
        .merge_dated(&foreign, &native, "2026-10-19")
}

#[test]
fn test_every_native_record_present_in_order() {
    let db = merge(true);
    let ids: Vec<&str> = db.foods.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(&ids[..4], &["IS001", "IS002", "IS003", "IS004"]);
    assert!(db.foods[..4]
        .iter()
        .all(|f| f.source == EntrySource::NutritionalTable && f.nutrition.is_some()));
}

#[test]
fn test_composite_dish_in_database() {
    let db = merge(true);
    let dish = &db.foods[1];
    let fodmap = dish.fodmap.as_ref().unwrap();

    assert_eq!(fodmap.level, Severity::High);
    match &fodmap.search_information {
        SearchInformation::MultipleIngredients {
            total_ingredients,
            ingredients,
        } => {
            assert_eq!(*total_ingredients, 3);
            let names: Vec<&str> = ingredients.iter().map(|i| i.name_english.as_str()).collect();
            assert!(names.contains(&"Garlic"));
            assert!(names.contains(&"Wheat"));
            assert!(names.contains(&"Tomato"));
        }
        other => panic!("unexpected search information: {:?}", other),
    }
}

#[test]
fn test_without_decomposition_uses_matches_only() {
    let db = merge(false);

    // 料理名は主名全体で比較される。Garlicは先に現れた「Alho, cru」に付くため、料理にはTomatoが付く
    let dish = db.foods[1].fodmap.as_ref().unwrap();
    assert!(matches!(
        &dish.search_information,
        SearchInformation::Dictionary { name_english, .. } if name_english == "Tomato"
    ));
    assert_eq!(db.metadata.foods_with_multiple_ingredients, 0);

    let quinoa = db.foods[2].fodmap.as_ref().unwrap();
    assert_eq!(quinoa.level, Severity::Free);
}

#[test]
fn test_unmatched_foreign_appended() {
    let db = merge(true);
    let fodmap_only: Vec<_> = db
        .foods
        .iter()
        .filter(|f| f.source == EntrySource::FodmapOnly)
        .collect();

    let names: Vec<&str> = fodmap_only.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"Durian"));
    assert!(!names.contains(&"Garlic"));
    assert_eq!(fodmap_only[0].id, "FODMAP_1");
    assert!(fodmap_only.iter().all(|f| f.nutrition.is_none()));
    assert_eq!(db.metadata.foods_fodmap_only, fodmap_only.len());
}

#[test]
fn test_metadata_counts_consistent() {
    let db = merge(true);
    let m = &db.metadata;

    assert_eq!(m.total_foods, db.foods.len());
    assert_eq!(m.foods_with_nutritional_data + m.foods_fodmap_only, m.total_foods);
    let d = &m.fodmap_distribution;
    assert_eq!(d.high + d.low + d.free, m.foods_with_fodmap_data);
    assert_eq!(d.none, m.total_foods - m.foods_with_fodmap_data);
    assert_eq!(m.creation_date, "2026-10-19");
    // ペスカーダにはFODMAP情報がない
    assert!(db.foods[3].fodmap.is_none());
}

#[test]
fn test_written_database_reads_back() {
    let db = merge(true);
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("unified_food_database.json");

    write_json(&path, &db).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let loaded: UnifiedDatabase = serde_json::from_str(&content).unwrap();

    assert_eq!(loaded, db);

    let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(raw["foods"][0]["fodmap"]["search_information"]["match_type"], "single_ingredient");
    assert_eq!(raw["foods"][1]["fodmap"]["search_information"]["match_type"], "multiple_ingredients");
}
