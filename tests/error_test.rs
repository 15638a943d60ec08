//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use food_link::catalog;
use food_link::error::FoodLinkError;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないカタログを読み込んだ場合
#[test]
fn test_load_nonexistent_catalog() {
    let result = catalog::load_native(Path::new("/nonexistent/path/12345.json"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, FoodLinkError::FileNotFound(_)));
}

/// JSONとして壊れたカタログ
#[test]
fn test_load_broken_catalog() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fodmap.json");
    std::fs::write(&path, "{ foods: ").unwrap();

    let err = catalog::load_foreign(&path).unwrap_err();
    assert!(matches!(err, FoodLinkError::InvalidCatalog(_)));
    assert!(err.to_string().contains("fodmap.json"));
}

/// 形の合わないカタログ（必須フィールドなし）
#[test]
fn test_load_catalog_missing_fields() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fodmap.json");
    std::fs::write(&path, r#"{"foods": [{"name": "Garlic"}]}"#).unwrap();

    let err = catalog::load_foreign(&path).unwrap_err();
    assert!(matches!(err, FoodLinkError::InvalidCatalog(_)));
}

/// FoodLinkErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        FoodLinkError::Config("テスト設定エラー".to_string()),
        FoodLinkError::FileNotFound("tabela.json".to_string()),
        FoodLinkError::InvalidCatalog("不正なカタログ".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = FoodLinkError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: FoodLinkError = io_err.into();

    assert!(matches!(err, FoodLinkError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: FoodLinkError = json_err.into();

    assert!(matches!(err, FoodLinkError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = food_link_common::Error::Table("空のキー".to_string());
    let err: FoodLinkError = common_err.into();

    assert!(matches!(err, FoodLinkError::Common(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = food_link_common::Error::Table("重複したキー".to_string());
    let err: FoodLinkError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    let display = format!("{}", err);
    assert!(display.contains("重複したキー"));
    assert!(display.contains("Table"));
}

/// 不正な辞書テーブルは読み込みエラーになる
#[test]
fn test_invalid_table_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("dict.json");
    std::fs::write(&path, r#"{"garlic": "(nada)"}"#).unwrap();

    let sources = catalog::TableSources {
        translations: Some(path.as_path()),
        keywords: None,
    };
    let err = catalog::load_tables(&sources).unwrap_err();
    assert!(matches!(
        err,
        FoodLinkError::Common(food_link_common::Error::Table(_))
    ));
}
