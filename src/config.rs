use crate::error::{FoodLinkError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ログフィルタを上書きする環境変数
pub const LOG_ENV: &str = "FOOD_LINK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 組み込み辞書にマージする対訳辞書JSON
    pub translations_path: Option<PathBuf>,
    /// 組み込み表にマージする食材キーワードJSON
    pub keywords_path: Option<PathBuf>,
    /// rayonによる並列照合
    pub parallel: bool,
    /// tracing-subscriberのフィルタ
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translations_path: None,
            keywords_path: None,
            parallel: true,
            log_filter: "info".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| FoodLinkError::Config(format!("設定ファイルが不正: {}", e)))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FoodLinkError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("food-link").join("config.json"))
    }

    /// ログフィルタ（環境変数を優先）
    pub fn log_filter(&self) -> String {
        std::env::var(LOG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.log_filter.clone())
    }

    pub fn set_translations_path(&mut self, path: PathBuf) -> Result<()> {
        self.translations_path = Some(path);
        self.save()
    }

    pub fn set_keywords_path(&mut self, path: PathBuf) -> Result<()> {
        self.keywords_path = Some(path);
        self.save()
    }
}
