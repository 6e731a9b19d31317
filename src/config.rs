//! 設定
//!
//! ~/.config/sprinkler-report/config.json と環境変数 OPENAI_API_KEY から読み込む。
//! 認証情報が無い場合は `require_api_key` がエラーを返し、起動を中止する

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: 120,
        }
    }
}

/// 推論クライアントに渡す接続設定
#[derive(Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &"****")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| {
                    ReportError::Config(format!(
                        "{}: {} (fix the file or overwrite it with `sprinkler-report config --set-api-key`)",
                        path.display(),
                        e
                    ))
                })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読めない設定ファイルは既定値から始める（上書き保存で修復するため）
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_or_default_from(&Self::config_path()?))
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(error = %e, "config file unreadable, starting from defaults");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("sprinkler-report").join("config.json"))
    }

    /// 認証情報を解決する（環境変数を優先、空白のみは未設定扱い）
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .map(|key| key.trim().to_string())
    }

    /// 起動時の必須チェック。認証情報が無ければ MissingApiKey
    pub fn require_api_key(&self) -> Result<ApiSettings> {
        self.api_settings(std::env::var(API_KEY_ENV).ok())
    }

    /// 環境変数の値を注入できる版（テスト用にも使う）
    pub fn api_settings(&self, env_value: Option<String>) -> Result<ApiSettings> {
        let api_key = self.resolve_api_key(env_value).ok_or(ReportError::MissingApiKey)?;
        if self.model.trim().is_empty() {
            return Err(ReportError::Config("model must not be empty".into()));
        }
        Ok(ApiSettings {
            api_key,
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_seconds.max(1)),
        })
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
