use crate::ai::{GeminiClient, OllamaClient, DEFAULT_OLLAMA_URL};
use crate::kv::{FileKv, KvStore, MemoryKv, SqliteKv};
use crate::provider::{ContentProvider, Provider};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Some(StorageBackend::File),
            "sqlite" => Some(StorageBackend::Sqlite),
            "memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub provider: Option<String>,
    pub default_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub storage: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        Self {
            provider: Some(Provider::Gemini.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("bi3oo").join("config.json"))
    }

    pub fn provider(&self) -> Provider {
        self.provider
            .as_deref()
            .and_then(Provider::from_str)
            .unwrap_or(Provider::Gemini)
    }

    pub fn model(&self) -> String {
        self.default_model
            .clone()
            .unwrap_or_else(|| self.provider().default_model().to_string())
    }

    /// `GEMINI_API_KEY`, then `API_KEY`, then the config file.
    pub fn gemini_api_key(&self) -> Option<String> {
        env_var("GEMINI_API_KEY")
            .or_else(|| env_var("API_KEY"))
            .or_else(|| self.gemini_api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn ollama_url(&self) -> String {
        env_var("OLLAMA_URL")
            .or_else(|| self.ollama_url.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage
            .as_deref()
            .and_then(StorageBackend::from_str)
            .unwrap_or(StorageBackend::File)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;
        Ok(data_dir.join("bi3oo"))
    }

    /// Persistence backend rooted in the data directory.
    pub fn open_kv(&self) -> Result<Arc<dyn KvStore>> {
        let kv: Arc<dyn KvStore> = match self.storage_backend() {
            StorageBackend::File => Arc::new(FileKv::open(self.data_dir()?)?),
            StorageBackend::Sqlite => Arc::new(SqliteKv::open(self.data_dir()?.join("bi3oo.db"))?),
            StorageBackend::Memory => Arc::new(MemoryKv::new()),
        };
        Ok(kv)
    }

    /// Content provider for the configured backend. A missing Gemini key is
    /// not fatal: every generation will fail and fall back to static content.
    pub fn content_provider(&self) -> Result<Arc<dyn ContentProvider>> {
        let model = self.model();
        let timeout = self.request_timeout_secs.map(Duration::from_secs);

        let provider: Arc<dyn ContentProvider> = match self.provider() {
            Provider::Gemini => {
                let key = self.gemini_api_key().unwrap_or_else(|| {
                    warn!("no Gemini API key configured, listings will use fallback data");
                    String::new()
                });
                let mut client = GeminiClient::new(&key, &model);
                if let Some(timeout) = timeout {
                    client = client.with_timeout(timeout)?;
                }
                Arc::new(client)
            }
            Provider::Ollama => {
                let mut client = OllamaClient::new(&self.ollama_url(), &model);
                if let Some(timeout) = timeout {
                    client = client.with_timeout(timeout)?;
                }
                Arc::new(client)
            }
        };
        Ok(provider)
    }
}
