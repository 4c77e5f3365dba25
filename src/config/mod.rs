//! Configuration resolution.
//!
//! Follows the CLI + optional TOML file layering used across the
//! project family: every CLI value can be overridden by the file, and
//! the resolved `AppConfig` is what the rest of the code sees. The LLM
//! section is optional; without an api key the server runs heuristic
//! only.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_TIMEOUT_SEC: u64 = 60;
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;

/// CLI arguments relevant to config resolution.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub catalog_path: Option<PathBuf>,
    pub port: u16,
    pub llm_model: Option<String>,
    pub llm_base_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            port: DEFAULT_PORT,
            llm_model: None,
            llm_base_url: None,
        }
    }
}

/// Shape of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub catalog_path: Option<String>,
    pub port: Option<u16>,
    pub llm: Option<LlmFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmFileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_sec: Option<u64>,
    pub temperature: Option<f32>,
}

/// Resolved LLM settings; only present when an api key was found.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_sec: u64,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub port: u16,
    pub llm: Option<LlmSettings>,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present. The api
    /// key comes from the file or the `OPENAI_API_KEY` environment
    /// variable, in that order.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let catalog_path = file
            .catalog_path
            .map(PathBuf::from)
            .or_else(|| cli.catalog_path.clone())
            .unwrap_or_else(|| PathBuf::from("data/tracks.json"));
        if !catalog_path.exists() {
            bail!("Catalog file does not exist: {:?}", catalog_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let llm_file = file.llm.unwrap_or_default();
        let api_key = llm_file
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty());

        let llm = api_key.map(|api_key| LlmSettings {
            api_key,
            model: llm_file
                .model
                .or_else(|| cli.llm_model.clone())
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_owned()),
            base_url: llm_file
                .base_url
                .or_else(|| cli.llm_base_url.clone())
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_owned()),
            timeout_sec: llm_file.timeout_sec.unwrap_or(DEFAULT_LLM_TIMEOUT_SEC),
            temperature: llm_file.temperature.unwrap_or(DEFAULT_LLM_TEMPERATURE),
        });

        Ok(AppConfig {
            catalog_path,
            port,
            llm,
        })
    }
}
