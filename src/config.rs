//! Configuration for the LLM and graph clients.
//!
//! Values come from defaults, then an optional JSON file
//! (`~/.lore/config.json`), then environment variables.

use crate::graph::Neo4jHttpClient;
use crate::llm::{LlmClient, LlmProvider};
use crate::query::{NormalizeOrder, QueryNormalizer};
use crate::types::{LoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file location (tilde-expanded at load time).
pub const DEFAULT_CONFIG_FILE: &str = "~/.lore/config.json";

/// Default model when neither file nor environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Language model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name; `claude*` selects the Anthropic API
    pub model: String,
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL override
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Graph database settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// HTTP(S) URL of the Neo4j server
    pub url: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub database: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: "neo4j".to_string(),
            password: None,
            database: "neo4j".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub graph: GraphConfig,
    pub normalize_order: NormalizeOrder,
}

impl Config {
    /// Expand `~` in a config path.
    pub fn expand_path(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist; the default file is read only if present.
    /// Environment variables are applied last.
    ///
    /// # Errors
    ///
    /// Returns `LoreError::Config` for a missing explicit file or invalid JSON
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let p = Self::expand_path(p);
                if !p.exists() {
                    return Err(LoreError::config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Self::from_file(&p)?
            }
            None => {
                let p = Self::expand_path(Path::new(DEFAULT_CONFIG_FILE));
                if p.exists() {
                    Self::from_file(&p)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LoreError::config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let path = Self::expand_path(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Override values from environment variables.
    ///
    /// `lookup` returns the value of a variable, if set.
    ///
    /// - `LORE_LLM_MODEL`, `LORE_LLM_BASE_URL`
    /// - `ANTHROPIC_API_KEY` for `claude*` models, otherwise `OPENAI_API_KEY`
    ///   (or the legacy `OPEN_AI_KEY`)
    /// - `NEO4J_URL`, `NEO4J_USERNAME`, `NEO4J_PASSWORD` (or `neo4j_password`),
    ///   `NEO4J_DATABASE`
    /// - `LORE_NORMALIZE_ORDER`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k).filter(|v| !v.is_empty()));

        if let Some(model) = first(&["LORE_LLM_MODEL"]) {
            self.llm.model = model;
        }
        if let Some(url) = first(&["LORE_LLM_BASE_URL"]) {
            self.llm.base_url = Some(url);
        }
        let key_vars: &[&str] = match LlmProvider::for_model(&self.llm.model) {
            LlmProvider::Anthropic => &["ANTHROPIC_API_KEY"],
            LlmProvider::OpenAI => &["OPENAI_API_KEY", "OPEN_AI_KEY"],
        };
        if let Some(key) = first(key_vars) {
            self.llm.api_key = Some(key);
        }

        if let Some(url) = first(&["NEO4J_URL"]) {
            self.graph.url = Some(url);
        }
        if let Some(user) = first(&["NEO4J_USERNAME"]) {
            self.graph.username = user;
        }
        if let Some(password) = first(&["NEO4J_PASSWORD", "neo4j_password"]) {
            self.graph.password = Some(password);
        }
        if let Some(db) = first(&["NEO4J_DATABASE"]) {
            self.graph.database = db;
        }

        if let Some(order) = first(&["LORE_NORMALIZE_ORDER"]) {
            self.normalize_order = order.parse().map_err(LoreError::Config)?;
        }

        Ok(())
    }

    /// Check that every value needed to reach both services is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_none() {
            let var = match LlmProvider::for_model(&self.llm.model) {
                LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
                LlmProvider::OpenAI => "OPENAI_API_KEY",
            };
            return Err(LoreError::config(format!("{} environment variable not set", var)));
        }
        if self.graph.url.is_none() {
            return Err(LoreError::config("NEO4J_URL environment variable not set"));
        }
        if self.graph.password.is_none() {
            return Err(LoreError::config("NEO4J_PASSWORD environment variable not set"));
        }
        Ok(())
    }

    /// Build the LLM client.
    pub fn llm_client(&self) -> Result<LlmClient> {
        let api_key = self
            .llm
            .api_key
            .clone()
            .ok_or_else(|| LoreError::config("LLM API key not configured"))?;
        let client = LlmClient::new(api_key, self.llm.model.clone());
        Ok(match &self.llm.base_url {
            Some(url) => client.with_base_url(url.as_str()),
            None => client,
        })
    }

    /// Build the graph client.
    pub fn graph_client(&self) -> Result<Neo4jHttpClient> {
        let url = self
            .graph
            .url
            .as_deref()
            .ok_or_else(|| LoreError::config("Neo4j URL not configured"))?;
        let password = self
            .graph
            .password
            .as_deref()
            .ok_or_else(|| LoreError::config("Neo4j password not configured"))?;
        Ok(Neo4jHttpClient::new(url, self.graph.username.as_str(), password)
            .with_database(self.graph.database.as_str()))
    }

    pub fn normalizer(&self) -> QueryNormalizer {
        QueryNormalizer::new(self.normalize_order)
    }
}
