use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default character window used when chunking documents.
pub const DEFAULT_CHUNK_SIZE: usize = 512;
/// Default character overlap shared by consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
/// Default number of characters kept on each side of the first search match.
pub const DEFAULT_SNIPPET_RADIUS: usize = 100;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GENERATION_MODEL: &str = "llama3";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Corpus server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where document and call-recording records are read from.
    pub record_store: RecordStoreConfig,
    /// Maximum characters per chunk produced at preparation time.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Characters of context kept around the first match in search snippets.
    pub snippet_radius: usize,
    /// Text generation backend used for knowledge-base queries.
    pub generation_provider: GenerationProvider,
    /// Model identifier passed to the generation backend.
    pub generation_model: String,
    /// Optional Ollama base URL override.
    pub ollama_url: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Backing store selection for corpus records.
#[derive(Debug, Clone, Deserialize)]
pub enum RecordStoreConfig {
    /// Records are fetched from an HTTP record service.
    Http {
        /// Base URL of the record service.
        url: String,
        /// Optional API key sent with every request.
        api_key: Option<String>,
        /// Per-request timeout in seconds.
        timeout_secs: u64,
    },
    /// Records are loaded once from a JSON fixture into memory.
    Fixture {
        /// Path to the fixture file.
        path: PathBuf,
    },
}

/// Supported generation backends for knowledge-base queries.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// Knowledge-base queries are disabled.
    None,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let record_store = if let Some(url) = load_env_optional("RECORD_STORE_URL") {
            RecordStoreConfig::Http {
                url,
                api_key: load_env_optional("RECORD_STORE_API_KEY"),
                timeout_secs: parse_optional("RECORD_STORE_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS),
            }
        } else if let Some(path) = load_env_optional("RECORD_STORE_FIXTURE") {
            RecordStoreConfig::Fixture {
                path: PathBuf::from(path),
            }
        } else {
            return Err(ConfigError::MissingVariable(
                "RECORD_STORE_URL or RECORD_STORE_FIXTURE".to_string(),
            ));
        };

        let chunk_size = parse_optional("CORPUS_CHUNK_SIZE")?.unwrap_or(DEFAULT_CHUNK_SIZE);
        let chunk_overlap =
            parse_optional("CORPUS_CHUNK_OVERLAP")?.unwrap_or(DEFAULT_CHUNK_OVERLAP);
        if chunk_size == 0 {
            return Err(ConfigError::InvalidValue("CORPUS_CHUNK_SIZE".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidValue("CORPUS_CHUNK_OVERLAP".to_string()));
        }

        Ok(Self {
            record_store,
            chunk_size,
            chunk_overlap,
            snippet_radius: parse_optional("SEARCH_SNIPPET_RADIUS")?
                .unwrap_or(DEFAULT_SNIPPET_RADIUS),
            generation_provider: load_env_optional("GENERATION_PROVIDER")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("GENERATION_PROVIDER".into()))
                })
                .transpose()?
                .unwrap_or(GenerationProvider::None),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL"),
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl RecordStoreConfig {
    /// Short description safe for logs (never includes the API key).
    pub fn describe(&self) -> String {
        match self {
            Self::Http { url, api_key, .. } => {
                format!("http {url} (api key: {})", api_key.is_some())
            }
            Self::Fixture { path } => format!("fixture {}", path.display()),
        }
    }
}

impl std::str::FromStr for GenerationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "disabled" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        record_store = %config.record_store.describe(),
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        generation_provider = ?config.generation_provider,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
