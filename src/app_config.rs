use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO, 2 or 3 letters)
    pub target_language: String,

    /// Translation provider settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Subtitle source endpoints
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Root directory for downloaded and translated subtitle files
    #[serde(default = "default_subtitles_root")]
    pub subtitles_root: PathBuf,

    /// Public base URL used when generating subtitle links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// SQLite database file; derived from the user data dir when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory for parity-mismatch debug dumps
    #[serde(default = "default_debug_dir")]
    pub debug_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Free general-purpose translation endpoint
    #[default]
    GoogleFree,
    // @provider: OpenAI-compatible LLM endpoint
    OpenAi,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::GoogleFree => "Google Translate (free)",
            Self::OpenAi => "OpenAI-compatible API",
        }
    }

    // @returns: Lowercase provider identifier, also used as a path segment
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::GoogleFree => "googlefree".to_string(),
            Self::OpenAi => "openai".to_string(),
        }
    }

    /// Batch size for one translation call: the LLM provider takes a
    /// structured JSON array and handles larger batches, the free provider
    /// gets a sentinel-joined string and needs smaller ones.
    pub fn batch_size(&self) -> usize {
        match self {
            Self::GoogleFree => 60,
            Self::OpenAi => 200,
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "googlefree" | "google" => Ok(Self::GoogleFree),
            "openai" => Ok(Self::OpenAi),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Provider selection
    #[serde(default)]
    pub provider: TranslationProvider,

    /// API key (required for the OpenAI-compatible provider)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name for the LLM provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Free translation endpoint
    #[serde(default = "default_google_free_endpoint")]
    pub google_free_endpoint: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            api_key: String::new(),
            base_url: default_openai_base_url(),
            model: default_model(),
            google_free_endpoint: default_google_free_endpoint(),
        }
    }
}

/// Subtitle source endpoints and lookup credentials
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourcesConfig {
    /// Catalog source base URL
    #[serde(default = "default_opensubtitles_endpoint")]
    pub opensubtitles_endpoint: String,

    /// Search source base URL
    #[serde(default = "default_wyzie_endpoint")]
    pub wyzie_endpoint: String,

    /// Episode source base URL
    #[serde(default = "default_gestdown_endpoint")]
    pub gestdown_endpoint: String,

    /// TMDb API key for the show id mapping lookup; the episode source is
    /// skipped when this is empty
    #[serde(default = "String::new")]
    pub tmdb_api_key: String,

    /// Per-request timeout for subtitle source calls, in seconds
    #[serde(default = "default_source_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            opensubtitles_endpoint: default_opensubtitles_endpoint(),
            wyzie_endpoint: default_wyzie_endpoint(),
            gestdown_endpoint: default_gestdown_endpoint(),
            tmdb_api_key: String::new(),
            request_timeout_secs: default_source_timeout_secs(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: log crate level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_subtitles_root() -> PathBuf {
    PathBuf::from("subtitles")
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from("debug")
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_google_free_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_opensubtitles_endpoint() -> String {
    "https://opensubtitles-v3.strem.io".to_string()
}

fn default_wyzie_endpoint() -> String {
    "https://sub.wyzie.ru".to_string()
}

fn default_gestdown_endpoint() -> String {
    "https://api.gestdown.info".to_string()
}

fn default_source_timeout_secs() -> u64 {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            sources: SourcesConfig::default(),
            subtitles_root: default_subtitles_root(),
            public_base_url: default_public_base_url(),
            database_path: None,
            debug_dir: default_debug_dir(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from file if it exists, otherwise write the defaults there
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Config::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }

        let width = self.target_language.trim().len();
        if width != 2 && width != 3 {
            return Err(anyhow!(
                "Target language must be a 2- or 3-letter ISO code, got '{}'",
                self.target_language
            ));
        }

        if self.translation.provider == TranslationProvider::OpenAi
            && self.translation.api_key.trim().is_empty()
        {
            return Err(anyhow!("An API key is required for the OpenAI-compatible provider"));
        }

        Ok(())
    }
}
