use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub twingraph: TwingraphConfig,
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct TwingraphConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TwingraphConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Text generation service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAI,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::OpenAI => "https://api.openai.com/v1",
        }
    }
}

/// Text generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key_env: String,
    /// Overrides the provider's public endpoint (proxies, local gateways).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GeneratorConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Render export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Fixed colour seed; colours are random per render when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            seed: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_output_path() -> PathBuf {
    PathBuf::from("graph.json")
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in TWINGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("TWINGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Load and validate a specific config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.generator.model.trim().is_empty() {
            anyhow::bail!("generator.model must not be empty");
        }

        if self.generator.timeout_secs == 0 {
            anyhow::bail!("generator.timeout_secs must be greater than 0");
        }

        self.api_key()?;

        Ok(())
    }

    /// Read the generator API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.generator.api_key_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable with your {:?} API key.",
                self.generator.api_key_env, self.generator.provider
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_KEY_ENV: &str = "TWINGRAPH_TEST_API_KEY";

    fn test_config(provider: &str) -> String {
        format!(
            r#"
[twingraph]
log_level = "debug"

[generator]
provider = "{}"
model = "gemini-1.5-flash"
api_key_env = "{}"
timeout_secs = 30

[render]
output_path = "out/graph.json"
seed = 7
"#,
            provider, TEST_KEY_ENV
        )
    }

    fn write_config(temp_dir: &TempDir, content: &str) -> PathBuf {
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn with_api_key(api_key: Option<&str>, f: impl FnOnce()) {
        let original = std::env::var(TEST_KEY_ENV).ok();
        match api_key {
            Some(k) => std::env::set_var(TEST_KEY_ENV, k),
            None => std::env::remove_var(TEST_KEY_ENV),
        }
        f();
        std::env::remove_var(TEST_KEY_ENV);
        if let Some(val) = original {
            std::env::set_var(TEST_KEY_ENV, val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, &test_config("gemini"));
        with_api_key(Some("test-key"), || {
            let config = Config::from_file(&path);
            assert!(config.is_ok(), "Config::from_file() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.twingraph.log_level, "debug");
            assert_eq!(config.generator.provider, Provider::Gemini);
            assert_eq!(config.generator.timeout_secs, 30);
            assert_eq!(config.render.seed, Some(7));
            assert_eq!(config.render.output_path, PathBuf::from("out/graph.json"));
            assert_eq!(config.api_key().unwrap(), "test-key");
        });
    }

    #[test]
    fn test_config_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = format!(
            "[generator]\nprovider = \"openai\"\nmodel = \"gpt-4o-mini\"\napi_key_env = \"{}\"\n",
            TEST_KEY_ENV
        );
        let path = write_config(&temp_dir, &content);
        with_api_key(Some("k"), || {
            let config = Config::from_file(&path).unwrap();
            assert_eq!(config.twingraph.log_level, "info");
            assert_eq!(config.generator.timeout_secs, 120);
            assert_eq!(config.generator.base_url(), "https://api.openai.com/v1");
            assert_eq!(config.render.output_path, PathBuf::from("graph.json"));
            assert!(config.render.seed.is_none());
        });
    }

    #[test]
    fn test_config_missing_api_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, &test_config("gemini"));
        with_api_key(None, || {
            let config = Config::from_file(&path);
            assert!(config.is_err(), "Expected missing API key error");
            assert!(config.unwrap_err().to_string().contains(TEST_KEY_ENV));
        });
    }

    #[test]
    fn test_config_unknown_provider() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, &test_config("carrier-pigeon"));
        with_api_key(Some("k"), || {
            assert!(Config::from_file(&path).is_err());
        });
    }

    #[test]
    fn test_config_zero_timeout_rejected() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = test_config("gemini").replace("timeout_secs = 30", "timeout_secs = 0");
        let path = write_config(&temp_dir, &content);
        with_api_key(Some("k"), || {
            let err = Config::from_file(&path).unwrap_err();
            assert!(err.to_string().contains("timeout_secs"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("TWINGRAPH_CONFIG").ok();
        std::env::set_var("TWINGRAPH_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("TWINGRAPH_CONFIG");
        if let Some(v) = original {
            std::env::set_var("TWINGRAPH_CONFIG", v);
        }
    }
}
