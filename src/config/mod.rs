//! Configuration management.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `PREPRINT_DIGEST_` (nested keys use
//! `__`, e.g. `PREPRINT_DIGEST_LLM__MODEL=qwen-plus`).
//!
//! ```toml
//! [llm]
//! base_url = "https://dashscope.aliyuncs.com/compatible-mode/v1"
//! api_key = "sk-..."
//! model = "qwen3-max"
//! temperature = 0.2
//! timeout_secs = 120
//!
//! [pipeline]
//! pacing_ms = 1000
//! output_dir = "."
//!
//! [sources]
//! default_arxiv_categories = ["cs.AI", "cs.LG"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PREPRINT_DIGEST";

/// Environment variables consulted for the API key when none is configured
pub const API_KEY_FALLBACK_VARS: &[&str] = &["OPENAI_API_KEY", "DASHSCOPE_API_KEY"];

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "preprint-digest.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion service settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Run settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Source endpoints and defaults
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the completion service
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, kept low for repeatable scores
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_model() -> String {
    "qwen3-max".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_llm_timeout() -> u64 {
    120
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Delay between successive completion calls, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Directory the report files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            output_dir: default_output_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

fn default_pacing_ms() -> u64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_arxiv_api_url")]
    pub arxiv_api_url: String,

    #[serde(default = "default_biorxiv_api_url")]
    pub biorxiv_api_url: String,

    /// arXiv categories queried when none are given on the command line
    #[serde(default = "default_arxiv_categories")]
    pub default_arxiv_categories: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            arxiv_api_url: default_arxiv_api_url(),
            biorxiv_api_url: default_biorxiv_api_url(),
            default_arxiv_categories: default_arxiv_categories(),
        }
    }
}

fn default_arxiv_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_biorxiv_api_url() -> String {
    "https://api.biorxiv.org".to_string()
}

fn default_arxiv_categories() -> Vec<String> {
    vec!["cs.AI".to_string(), "cs.LG".to_string()]
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("sources.default_arxiv_categories"),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.llm.api_key = resolve_api_key(config.llm.api_key.take(), |var| std::env::var(var).ok());
    Ok(config)
}

/// Pick the configured key, or the first non-blank fallback variable
fn resolve_api_key<F>(configured: Option<String>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |key: &String| !key.trim().is_empty();

    configured.filter(is_set).or_else(|| {
        API_KEY_FALLBACK_VARS
            .iter()
            .find_map(|var| lookup(*var).filter(is_set))
    })
}

/// Locate a configuration file in the working directory or the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("preprint-digest").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "qwen3-max");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.pipeline.pacing(), Duration::from_secs(1));
        assert_eq!(config.sources.default_arxiv_categories, vec!["cs.AI", "cs.LG"]);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[llm]
base_url = "http://localhost:11434/v1"
api_key = "test-key"
model = "qwen2.5:7b"

[pipeline]
pacing_ms = 0
output_dir = "/tmp/digests"

[sources]
default_arxiv_categories = ["q-bio.GN"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.pipeline.pacing_ms, 0);
        assert_eq!(config.pipeline.output_dir, PathBuf::from("/tmp/digests"));
        assert_eq!(config.sources.default_arxiv_categories, vec!["q-bio.GN"]);
        assert_eq!(config.sources.biorxiv_api_url, "https://api.biorxiv.org");
    }

    #[test]
    fn test_blank_api_key_uses_fallback() {
        let env = |var: &str| match var {
            "OPENAI_API_KEY" => Some("  ".to_string()),
            "DASHSCOPE_API_KEY" => Some("sk-dashscope".to_string()),
            _ => None,
        };

        assert_eq!(
            resolve_api_key(Some(String::new()), env).as_deref(),
            Some("sk-dashscope")
        );
        assert_eq!(resolve_api_key(None, env).as_deref(), Some("sk-dashscope"));
        assert_eq!(
            resolve_api_key(Some("sk-file".to_string()), env).as_deref(),
            Some("sk-file")
        );
        assert_eq!(resolve_api_key(Some(" ".to_string()), |_| None), None);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/preprint-digest.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
