//! Configuration loading for the writing coach.
//!
//! Read-only TOML at `~/.scribe/config.toml` with two tables:
//!
//! ```toml
//! [app]
//! model = "claude-3-5-sonnet-20241022"
//! max_tokens = 1024
//! temperature = 0.7
//!
//! [api_keys]
//! anthropic = "${ANTHROPIC_API_KEY}"
//! ```
//!
//! API key values support `${ENV_VAR}` references so the key itself never
//! has to live in the file.

use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct ScribeConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub anthropic: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let anthropic = if self.anthropic.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys")
            .field("anthropic", &anthropic)
            .finish()
    }
}

/// Replace `${VAR}` references with the environment variable's value.
///
/// Missing variables expand to the empty string; an unclosed `${` is left
/// as-is.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let var = &after_open[..close];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}

impl ScribeConfig {
    /// Load the config file, if one exists.
    ///
    /// A missing file is `Ok(None)`; unreadable or unparseable files are
    /// reported so the caller can tell the user which file is broken.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    /// The configured Anthropic key after env expansion, or the
    /// `ANTHROPIC_API_KEY` environment variable as a fallback.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_keys
            .as_ref()
            .and_then(|keys| keys.anthropic.as_deref())
            .map(expand_env_vars)
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scribe").join("config.toml"))
}
