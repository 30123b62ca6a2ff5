use std::env;
use std::fmt;

use anyhow::Context;

pub const DEFAULT_LOG_FILTER: &str = "party_planner_svc=info,tower_http=debug,axum::rejection=info";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which upstream generation service the planner talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenRouter,
}

impl Provider {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openrouter" => Ok(Provider::OpenRouter),
            other => Err(anyhow::anyhow!(
                "Unknown PLANNER_PROVIDER '{}', expected 'gemini' or 'openrouter'",
                other
            )),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub provider: Provider,
    pub model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub openrouter_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port
            .parse()
            .with_context(|| format!("PORT must be a valid number, got '{}'", port))?;

        let provider = match env::var("PLANNER_PROVIDER") {
            Ok(value) => Provider::parse(&value)?,
            Err(_) => Provider::Gemini,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            provider,
            model: env::var("PLANNER_MODEL")
                .unwrap_or_else(|_| provider.default_model().to_string()),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_api_base: env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn redact(key: &Option<String>) -> &'static str {
    if key.is_some() { "***API_KEY***" } else { "<unset>" }
}

// Keys never reach the logs; main prints the config at startup.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_api_base", &self.gemini_api_base)
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .finish()
    }
}
