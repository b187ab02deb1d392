use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Model tried first for every generation request.
const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Model tried when the primary cannot be resolved.
const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Gemini REST API.
const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default location of the prompt/response log.
const DEFAULT_PROMPT_LOG_PATH: &str = "data.json";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub prompt_log: PromptLogSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone)]
pub struct PromptLogSettings {
    pub path: PathBuf,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RelayConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                primary_model: get_env(
                    "GEMINI_PRIMARY_MODEL",
                    Some(DEFAULT_PRIMARY_MODEL),
                    is_prod,
                )?,
                fallback_model: get_env(
                    "GEMINI_FALLBACK_MODEL",
                    Some(DEFAULT_FALLBACK_MODEL),
                    is_prod,
                )?,
                api_base_url: get_env("GEMINI_API_BASE_URL", Some(DEFAULT_API_BASE_URL), is_prod)?,
            },
            prompt_log: PromptLogSettings {
                path: get_env("PROMPT_LOG_PATH", Some(DEFAULT_PROMPT_LOG_PATH), is_prod)?.into(),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
