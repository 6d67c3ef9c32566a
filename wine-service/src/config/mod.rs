use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_KEEP_WARM_INTERVAL_SECS: u64 = 600;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct WineConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub supabase: SupabaseConfig,
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub cors: CorsConfig,
    pub keep_warm: KeepWarmConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub wine_table: String,
    pub feedback_table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Empty when the provider is not configured; calls then fail with
    /// `ProviderError::NotConfigured`.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeepWarmConfig {
    pub url: Option<String>,
    pub interval_secs: u64,
    pub autostart: bool,
}

impl KeepWarmConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl WineConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout_secs = parse_or(
            get_env(
                "PROVIDER_TIMEOUT_SECS",
                Some(&DEFAULT_PROVIDER_TIMEOUT_SECS.to_string()),
                is_prod,
            )?,
            DEFAULT_PROVIDER_TIMEOUT_SECS,
        );

        Ok(WineConfig {
            common: common_config,
            supabase: SupabaseConfig {
                url: get_env("SUPABASE_URL", None, is_prod)?,
                anon_key: get_env("SUPABASE_ANON_KEY", None, is_prod)?,
                wine_table: get_env("WINE_TABLE", Some("wine"), is_prod)?,
                feedback_table: get_env("FEEDBACK_TABLE", Some("wine_feedback"), is_prod)?,
            },
            openai: ProviderConfig {
                api_key: get_env("OPENAI_API_KEY", Some(""), is_prod)?,
                model: get_env("OPENAI_MODEL", Some("gpt-4o"), is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some("https://api.openai.com/v1"), is_prod)?,
                timeout_secs,
            },
            deepseek: ProviderConfig {
                api_key: get_env("DEEPSEEK_API_KEY", Some(""), is_prod)?,
                model: get_env("DEEPSEEK_MODEL", Some("deepseek-chat"), is_prod)?,
                base_url: get_env("DEEPSEEK_BASE_URL", Some("https://api.deepseek.com"), is_prod)?,
                timeout_secs,
            },
            cors: CorsConfig {
                allowed_origin: get_env("APP_URL", Some("http://localhost:3000"), is_prod)?,
            },
            keep_warm: KeepWarmConfig {
                url: env::var("KEEP_WARM_URL").ok().filter(|url| !url.is_empty()),
                interval_secs: parse_or(
                    get_env(
                        "KEEP_WARM_INTERVAL_SECS",
                        Some(&DEFAULT_KEEP_WARM_INTERVAL_SECS.to_string()),
                        is_prod,
                    )?,
                    DEFAULT_KEEP_WARM_INTERVAL_SECS,
                )
                .max(1),
                autostart: get_env("KEEP_WARM_AUTOSTART", Some("false"), is_prod)?
                    .eq_ignore_ascii_case("true"),
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|url| !url.is_empty()),
        })
    }
}

fn parse_or(value: String, default: u64) -> u64 {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(value = %value, default, "Invalid numeric setting, using default");
        default
    })
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
