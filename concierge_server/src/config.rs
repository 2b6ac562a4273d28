use std::env;

use chrono::Duration;
use log::*;
use vgx_common::Secret;

const DEFAULT_VGX_HOST: &str = "127.0.0.1";
const DEFAULT_VGX_PORT: u16 = 8360;
const DEFAULT_ACCESS_TOKEN_LIFETIME: Duration = Duration::hours(24);
const DEFAULT_ASSISTANT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Configuration for the opaque chat-completion provider behind the guest assistant.
    pub assistant: AssistantConfig,
    /// Configuration for the weather provider.
    pub weather: WeatherConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VGX_HOST.to_string(),
            port: DEFAULT_VGX_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            assistant: AssistantConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("VGX_HOST").ok().unwrap_or_else(|| DEFAULT_VGX_HOST.into());
        let port = env::var("VGX_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for VGX_PORT. {e} Using the default, {DEFAULT_VGX_PORT}, instead."
                    );
                    DEFAULT_VGX_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_VGX_PORT);
        let database_url = env::var("VGX_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ VGX_DATABASE_URL is not set. Please set it to the URL for the gateway database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|| {
            warn!(
                "🪛️ VGX_JWT_SECRET is not set. Reverting to the default signing secret. Tokens issued with it are \
                 worthless as protection, so do not do this in production."
            );
            AuthConfig::default()
        });
        let assistant = AssistantConfig::from_env_or_defaults();
        let weather = WeatherConfig::from_env_or_defaults();
        Self { host, port, database_url, auth, assistant, weather }
    }
}

//--------------------------------------     AuthConfig     ----------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC secret access tokens are signed and verified with.
    pub jwt_secret: Secret<String>,
    /// How long an issued access token stays valid.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Secret::new("insecure-development-secret".to_string()),
            token_lifetime: DEFAULT_ACCESS_TOKEN_LIFETIME,
        }
    }
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()), ..Default::default() }
    }

    pub fn try_from_env() -> Option<Self> {
        let jwt_secret = env::var("VGX_JWT_SECRET").ok().filter(|s| !s.trim().is_empty())?;
        let token_lifetime = env::var("VGX_TOKEN_LIFETIME_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Duration::hours)
            .unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME);
        Some(Self { jwt_secret: Secret::new(jwt_secret), token_lifetime })
    }
}

//--------------------------------------  AssistantConfig   ----------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct AssistantConfig {
    /// The chat-completions endpoint to call.
    pub api_url: String,
    /// The provider API key. When empty, the assistant endpoint reports itself unavailable rather
    /// than failing requests downstream.
    pub api_key: Secret<String>,
    pub model: String,
}

impl AssistantConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_url = env::var("VGX_ASSISTANT_API_URL").ok().unwrap_or_else(|| DEFAULT_ASSISTANT_URL.into());
        let api_key = env::var("VGX_ASSISTANT_API_KEY").ok().unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!("🪛️ VGX_ASSISTANT_API_KEY is not set. The guest assistant will be disabled.");
        }
        let model = env::var("VGX_ASSISTANT_MODEL").ok().unwrap_or_else(|| DEFAULT_ASSISTANT_MODEL.into());
        Self { api_url, api_key: Secret::new(api_key.trim().to_string()), model }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.reveal().is_empty()
    }
}

//--------------------------------------   WeatherConfig    ----------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct WeatherConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
}

impl WeatherConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_url = env::var("VGX_WEATHER_API_URL").ok().unwrap_or_else(|| DEFAULT_WEATHER_URL.into());
        let api_key = env::var("VGX_WEATHER_API_KEY").ok().unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!("🪛️ VGX_WEATHER_API_KEY is not set. Weather lookups will fail until it is provided.");
        }
        Self { api_url, api_key: Secret::new(api_key.trim().to_string()) }
    }
}
