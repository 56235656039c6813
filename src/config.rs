use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Without a token every update is acknowledged and ignored.
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_stt_url")]
    pub stt_url: String,
    #[serde(default = "default_tts_url")]
    pub tts_url: String,
    #[serde(default = "default_voice")]
    pub voice: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_weather_api_url() -> String {
    "http://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_stt_url() -> String {
    "https://stt.api.cloud.yandex.net/speech/v1/stt:recognize".to_string()
}

fn default_tts_url() -> String {
    "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize".to_string()
}

fn default_voice() -> String {
    "oksana".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: default_telegram_api_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_weather_api_url(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            stt_url: default_stt_url(),
            tts_url: default_tts_url(),
            voice: default_voice(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Load the TOML file at `path` (defaults if it does not exist), then
    /// apply overrides from the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        // `bot_token = ""` is as good as no token at all
        if config.telegram.bot_token.as_deref().is_some_and(str::is_empty) {
            config.telegram.bot_token = None;
        }
        Ok(config)
    }

    /// Secrets and the listen port can come from the environment, which is how
    /// serverless runtimes hand them over. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Some(key) = get("OPENWEATHER_API_KEY") {
            self.weather.api_key = key;
        }
        if let Some(key) = get("YANDEX_SPEECHKIT_API_KEY") {
            self.speech.api_key = key;
        }
        if let Some(port) = get("PORT") {
            self.server.listen = format!("0.0.0.0:{}", port.trim());
        }
    }

    pub fn bot_token(&self) -> Option<&str> {
        self.telegram.bot_token.as_deref()
    }
}
