use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handlers::Handlers;
use crate::speech::SpeechClient;
use crate::telegram::TelegramClient;
use crate::update::{MessageKind, Update};
use crate::weather::WeatherClient;

/// What the function runtime gets back. Always 200 with an empty body:
/// anything else makes Telegram redeliver the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl FunctionResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: String::new(),
        }
    }
}

/// Process-wide state, built once at startup and never mutated.
pub struct AppState {
    pub config: Config,
    telegram: Option<TelegramClient>,
    weather: WeatherClient,
    speech: SpeechClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::new();
        let telegram = config
            .bot_token()
            .map(|token| TelegramClient::new(client.clone(), &config.telegram, token));
        let weather = WeatherClient::new(client.clone(), config.weather.clone());
        let speech = SpeechClient::new(client, config.speech.clone());

        Self {
            config,
            telegram,
            weather,
            speech,
        }
    }
}

/// Handle one serialized update end to end.
pub async fn handle_update(state: &AppState, body: &str) -> FunctionResponse {
    let Some(telegram) = state.telegram.as_ref() else {
        warn!("TELEGRAM_BOT_TOKEN is not set, ignoring update");
        return FunctionResponse::ok();
    };

    let update: Update = match serde_json::from_str(body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring unparseable update: {}", e);
            return FunctionResponse::ok();
        }
    };

    let Some(message) = update.message else {
        debug!("Update carries no message, nothing to do");
        return FunctionResponse::ok();
    };

    let kind = message.kind();
    info!(
        "Message {} in chat {} ({})",
        message.message_id,
        message.chat_id(),
        kind.name()
    );

    let handlers = Handlers::new(telegram, &state.weather, &state.speech);
    match kind {
        MessageKind::Command => handlers.start_help(message.chat_id()).await,
        MessageKind::Text(text) => handlers.text(&message, text).await,
        MessageKind::Voice(voice) => handlers.voice(&message, voice).await,
        MessageKind::Location(location) => handlers.location(&message, location).await,
        MessageKind::Unsupported => handlers.unsupported(&message).await,
    }

    FunctionResponse::ok()
}
