use tracing::{error, info, warn};

use crate::format;
use crate::speech::SpeechClient;
use crate::telegram::TelegramClient;
use crate::update::{Location, Message, Voice};
use crate::weather::WeatherClient;

/// Longest voice note, in seconds, the bot will transcribe.
pub const MAX_VOICE_DURATION_SECS: u32 = 30;

/// Per-update view over the outbound clients. Every handler sends at most one reply.
pub struct Handlers<'a> {
    telegram: &'a TelegramClient,
    weather: &'a WeatherClient,
    speech: &'a SpeechClient,
}

impl<'a> Handlers<'a> {
    pub fn new(
        telegram: &'a TelegramClient,
        weather: &'a WeatherClient,
        speech: &'a SpeechClient,
    ) -> Self {
        Self {
            telegram,
            weather,
            speech,
        }
    }

    /// Send a text reply. Failures are logged, never surfaced.
    async fn reply(&self, chat_id: i64, text: &str, reply_to: Option<i64>) {
        if let Err(e) = self.telegram.send_message(chat_id, text, reply_to).await {
            error!("Failed to send message to chat {}: {}", chat_id, e);
        }
    }

    pub async fn start_help(&self, chat_id: i64) {
        self.reply(chat_id, format::HELP_TEXT, None).await;
    }

    pub async fn unsupported(&self, msg: &Message) {
        self.reply(msg.chat_id(), format::UNSUPPORTED_TEXT, Some(msg.message_id))
            .await;
    }

    /// The whole text is taken as a place name.
    pub async fn text(&self, msg: &Message, text: &str) {
        let reply = match self.weather.by_city(text).await {
            Some(report) => format::text_report(&report),
            None => format::place_not_found(text),
        };
        self.reply(msg.chat_id(), &reply, Some(msg.message_id)).await;
    }

    pub async fn location(&self, msg: &Message, location: &Location) {
        let reply = match self
            .weather
            .by_coordinates(location.latitude, location.longitude)
            .await
        {
            Some(report) => format::text_report(&report),
            None => format::LOCATION_UNKNOWN_TEXT.to_string(),
        };
        self.reply(msg.chat_id(), &reply, Some(msg.message_id)).await;
    }

    /// Transcribe the voice note, look the place up and answer with speech.
    pub async fn voice(&self, msg: &Message, voice: &Voice) {
        let chat_id = msg.chat_id();
        let reply_to = Some(msg.message_id);

        if voice.duration > MAX_VOICE_DURATION_SECS {
            info!(
                "Voice message {} is {}s long, over the {}s limit",
                msg.message_id, voice.duration, MAX_VOICE_DURATION_SECS
            );
            self.reply(chat_id, format::VOICE_TOO_LONG_TEXT, reply_to)
                .await;
            return;
        }

        let Some(place) = self.recognize(voice).await else {
            self.reply(chat_id, format::VOICE_NOT_RECOGNIZED_TEXT, reply_to)
                .await;
            return;
        };
        info!("Recognized voice message {} as '{}'", msg.message_id, place);

        let Some(report) = self.weather.by_city(&place).await else {
            self.reply(chat_id, &format::place_not_found(&place), reply_to)
                .await;
            return;
        };

        let spoken = format::voice_report(&place, &report);
        // TODO: decide on a text fallback when synthesis fails; the user currently gets no reply.
        let Some(audio) = self.speech.synthesize(&spoken).await else {
            warn!(
                "No voice reply for message {} in chat {}: synthesis failed",
                msg.message_id, chat_id
            );
            return;
        };

        if let Err(e) = self.telegram.send_voice(chat_id, audio, reply_to).await {
            error!("Failed to send voice to chat {}: {}", chat_id, e);
        }
    }

    // Download the clip into memory and run it through ASR.
    async fn recognize(&self, voice: &Voice) -> Option<String> {
        let audio = match self.download_voice(&voice.file_id).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Failed to fetch voice file {}: {}", voice.file_id, e);
                return None;
            }
        };
        self.speech.transcribe(audio).await
    }

    async fn download_voice(&self, file_id: &str) -> crate::error::ClientResult<Vec<u8>> {
        let url = self.telegram.file_url(file_id).await?;
        self.telegram.download(&url).await
    }
}
