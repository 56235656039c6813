use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::TelegramConfig;
use crate::error::{check_status, ClientError, ClientResult};

const SERVICE: &str = "Telegram";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct File {
    file_path: Option<String>,
}

/// Minimal Bot API client: just the calls the weather bot makes.
pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(client: reqwest::Client, config: &TelegramConfig, token: &str) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> ClientResult<()> {
        let request = SendMessage {
            chat_id,
            text,
            reply_to_message_id: reply_to,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;
        check_status(SERVICE, response)?;
        Ok(())
    }

    /// Upload OggOpus audio as a voice note.
    pub async fn send_voice(
        &self,
        chat_id: i64,
        audio: Vec<u8>,
        reply_to: Option<i64>,
    ) -> ClientResult<()> {
        let voice = Part::bytes(audio)
            .file_name("weather.ogg")
            .mime_str("audio/ogg")?;

        let mut form = Form::new().text("chat_id", chat_id.to_string());
        if let Some(id) = reply_to {
            form = form.text("reply_to_message_id", id.to_string());
        }
        let form = form.part("voice", voice);

        let response = self
            .client
            .post(self.method_url("sendVoice"))
            .multipart(form)
            .send()
            .await?;
        check_status(SERVICE, response)?;
        Ok(())
    }

    /// Resolve a file handle to a download URL via `getFile`.
    pub async fn file_url(&self, file_id: &str) -> ClientResult<String> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await?;
        let response = check_status(SERVICE, response)?;

        let body = response.bytes().await?;
        let parsed: ApiResponse<File> = serde_json::from_slice(&body)
            .map_err(|e| ClientError::malformed(SERVICE, e.to_string()))?;

        if !parsed.ok {
            return Err(ClientError::malformed(
                SERVICE,
                parsed
                    .description
                    .unwrap_or_else(|| "getFile returned ok=false".to_string()),
            ));
        }

        let path = parsed
            .result
            .and_then(|f| f.file_path)
            .ok_or_else(|| ClientError::malformed(SERVICE, "getFile without file_path"))?;

        Ok(format!("{}/file/bot{}/{}", self.api_url, self.token, path))
    }

    pub async fn download(&self, url: &str) -> ClientResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = check_status(SERVICE, response)?;
        Ok(response.bytes().await?.to_vec())
    }
}
