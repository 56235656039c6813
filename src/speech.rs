use serde::Deserialize;
use tracing::warn;

use crate::config::SpeechConfig;
use crate::error::{check_status, ClientError, ClientResult};

const SERVICE: &str = "SpeechKit";
const LANGUAGE: &str = "ru-RU";

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(default)]
    result: Option<String>,
}

/// Speech recognition and synthesis over the SpeechKit v1 REST API.
pub struct SpeechClient {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(client: reqwest::Client, config: SpeechConfig) -> Self {
        Self { client, config }
    }

    fn auth_header(&self) -> String {
        format!("Api-Key {}", self.config.api_key)
    }

    /// Recognized text of an OggOpus clip, or `None` if nothing usable came back.
    pub async fn transcribe(&self, audio: Vec<u8>) -> Option<String> {
        match self.recognize(audio).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Speech recognition failed: {}", e);
                None
            }
        }
    }

    /// Synthesized OggOpus audio for `text`, or `None` on failure.
    pub async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        match self.tts(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                None
            }
        }
    }

    async fn recognize(&self, audio: Vec<u8>) -> ClientResult<String> {
        let response = self
            .client
            .post(&self.config.stt_url)
            .query(&[("lang", LANGUAGE)])
            .header("Authorization", self.auth_header())
            .body(audio)
            .send()
            .await?;
        let response = check_status(SERVICE, response)?;

        let body = response.bytes().await?;
        let parsed: RecognitionResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::malformed(SERVICE, e.to_string()))?;

        parsed
            .result
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ClientError::malformed(SERVICE, "no recognition result"))
    }

    async fn tts(&self, text: &str) -> ClientResult<Vec<u8>> {
        let form = [
            ("text", text),
            ("lang", LANGUAGE),
            ("voice", self.config.voice.as_str()),
            ("format", "oggopus"),
        ];

        let response = self
            .client
            .post(&self.config.tts_url)
            .header("Authorization", self.auth_header())
            .form(&form)
            .send()
            .await?;
        let response = check_status(SERVICE, response)?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SpeechClient {
        SpeechClient::new(
            reqwest::Client::new(),
            SpeechConfig {
                api_key: "yc-key".to_string(),
                stt_url: format!("{}/speech/v1/stt:recognize", server.uri()),
                tts_url: format!("{}/speech/v1/tts:synthesize", server.uri()),
                voice: "oksana".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_transcribe_posts_raw_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech/v1/stt:recognize"))
            .and(query_param("lang", "ru-RU"))
            .and(header("Authorization", "Api-Key yc-key"))
            .and(body_bytes(b"OggS-audio".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "Казань"})))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).transcribe(b"OggS-audio".to_vec()).await;
        assert_eq!(text.as_deref(), Some("Казань"));
    }

    #[tokio::test]
    async fn test_transcribe_without_result_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert!(client_for(&server).transcribe(vec![1, 2, 3]).await.is_none());
    }

    #[tokio::test]
    async fn test_transcribe_empty_result_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": ""})))
            .mount(&server)
            .await;

        assert!(client_for(&server).transcribe(vec![1, 2, 3]).await.is_none());
    }

    #[tokio::test]
    async fn test_transcribe_keeps_whitespace_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": " "})))
            .mount(&server)
            .await;

        let text = client_for(&server).transcribe(vec![1, 2, 3]).await;
        assert_eq!(text.as_deref(), Some(" "));
    }

    #[tokio::test]
    async fn test_transcribe_error_status_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert!(client_for(&server).transcribe(vec![1, 2, 3]).await.is_none());
    }

    #[tokio::test]
    async fn test_synthesize_sends_form_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech/v1/tts:synthesize"))
            .and(header("Authorization", "Api-Key yc-key"))
            .and(body_string_contains("lang=ru-RU"))
            .and(body_string_contains("voice=oksana"))
            .and(body_string_contains("format=oggopus"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS-speech".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let audio = client_for(&server).synthesize("Погода").await;
        assert_eq!(audio, Some(b"OggS-speech".to_vec()));
    }

    #[tokio::test]
    async fn test_synthesize_error_status_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(client_for(&server).synthesize("Погода").await.is_none());
    }
}
