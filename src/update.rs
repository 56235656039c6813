//! Inbound webhook payload.
//!
//! Only the fields the bot reacts to are modelled; everything else Telegram
//! sends is ignored by serde.

use serde::Deserialize;

/// Commands answered with the capability description.
pub const HELP_COMMANDS: [&str; 2] = ["/start", "/help"];

#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<Voice>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Voice {
    pub file_id: String,
    /// Seconds, as reported by the sender's client.
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// What a message carries, in the order the bot checks for it.
#[derive(Debug)]
pub enum MessageKind<'a> {
    Command,
    Text(&'a str),
    Voice(&'a Voice),
    Location(&'a Location),
    Unsupported,
}

impl MessageKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::Text(_) => "text",
            MessageKind::Voice(_) => "voice",
            MessageKind::Location(_) => "location",
            MessageKind::Unsupported => "unsupported",
        }
    }
}

impl Message {
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    pub fn kind(&self) -> MessageKind<'_> {
        if let Some(text) = self.text.as_deref() {
            if HELP_COMMANDS.contains(&text) {
                return MessageKind::Command;
            }
            return MessageKind::Text(text);
        }
        if let Some(voice) = &self.voice {
            return MessageKind::Voice(voice);
        }
        if let Some(location) = &self.location {
            return MessageKind::Location(location);
        }
        MessageKind::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_update_without_message() {
        let update = parse(r#"{"update_id": 10, "edited_message": {"message_id": 1}}"#);
        assert!(update.message.is_none());
    }

    #[test]
    fn test_help_commands() {
        for cmd in ["/start", "/help"] {
            let json = format!(
                r#"{{"message":{{"chat":{{"id":1}},"message_id":5,"text":"{cmd}"}}}}"#
            );
            let msg = parse(&json).message.unwrap();
            assert!(matches!(msg.kind(), MessageKind::Command));
            assert_eq!(msg.chat_id(), 1);
            assert_eq!(msg.message_id, 5);
        }
    }

    #[test]
    fn test_command_must_match_exactly() {
        let msg = parse(r#"{"message":{"chat":{"id":1},"message_id":5,"text":"/start now"}}"#)
            .message
            .unwrap();
        assert!(matches!(msg.kind(), MessageKind::Text("/start now")));
    }

    #[test]
    fn test_plain_text() {
        let msg = parse(r#"{"message":{"chat":{"id":1},"message_id":5,"text":"Москва"}}"#)
            .message
            .unwrap();
        assert!(matches!(msg.kind(), MessageKind::Text("Москва")));
    }

    #[test]
    fn test_voice() {
        let msg = parse(
            r#"{"message":{"chat":{"id":7},"message_id":2,
                "voice":{"file_id":"AwAD","file_unique_id":"u","duration":12,"mime_type":"audio/ogg"}}}"#,
        )
        .message
        .unwrap();
        match msg.kind() {
            MessageKind::Voice(voice) => {
                assert_eq!(voice.file_id, "AwAD");
                assert_eq!(voice.duration, 12);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_location() {
        let msg = parse(
            r#"{"message":{"chat":{"id":7},"message_id":2,
                "location":{"latitude":55.75,"longitude":37.62}}}"#,
        )
        .message
        .unwrap();
        match msg.kind() {
            MessageKind::Location(loc) => {
                assert_eq!(loc.latitude, 55.75);
                assert_eq!(loc.longitude, 37.62);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_text_wins_over_location() {
        let msg = parse(
            r#"{"message":{"chat":{"id":7},"message_id":2,"text":"Казань",
                "location":{"latitude":1.0,"longitude":2.0}}}"#,
        )
        .message
        .unwrap();
        assert_eq!(msg.kind().name(), "text");
    }

    #[test]
    fn test_sticker_is_unsupported() {
        let msg = parse(
            r#"{"message":{"chat":{"id":7},"message_id":2,"sticker":{"file_id":"x"}}}"#,
        )
        .message
        .unwrap();
        assert!(matches!(msg.kind(), MessageKind::Unsupported));
    }

    #[test]
    fn test_message_without_chat_is_rejected() {
        let result: Result<Update, _> =
            serde_json::from_str(r#"{"message":{"message_id":5,"text":"hi"}}"#);
        assert!(result.is_err());
    }
}
