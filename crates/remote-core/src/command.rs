//! Commands understood by the controller and their event mapping

use serde_json::{Number, Value};

use crate::link::ControllerEvent;

/// Event used both to request and to deliver the now-playing status
pub const NOW_PLAYING_EVENT: &str = "playing-status";

/// Event carrying bulk equalizer band values
pub const UPDATE_EQUALIZER_EVENT: &str = "update-equalizer";

/// Event selecting a named equalizer preset
pub const SET_EQUALIZER_EVENT: &str = "set-equalizer";

/// Whether the issuer expects a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    /// Success means "accepted for delivery", not "applied"
    FireAndForget,
    /// Exactly one reply is expected on `reply_event`
    Query { reply_event: &'static str },
}

/// A one-way instruction for the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Previous,
    Pause,
    PlayPause,
    Stop,
    Play,
    Mute,
    /// Numbers are kept exactly as the caller sent them
    Volume(Number),
    Seek(Number),
    UpdateEqualizer(Vec<Number>),
    SetEqualizer(String),
    NowPlaying,
}

impl Command {
    /// Name of the event sent to the controller
    pub fn event_name(&self) -> &'static str {
        match self {
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Pause => "pause",
            Command::PlayPause => "playpause",
            Command::Stop => "stop",
            Command::Play => "play",
            Command::Mute => "mute",
            Command::Volume(_) => "volume",
            // Deliberately "seek"; controllers listening on "send" must be updated
            Command::Seek(_) => "seek",
            Command::UpdateEqualizer(_) => UPDATE_EQUALIZER_EVENT,
            Command::SetEqualizer(_) => SET_EQUALIZER_EVENT,
            Command::NowPlaying => NOW_PLAYING_EVENT,
        }
    }

    pub fn payload(&self) -> Option<Value> {
        match self {
            Command::Volume(value) | Command::Seek(value) => Some(Value::Number(value.clone())),
            Command::UpdateEqualizer(values) => Some(Value::Array(
                values.iter().cloned().map(Value::Number).collect(),
            )),
            Command::SetEqualizer(name) => Some(Value::String(name.clone())),
            _ => None,
        }
    }

    pub fn mode(&self) -> CommandMode {
        match self {
            Command::NowPlaying => CommandMode::Query {
                reply_event: NOW_PLAYING_EVENT,
            },
            _ => CommandMode::FireAndForget,
        }
    }

    /// Event as it goes onto the link
    pub fn to_event(&self) -> ControllerEvent {
        ControllerEvent::new(self.event_name(), self.payload())
    }
}

/// What the gateway hands back after executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Fire-and-forget command queued for the controller
    Accepted,
    /// Reply payload of a query command
    Reply(Value),
}

impl CommandOutcome {
    pub fn into_reply(self) -> Option<Value> {
        match self {
            CommandOutcome::Reply(value) => Some(value),
            CommandOutcome::Accepted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transport_commands_have_no_payload() {
        for command in [
            Command::Next,
            Command::Previous,
            Command::Pause,
            Command::PlayPause,
            Command::Stop,
            Command::Play,
            Command::Mute,
        ] {
            assert_eq!(command.payload(), None, "{:?}", command);
            assert_eq!(command.mode(), CommandMode::FireAndForget);
        }
    }

    #[test]
    fn test_play_pause_event_name() {
        assert_eq!(Command::PlayPause.event_name(), "playpause");
    }

    #[test]
    fn test_value_payloads() {
        let event = Command::Volume(42.into()).to_event();
        assert_eq!(event.event, "volume");
        assert_eq!(event.payload, Some(json!(42)));

        let event = Command::SetEqualizer("Rock".to_string()).to_event();
        assert_eq!(event.event, "set-equalizer");
        assert_eq!(event.payload, Some(json!("Rock")));

        let bands = vec![Number::from(1), Number::from_f64(-2.5).unwrap()];
        let event = Command::UpdateEqualizer(bands).to_event();
        assert_eq!(event.payload, Some(json!([1, -2.5])));
    }

    #[test]
    fn test_numbers_keep_their_encoding() {
        let value: Number = serde_json::from_str("35").unwrap();
        let event = Command::Volume(value).to_event();
        assert_eq!(serde_json::to_string(&event).unwrap(), r#"{"event":"volume","payload":35}"#);

        let value: Number = serde_json::from_str("93.5").unwrap();
        let event = Command::Seek(value).to_event();
        assert_eq!(event.event, "seek");
        assert_eq!(event.payload, Some(json!(93.5)));
    }

    #[test]
    fn test_now_playing_is_query_on_its_own_event() {
        assert_eq!(
            Command::NowPlaying.mode(),
            CommandMode::Query {
                reply_event: "playing-status"
            }
        );
        assert_eq!(Command::NowPlaying.event_name(), "playing-status");
    }
}
