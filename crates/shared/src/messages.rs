use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::responses::{CommandReply, ErrorKind};

/// One inbound command, already tokenized by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    Hit {
        target: String,
    },
    Jump {
        target: String,
    },
    SetRespawn,
    /// `amount` is the raw argument; the engine validates it.
    Heal {
        #[serde(default)]
        amount: Option<String>,
    },
    Kill,
    Stats,
    Describe {
        target: String,
    },
}

impl ClientCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hit { .. } => "hit",
            Self::Jump { .. } => "jump",
            Self::SetRespawn => "setrespawn",
            Self::Heal { .. } => "heal",
            Self::Kill => "kill",
            Self::Stats => "stats",
            Self::Describe { .. } => "describe",
        }
    }
}

/// A command issued on behalf of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub actor_id: Uuid,
    pub command: ClientCommand,
}

impl ClientMessage {
    /// Parse one line of JSON.
    pub fn from_json(line: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(line.trim()).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// Everything the engine sends outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once when a driver attaches to a world.
    #[serde(rename_all = "camelCase")]
    Welcome {
        character_id: Uuid,
        room_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    Reply {
        actor_id: Uuid,
        command: String,
        reply: CommandReply,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        actor_id: Option<Uuid>,
        kind: ErrorKind,
        message: String,
    },
    /// A game event addressed to an entity (an actor or a room).
    #[serde(rename_all = "camelCase")]
    Notification {
        recipient: Uuid,
        event_type: String,
        payload: serde_json::Value,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(String),
    #[error("Failed to encode message: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_commands() {
        let actor = Uuid::new_v4();
        let line = format!(
            r#"{{"actorId":"{actor}","command":{{"type":"hit","target":"dummy"}}}}"#
        );
        let msg = ClientMessage::from_json(&line).unwrap();
        assert_eq!(msg.actor_id, actor);
        assert_eq!(
            msg.command,
            ClientCommand::Hit {
                target: "dummy".into()
            }
        );
    }

    #[test]
    fn heal_amount_is_optional() {
        let actor = Uuid::new_v4();
        let line = format!(r#"{{"actorId":"{actor}","command":{{"type":"heal"}}}}"#);
        let msg = ClientMessage::from_json(&line).unwrap();
        assert_eq!(msg.command, ClientCommand::Heal { amount: None });
    }

    #[test]
    fn rejects_unknown_commands() {
        let actor = Uuid::new_v4();
        let line = format!(r#"{{"actorId":"{actor}","command":{{"type":"dance"}}}}"#);
        assert!(matches!(
            ClientMessage::from_json(&line),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn notification_encodes_type_tag() {
        let msg = ServerMessage::Notification {
            recipient: Uuid::nil(),
            event_type: "level_up".into(),
            payload: serde_json::json!({ "level": 2 }),
        };
        let json: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["eventType"], "level_up");
    }
}
