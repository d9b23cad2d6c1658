use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A character's own statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub id: Uuid,
    pub name: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub respawn_point: Option<Uuid>,
}

/// What a looker sees on a world object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectView {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub health: Option<u32>,
    pub max_health: Option<u32>,
    /// Hits taken, hits endured or victims claimed, depending on kind.
    pub counter: Option<u64>,
}

/// Successful result of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CommandReply {
    #[serde(rename_all = "camelCase")]
    Hit {
        target: Uuid,
        experience: u64,
        level: u32,
        leveled_up: bool,
        target_health: Option<u32>,
        destroyed: bool,
    },
    #[serde(rename_all = "camelCase")]
    Jumped { respawned_at: Option<Uuid> },
    #[serde(rename_all = "camelCase")]
    RespawnSet { location: Uuid },
    #[serde(rename_all = "camelCase")]
    Healed { amount: u32, health: u32, max_health: u32 },
    AlreadyFullHealth,
    #[serde(rename_all = "camelCase")]
    Died { respawned_at: Option<Uuid> },
    Stats(StatsView),
    Object(ObjectView),
}

/// Error taxonomy exposed to the initiating actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Precondition,
    Unavailable,
}
