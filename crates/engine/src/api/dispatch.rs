//! Protocol translation.
//!
//! Maps `ClientCommand`s onto the command surface and turns results,
//! errors and notifications into `ServerMessage`s. No game rules live here.

use emberhold_domain::{EntityId, HealOutcome, HitOutcome, Notification};
use emberhold_shared::{ClientCommand, CommandReply, ServerMessage};

use crate::use_cases::{CommandError, GameCommands};
use crate::world::World;

/// Run one protocol command against the world.
pub fn dispatch(
    commands: &GameCommands,
    world: &mut World,
    actor: EntityId,
    command: ClientCommand,
) -> Result<CommandReply, CommandError> {
    match command {
        ClientCommand::Hit { target } => {
            let report = commands.hit(world, actor, &target)?;
            Ok(CommandReply::Hit {
                target: report.target.to_uuid(),
                experience: report.experience.points(),
                level: report.level.get(),
                leveled_up: report.leveled_up(),
                target_health: report.target_health,
                destroyed: matches!(report.outcome, HitOutcome::Destroyed { .. }),
            })
        }
        ClientCommand::Jump { target } => {
            let respawn = commands.jump_into(world, actor, &target)?;
            Ok(CommandReply::Jumped {
                respawned_at: respawn.location.map(EntityId::to_uuid),
            })
        }
        ClientCommand::SetRespawn => {
            let location = commands.set_respawn(world, actor)?;
            Ok(CommandReply::RespawnSet {
                location: location.to_uuid(),
            })
        }
        ClientCommand::Heal { amount } => {
            let report = commands.heal(world, actor, amount.as_deref())?;
            Ok(match report.outcome {
                HealOutcome::Healed { amount_healed, .. } => CommandReply::Healed {
                    amount: amount_healed,
                    health: report.health.current(),
                    max_health: report.health.max(),
                },
                HealOutcome::AlreadyFull | HealOutcome::NoHealthPool => {
                    CommandReply::AlreadyFullHealth
                }
            })
        }
        ClientCommand::Kill => {
            let respawn = commands.kill(world, actor)?;
            Ok(CommandReply::Died {
                respawned_at: respawn.location.map(EntityId::to_uuid),
            })
        }
        ClientCommand::Stats => commands.get_stats(world, actor).map(CommandReply::Stats),
        ClientCommand::Describe { target } => commands
            .describe(world, actor, &target)
            .map(CommandReply::Object),
    }
}

pub fn reply_message(actor: EntityId, command: &str, reply: CommandReply) -> ServerMessage {
    ServerMessage::Reply {
        actor_id: actor.to_uuid(),
        command: command.to_string(),
        reply,
    }
}

pub fn error_message(actor: Option<EntityId>, error: &CommandError) -> ServerMessage {
    ServerMessage::Error {
        actor_id: actor.map(EntityId::to_uuid),
        kind: error.kind(),
        message: error.to_string(),
    }
}

pub fn notification_message(notification: &Notification) -> ServerMessage {
    let payload = serde_json::to_value(&notification.event).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to encode notification payload");
        serde_json::Value::Null
    });
    ServerMessage::Notification {
        recipient: notification.recipient.to_uuid(),
        event_type: notification.event.event_type().to_string(),
        payload,
    }
}
