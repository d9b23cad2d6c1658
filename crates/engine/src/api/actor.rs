//! The world actor.
//!
//! One task owns the `World` and processes requests strictly one at a time,
//! interleaved with respawn timers. Callers hold a cheap `WorldHandle` and
//! await replies over oneshot channels. After every step the actor drains
//! the outbox: notifications go to the notifier, dirty entities go to the
//! persistence writer. Neither is awaited.

use std::sync::Arc;

use emberhold_domain::{Entity, EntityId, EntitySnapshot, Placement};
use emberhold_shared::{ClientCommand, CommandReply};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::dispatch::dispatch;
use crate::infrastructure::persistence::{PersistOp, PersistenceWriter};
use crate::infrastructure::ports::{ClockPort, NotifierPort};
use crate::stores::StoreError;
use crate::use_cases::{CommandError, GameCommands};
use crate::world::World;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("World is not running")]
    Closed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub enum WorldRequest {
    Command {
        actor: EntityId,
        command: ClientCommand,
        reply: oneshot::Sender<Result<CommandReply, CommandError>>,
    },
    Spawn {
        entity: Entity,
        placement: Placement,
        reply: oneshot::Sender<Result<EntityId, StoreError>>,
    },
    Delete {
        id: EntityId,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    Snapshot {
        id: EntityId,
        reply: oneshot::Sender<Option<EntitySnapshot>>,
    },
    Entities {
        reply: oneshot::Sender<Vec<EntitySnapshot>>,
    },
}

// =============================================================================
// Handle
// =============================================================================

/// Sending side of the world. Clone freely; the actor stops once every
/// handle is gone.
#[derive(Debug, Clone)]
pub struct WorldHandle {
    tx: mpsc::Sender<WorldRequest>,
}

impl WorldHandle {
    /// Run a command on behalf of `actor`.
    pub async fn execute(
        &self,
        actor: EntityId,
        command: ClientCommand,
    ) -> Result<CommandReply, CommandError> {
        self.request(|reply| WorldRequest::Command {
            actor,
            command,
            reply,
        })
        .await
        .map_err(|_| CommandError::Unavailable)?
    }

    pub async fn spawn(&self, entity: Entity, placement: Placement) -> Result<EntityId, WorldError> {
        Ok(self
            .request(|reply| WorldRequest::Spawn {
                entity,
                placement,
                reply,
            })
            .await??)
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), WorldError> {
        Ok(self
            .request(|reply| WorldRequest::Delete { id, reply })
            .await??)
    }

    pub async fn snapshot(&self, id: EntityId) -> Result<Option<EntitySnapshot>, WorldError> {
        self.request(|reply| WorldRequest::Snapshot { id, reply })
            .await
    }

    pub async fn entities(&self) -> Result<Vec<EntitySnapshot>, WorldError> {
        self.request(|reply| WorldRequest::Entities { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> WorldRequest,
    ) -> Result<T, WorldError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }
}

// =============================================================================
// Actor
// =============================================================================

pub struct WorldActor {
    world: World,
    commands: GameCommands,
    notifier: Arc<dyn NotifierPort>,
    writer: PersistenceWriter,
    clock: Arc<dyn ClockPort>,
    requests: mpsc::Receiver<WorldRequest>,
}

impl WorldActor {
    pub fn new(
        world: World,
        commands: GameCommands,
        notifier: Arc<dyn NotifierPort>,
        writer: PersistenceWriter,
        clock: Arc<dyn ClockPort>,
        buffer: usize,
    ) -> (Self, WorldHandle) {
        let (tx, requests) = mpsc::channel(buffer.max(1));
        let actor = Self {
            world,
            commands,
            notifier,
            writer,
            clock,
            requests,
        };
        (actor, WorldHandle { tx })
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Logical time starts at zero when the loop starts; timers restored at
    /// hydration are relative to that.
    pub async fn run(mut self) {
        let started = Instant::now();
        tracing::info!(entities = self.world.store().len(), "World actor started");

        // Anything hydration queued goes out first.
        self.flush();

        loop {
            self.tick(started);
            // A due time past the end of the runtime clock never wakes us.
            let wake_at = self
                .world
                .next_due()
                .and_then(|due| started.checked_add(due));

            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => {
                        // Timers that came due while we waited fire before
                        // the request is seen.
                        self.tick(started);
                        self.handle(request);
                    }
                    None => break,
                },
                _ = tokio::time::sleep_until(wake_at.unwrap_or(started)), if wake_at.is_some() => {}
            }
        }

        self.flush();
        tracing::info!("World actor stopped");
    }

    fn tick(&mut self, started: Instant) {
        let fired = self.world.advance_to(started.elapsed());
        if !fired.is_empty() {
            tracing::debug!(count = fired.len(), "Respawn timers fired");
            self.flush();
        }
    }

    fn handle(&mut self, request: WorldRequest) {
        match request {
            WorldRequest::Command {
                actor,
                command,
                reply,
            } => {
                let name = command.name();
                let result = dispatch(&self.commands, &mut self.world, actor, command);
                match &result {
                    Ok(_) => tracing::debug!(actor_id = %actor, command = name, "Command applied"),
                    Err(e) => {
                        tracing::debug!(actor_id = %actor, command = name, error = %e, "Command rejected")
                    }
                }
                self.flush();
                let _ = reply.send(result);
            }
            WorldRequest::Spawn {
                entity,
                placement,
                reply,
            } => {
                let result = self.world.spawn(entity, placement);
                self.flush();
                let _ = reply.send(result);
            }
            WorldRequest::Delete { id, reply } => {
                let result = self.world.delete(id).map(|_| ());
                self.flush();
                let _ = reply.send(result);
            }
            WorldRequest::Snapshot { id, reply } => {
                let _ = reply.send(self.world.snapshot(id, self.clock.now()));
            }
            WorldRequest::Entities { reply } => {
                let _ = reply.send(self.world.snapshots(self.clock.now()));
            }
        }
    }

    /// Publish everything the last step produced.
    fn flush(&mut self) {
        let batch = self.world.drain_outbox();
        if batch.notifications.is_empty() && batch.touched.is_empty() && batch.deleted.is_empty() {
            return;
        }

        for notification in batch.notifications {
            self.notifier.notify(notification);
        }

        let saved_at = self.clock.now();
        for id in batch.touched {
            if let Some(snapshot) = self.world.snapshot(id, saved_at) {
                self.writer.submit(PersistOp::Save(snapshot));
            }
        }
        for id in batch.deleted {
            self.writer.submit(PersistOp::Delete(id));
        }
    }
}
