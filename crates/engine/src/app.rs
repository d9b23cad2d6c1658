//! Application composition.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::{WorldActor, WorldHandle};
use crate::config::EngineConfig;
use crate::infrastructure::persistence::PersistenceWriter;
use crate::infrastructure::ports::{ClockPort, EntityRepo, NotifierPort, RepoError};
use crate::infrastructure::resolver::LocalNameResolver;
use crate::stores::StoreError;
use crate::use_cases::{CombatResolver, GameCommands, ProgressionEngine};
use crate::world::World;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load world: {0}")]
    Load(#[from] RepoError),
    #[error("Failed to rebuild world: {0}")]
    Hydrate(#[from] StoreError),
}

/// A running engine: the world actor plus its persistence writer.
pub struct App {
    pub world: WorldHandle,
    /// Entities restored from persistence at startup.
    pub hydrated: usize,
    actor_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl App {
    /// Hydrate the world from `repo` and start serving requests.
    pub async fn start(
        config: &EngineConfig,
        repo: Arc<dyn EntityRepo>,
        notifier: Arc<dyn NotifierPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, AppError> {
        let snapshots = repo.load_all().await?;
        let hydrated = snapshots.len();
        let world = World::hydrate(snapshots)?;

        let (writer, writer_task) = PersistenceWriter::spawn(repo);
        let (actor, handle) = WorldActor::new(
            world,
            default_commands(),
            notifier,
            writer,
            clock,
            config.request_buffer,
        );
        let actor_task = actor.spawn();

        tracing::info!(hydrated, "Engine started");
        Ok(Self {
            world: handle,
            hydrated,
            actor_task,
            writer_task,
        })
    }

    /// Stop accepting requests and wait for pending writes.
    ///
    /// Waits for every other `WorldHandle` clone to be dropped too.
    pub async fn shutdown(self) {
        drop(self.world);
        if let Err(e) = self.actor_task.await {
            tracing::error!(error = %e, "World actor panicked");
        }
        if let Err(e) = self.writer_task.await {
            tracing::error!(error = %e, "Persistence writer panicked");
        }
        tracing::info!("Engine stopped");
    }
}

/// Command surface with the stock resolver and rules.
pub fn default_commands() -> GameCommands {
    GameCommands::new(
        CombatResolver::new(ProgressionEngine::new()),
        Arc::new(LocalNameResolver::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use emberhold_domain::{Entity, EntityName, EntitySnapshot, Placement};

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::notifier::TracingNotifier;
    use crate::infrastructure::persistence::InMemoryEntityRepo;
    use crate::infrastructure::ports::MockEntityRepo;

    #[tokio::test]
    async fn restart_sees_previous_entities() {
        let repo = Arc::new(InMemoryEntityRepo::new());
        let config = EngineConfig::default();

        let app = App::start(
            &config,
            repo.clone(),
            Arc::new(TracingNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
        .await
        .unwrap();
        let hall = app
            .world
            .spawn(
                Entity::other(EntityName::new("Hall").unwrap()),
                Placement::TopLevel,
            )
            .await
            .unwrap();
        app.shutdown().await;

        let app = App::start(
            &config,
            repo,
            Arc::new(TracingNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
        .await
        .unwrap();
        assert_eq!(app.hydrated, 1);
        let snapshot = app.world.snapshot(hall).await.unwrap().unwrap();
        assert_eq!(snapshot.name.as_str(), "Hall");
        app.shutdown().await;
    }

    #[tokio::test]
    async fn load_failure_aborts_startup() {
        let mut repo = MockEntityRepo::new();
        repo.expect_load_all()
            .returning(|| Err(RepoError::storage("load_all", "disk on fire")));

        let result = App::start(
            &EngineConfig::default(),
            Arc::new(repo),
            Arc::new(TracingNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
        .await;
        assert!(matches!(result, Err(AppError::Load(_))));
    }

    #[tokio::test]
    async fn duplicate_snapshots_fail_hydration() {
        let hall = Entity::other(EntityName::new("Hall").unwrap());
        let snapshot = EntitySnapshot::capture(&hall, Placement::TopLevel, Utc::now());
        let mut repo = MockEntityRepo::new();
        repo.expect_load_all()
            .returning(move || Ok(vec![snapshot.clone(), snapshot.clone()]));

        let result = App::start(
            &EngineConfig::default(),
            Arc::new(repo),
            Arc::new(TracingNotifier),
            Arc::new(FixedClock(Utc::now())),
        )
        .await;
        assert!(matches!(result, Err(AppError::Hydrate(StoreError::Duplicate(_)))));
    }
}
