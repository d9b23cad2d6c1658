//! Whole sessions through the world actor, with tokio time paused.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use emberhold_domain::{EntityId, EntitySnapshot, Placement};
use emberhold_shared::{ClientCommand, CommandReply, ErrorKind};

use crate::app::App;
use crate::config::EngineConfig;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::notifier::ChannelNotifier;
use crate::infrastructure::persistence::InMemoryEntityRepo;
use crate::infrastructure::ports::EntityRepo;
use crate::seed::{seed_demo_world, DemoWorld};

fn config() -> EngineConfig {
    EngineConfig {
        dummy_health: 3,
        respawn_delay: Duration::from_secs(30),
        ..EngineConfig::default()
    }
}

async fn find_by_name(app: &App, wanted: &str) -> EntitySnapshot {
    app.world
        .entities()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.name.as_str() == wanted)
        .unwrap()
}

async fn hit(app: &App, demo: DemoWorld, target: &str) -> CommandReply {
    app.world
        .execute(
            demo.character,
            ClientCommand::Hit {
                target: target.into(),
            },
        )
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn three_hits_destroy_the_dummy_and_it_comes_back() {
    let repo = Arc::new(InMemoryEntityRepo::new());
    let (notifier, mut notifications) = ChannelNotifier::channel(64);
    let app = App::start(
        &config(),
        repo.clone(),
        Arc::new(notifier),
        Arc::new(FixedClock(Utc::now())),
    )
    .await
    .unwrap();
    let demo = seed_demo_world(&app.world, &config()).await.unwrap();
    let dummy = find_by_name(&app, "Worn-Out Dummy").await.id;

    for expected_xp in 1..=3u64 {
        let reply = hit(&app, demo, "worn-out").await;
        let CommandReply::Hit {
            experience,
            level,
            destroyed,
            ..
        } = reply
        else {
            panic!("expected a hit reply, got {reply:?}");
        };
        assert_eq!(experience, expected_xp);
        assert_eq!(level, 1);
        assert_eq!(destroyed, expected_xp == 3);
    }

    let err = app
        .world
        .execute(
            demo.character,
            ClientCommand::Hit {
                target: "worn-out".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    tokio::time::sleep(Duration::from_secs(29)).await;
    let snapshot = app.world.snapshot(dummy).await.unwrap().unwrap();
    assert!(snapshot.placement.is_void());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = app.world.snapshot(dummy).await.unwrap().unwrap();
    assert_eq!(snapshot.placement, Placement::Inside(demo.room));
    let health = snapshot.health.unwrap();
    assert_eq!((health.current(), health.max()), (3, 3));

    let CommandReply::Stats(stats) = app
        .world
        .execute(demo.character, ClientCommand::Stats)
        .await
        .unwrap()
    else {
        panic!("expected stats");
    };
    assert_eq!((stats.experience, stats.level, stats.health), (3, 1, 100));
    assert_eq!(stats.experience_to_next_level, 97);

    let mut seen = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        seen.push(notification.event.event_type());
    }
    assert!(seen.contains(&"object_destroyed"));
    assert!(seen.contains(&"object_respawned"));

    app.shutdown().await;
    let saved = repo.load(dummy).await.unwrap().unwrap();
    assert_eq!(saved.placement, Placement::Inside(demo.room));
}

#[tokio::test(start_paused = true)]
async fn restart_mid_respawn_restores_the_timer() {
    let repo = Arc::new(InMemoryEntityRepo::new());
    let app = App::start(
        &config(),
        repo.clone(),
        Arc::new(crate::infrastructure::notifier::TracingNotifier),
        Arc::new(FixedClock(Utc::now())),
    )
    .await
    .unwrap();
    let demo = seed_demo_world(&app.world, &config()).await.unwrap();
    let dummy = find_by_name(&app, "Worn-Out Dummy").await.id;
    for _ in 0..3 {
        hit(&app, demo, "worn").await;
    }
    app.shutdown().await;
    assert!(repo.load(dummy).await.unwrap().unwrap().placement.is_void());

    let app = App::start(
        &config(),
        repo.clone(),
        Arc::new(crate::infrastructure::notifier::TracingNotifier),
        Arc::new(FixedClock(Utc::now())),
    )
    .await
    .unwrap();
    assert_eq!(app.hydrated, 5);

    tokio::time::sleep(Duration::from_secs(31)).await;
    let snapshot = app.world.snapshot(dummy).await.unwrap().unwrap();
    assert_eq!(snapshot.placement, Placement::Inside(demo.room));
    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn jumping_into_the_pit_keeps_the_character_alive() {
    let app = App::start(
        &config(),
        Arc::new(InMemoryEntityRepo::new()),
        Arc::new(crate::infrastructure::notifier::TracingNotifier),
        Arc::new(FixedClock(Utc::now())),
    )
    .await
    .unwrap();
    let demo = seed_demo_world(&app.world, &config()).await.unwrap();

    let reply = app
        .world
        .execute(
            demo.character,
            ClientCommand::Jump {
                target: "in pit".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        reply,
        CommandReply::Jumped {
            respawned_at: Some(demo.room.to_uuid())
        }
    );

    let snapshot = app.world.snapshot(demo.character).await.unwrap().unwrap();
    assert!(snapshot.health.unwrap().is_full());

    let err = app
        .world
        .execute(EntityId::new(), ClientCommand::Stats)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    app.shutdown().await;
}
