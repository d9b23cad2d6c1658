//! Emberhold Engine - line-oriented JSON driver.
//!
//! Reads one `ClientMessage` per stdin line and writes `ServerMessage`s
//! (replies, errors, notifications) to stdout, one per line. Logs go to
//! stderr.

use std::sync::Arc;

use emberhold_domain::EntityId;
use emberhold_engine::api::{error_message, notification_message, reply_message};
use emberhold_engine::infrastructure::{
    clock::SystemClock,
    notifier::ChannelNotifier,
    persistence::{InMemoryEntityRepo, JsonFileEntityRepo},
    ports::EntityRepo,
};
use emberhold_engine::config::load_dotenv_from_repo_root;
use emberhold_engine::seed::{find_demo_world, seed_demo_world};
use emberhold_engine::{App, EngineConfig};
use emberhold_shared::{ClientMessage, ErrorKind, ServerMessage};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging; stdout is reserved for the protocol.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emberhold_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env();

    tracing::info!(?config, "Starting Emberhold Engine");

    let repo: Arc<dyn EntityRepo> = match &config.data_dir {
        Some(dir) => Arc::new(JsonFileEntityRepo::open(dir.clone()).await?),
        None => Arc::new(InMemoryEntityRepo::new()),
    };
    let (notifier, mut notifications) = ChannelNotifier::channel(config.notify_buffer);
    let app = App::start(
        &config,
        repo,
        Arc::new(notifier),
        Arc::new(SystemClock::new()),
    )
    .await?;

    let demo = match find_demo_world(&app.world.entities().await?) {
        Some(demo) => demo,
        None => seed_demo_world(&app.world, &config).await?,
    };

    // Single writer so lines never interleave.
    let (out_tx, out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let stdout_task = tokio::spawn(write_messages(out_rx));

    let forward_tx = out_tx.clone();
    let forward_task = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            if forward_tx.send(notification_message(&notification)).is_err() {
                break;
            }
        }
    });

    let _ = out_tx.send(ServerMessage::Welcome {
        character_id: demo.character.to_uuid(),
        room_id: demo.room.to_uuid(),
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message = match ClientMessage::from_json(&line) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed input line");
                let _ = out_tx.send(ServerMessage::Error {
                    actor_id: None,
                    kind: ErrorKind::Validation,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let actor = EntityId::from_uuid(message.actor_id);
        let command = message.command.name();
        let response = match app.world.execute(actor, message.command).await {
            Ok(reply) => reply_message(actor, command, reply),
            Err(e) => error_message(Some(actor), &e),
        };
        let _ = out_tx.send(response);
    }

    tracing::info!("Input closed, shutting down");
    app.shutdown().await;
    // The notifier was owned by the actor, so the forwarder ends here.
    forward_task.await?;
    drop(out_tx);
    stdout_task.await??;

    Ok(())
}

async fn write_messages(mut rx: mpsc::UnboundedReceiver<ServerMessage>) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(message) = rx.recv().await {
        match message.to_json() {
            Ok(json) => {
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode outbound message"),
        }
    }
    Ok(())
}
