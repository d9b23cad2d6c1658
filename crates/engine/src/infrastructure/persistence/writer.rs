//! Background persistence writer.
//!
//! The world actor never awaits storage. It submits operations here and a
//! single task applies them in submission order, so a later save of an
//! entity can never be overtaken by an earlier one.

use std::sync::Arc;

use emberhold_domain::{EntityId, EntitySnapshot};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::infrastructure::ports::EntityRepo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp {
    Save(EntitySnapshot),
    Delete(EntityId),
}

/// Cheap to clone; the task stops once every clone is dropped and the queue
/// is drained.
#[derive(Debug, Clone)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<PersistOp>,
}

impl PersistenceWriter {
    pub fn spawn(repo: Arc<dyn EntityRepo>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(repo, rx));
        (Self { tx }, handle)
    }

    pub fn submit(&self, op: PersistOp) {
        if self.tx.send(op).is_err() {
            tracing::error!("Persistence writer has stopped; dropping write");
        }
    }
}

async fn run(repo: Arc<dyn EntityRepo>, mut rx: mpsc::UnboundedReceiver<PersistOp>) {
    tracing::debug!("Persistence writer started");
    while let Some(op) = rx.recv().await {
        let result = match &op {
            PersistOp::Save(snapshot) => repo.save(snapshot).await,
            PersistOp::Delete(id) => repo.delete(*id).await,
        };
        if let Err(e) = result {
            match op {
                PersistOp::Save(snapshot) => {
                    tracing::warn!(entity_id = %snapshot.id, error = %e, "Failed to save entity");
                }
                PersistOp::Delete(id) => {
                    tracing::warn!(entity_id = %id, error = %e, "Failed to delete entity");
                }
            }
        }
    }
    tracing::debug!("Persistence writer stopped");
}
