//! Side effects collected while a request runs.
//!
//! Components record notifications and dirty entity ids here instead of
//! talking to the notifier or the repository directly. The world actor
//! drains the outbox once the request has finished, so a failed command
//! (which records nothing) leaves nothing behind.

use std::collections::BTreeSet;

use emberhold_domain::{EntityId, GameEvent, Notification};

#[derive(Debug, Default)]
pub struct Outbox {
    notifications: Vec<Notification>,
    touched: BTreeSet<EntityId>,
    deleted: BTreeSet<EntityId>,
}

/// Everything drained from an outbox.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutboxBatch {
    pub notifications: Vec<Notification>,
    pub touched: Vec<EntityId>,
    pub deleted: Vec<EntityId>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, recipient: EntityId, event: GameEvent) {
        self.notifications.push(Notification::new(recipient, event));
    }

    /// Mark an entity as needing to be persisted.
    pub fn touch(&mut self, id: EntityId) {
        self.deleted.remove(&id);
        self.touched.insert(id);
    }

    pub fn mark_deleted(&mut self, id: EntityId) {
        self.touched.remove(&id);
        self.deleted.insert(id);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.touched.is_empty() && self.deleted.is_empty()
    }

    pub fn drain(&mut self) -> OutboxBatch {
        OutboxBatch {
            notifications: std::mem::take(&mut self.notifications),
            touched: std::mem::take(&mut self.touched).into_iter().collect(),
            deleted: std::mem::take(&mut self.deleted).into_iter().collect(),
        }
    }
}
