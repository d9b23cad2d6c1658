//! Deferred one-shot timers keyed by an owner.
//!
//! A min-heap ordered by `(due, seq)` drives firing; a side map holds the one
//! live timer per key. Re-scheduling or cancelling a key leaves its old heap
//! entry behind, which is skipped when popped because its sequence number no
//! longer matches the live record.
//!
//! Time is logical: the owner advances `now` explicitly (the world actor feeds
//! it tokio's elapsed time; tests feed it whatever they like).

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::time::Duration;

/// Identifies one scheduling of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due during `advance_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<K, P> {
    pub key: K,
    pub payload: P,
    pub due: Duration,
}

#[derive(Debug)]
struct QueuedTimer<K> {
    due: Duration,
    seq: u64,
    key: K,
}

impl<K> PartialEq for QueuedTimer<K> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<K> Eq for QueuedTimer<K> {}

impl<K> PartialOrd for QueuedTimer<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for QueuedTimer<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug)]
struct PendingTimer<P> {
    seq: u64,
    due: Duration,
    payload: P,
}

/// At most one pending timer per key.
#[derive(Debug)]
pub struct Scheduler<K, P> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<QueuedTimer<K>>>,
    pending: HashMap<K, PendingTimer<P>>,
}

impl<K, P> Scheduler<K, P>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
            pending: HashMap::new(),
        }
    }

    /// Current logical time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire `delay` after now, replacing any timer the
    /// key already has.
    pub fn schedule_once(&mut self, key: K, delay: Duration, payload: P) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);

        self.queue.push(Reverse(QueuedTimer { due, seq, key }));
        self.pending.insert(key, PendingTimer { seq, due, payload });
        TimerHandle(seq)
    }

    /// Drop the key's pending timer. Returns its payload if there was one.
    pub fn cancel(&mut self, key: &K) -> Option<P> {
        self.pending.remove(key).map(|timer| timer.payload)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Handle of the key's live timer.
    pub fn handle_of(&self, key: &K) -> Option<TimerHandle> {
        self.pending.get(key).map(|timer| TimerHandle(timer.seq))
    }

    /// When the key's live timer is due.
    pub fn due_at(&self, key: &K) -> Option<Duration> {
        self.pending.get(key).map(|timer| timer.due)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest due time among live timers.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.discard_stale_head();
        self.queue.peek().map(|Reverse(timer)| timer.due)
    }

    /// Move the clock forward and collect every timer due at or before `now`.
    ///
    /// Fired timers come back in due order; timers due at the same instant
    /// come back in the order they were scheduled. The clock never moves
    /// backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<FiredTimer<K, P>> {
        self.now = self.now.max(now);

        let mut fired = Vec::new();
        while let Some(Reverse(head)) = self.queue.peek() {
            if head.due > self.now {
                break;
            }
            let Some(Reverse(timer)) = self.queue.pop() else {
                break;
            };
            let live = self
                .pending
                .get(&timer.key)
                .is_some_and(|pending| pending.seq == timer.seq);
            if !live {
                continue;
            }
            if let Some(pending) = self.pending.remove(&timer.key) {
                fired.push(FiredTimer {
                    key: timer.key,
                    payload: pending.payload,
                    due: pending.due,
                });
            }
        }
        fired
    }

    /// Convenience for `advance_to(now + step)`.
    pub fn advance_by(&mut self, step: Duration) -> Vec<FiredTimer<K, P>> {
        let target = self.now.saturating_add(step);
        self.advance_to(target)
    }

    fn discard_stale_head(&mut self) {
        while let Some(Reverse(head)) = self.queue.peek() {
            let live = self
                .pending
                .get(&head.key)
                .is_some_and(|pending| pending.seq == head.seq);
            if live {
                return;
            }
            self.queue.pop();
        }
    }
}

impl<K, P> Default for Scheduler<K, P>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
