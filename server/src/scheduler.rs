//! Tick scheduling for entities with pending work.
//!
//! A min-heap of `(wake_tick, entity_id)` polled once per logical tick.
//! The `active` map is the source of truth: heap entries whose wake tick no
//! longer matches the map are stale and skipped when popped, so descheduling
//! never has to search the heap.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::entities::EntityId;

pub struct TickScheduler {
    interval: u64,
    queue: BinaryHeap<Reverse<(u64, EntityId)>>,
    active: HashMap<EntityId, u64>,
}

impl TickScheduler {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            queue: BinaryHeap::new(),
            active: HashMap::new(),
        }
    }

    /// Schedule periodic ticks starting one interval from `now`.
    /// Returns false if the entity was already scheduled.
    pub fn ensure_active(&mut self, id: EntityId, now: u64) -> bool {
        if self.active.contains_key(&id) {
            return false;
        }
        self.schedule_at(id, now + self.interval);
        true
    }

    /// Schedule the next tick for `id` at an exact tick, replacing any pending one
    pub fn schedule_at(&mut self, id: EntityId, wake: u64) {
        self.active.insert(id, wake);
        self.queue.push(Reverse((wake, id)));
    }

    /// Stop ticking `id`. Returns false if it was not scheduled.
    pub fn deschedule(&mut self, id: EntityId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.active.contains_key(&id)
    }

    /// Pop every entity due at or before `now`, in `(wake, id)` order.
    /// Each returned entity is re-armed one interval after `now`; handlers
    /// call `deschedule` when they run out of work.
    pub fn pop_due(&mut self, now: u64) -> Vec<EntityId> {
        let mut due = Vec::new();
        while let Some(Reverse((wake, id))) = self.queue.peek().copied() {
            if wake > now {
                break;
            }
            self.queue.pop();
            if self.active.get(&id) == Some(&wake) {
                due.push(id);
            }
        }
        for id in &due {
            self.schedule_at(*id, now + self.interval);
        }
        due
    }
}
