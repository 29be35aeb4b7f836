//! Per-room turn serialization.
//!
//! Turns derive every decision from the transcript as read at the start of
//! the turn, so two turns on the same room must not overlap. Rooms are
//! independent and never wait on each other.

use std::sync::Arc;

use agora_types::id::RoomId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of room id to an async mutex held for the duration of a turn.
#[derive(Debug, Default, Clone)]
pub struct TurnLocks {
    locks: Arc<DashMap<RoomId, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `room_id`. Dropping the guard releases it.
    pub async fn acquire(&self, room_id: &RoomId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(*room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the entry for a deleted room.
    pub fn remove(&self, room_id: &RoomId) {
        self.locks.remove(room_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
