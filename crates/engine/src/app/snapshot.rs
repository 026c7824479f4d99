use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::sim::{GameState, JumpResourceView, SessionSnapshot};

static SNAPSHOT_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_snapshot_lock_poison_once(operation: &'static str) {
    if SNAPSHOT_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "snapshot lock poisoned; recovered inner value");
    }
}

/// Shared, read-only view of the latest published session snapshot. The UI side
/// only ever reads; the simulation side publishes after each tick.
#[derive(Clone, Debug)]
pub struct SnapshotHandle {
    snapshot: Arc<RwLock<SessionSnapshot>>,
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(SessionSnapshot {
                game_state: GameState::Idle,
                score: 0,
                jump: JumpResourceView {
                    charges: 0,
                    cooldown_remaining: 0.0,
                },
            })),
        }
    }
}

impl SnapshotHandle {
    pub fn snapshot(&self) -> SessionSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_snapshot_lock_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: SessionSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_snapshot_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = snapshot;
            }
        }
    }
}
