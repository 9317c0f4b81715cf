use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
struct Slot {
    token: CancellationToken,
    commit: Arc<AsyncMutex<()>>,
}

type Inflight = Arc<Mutex<HashMap<String, Slot>>>;

/// Allows at most one in-flight query per session id
///
/// Each in-flight query also owns a commit lock. Writers that must not
/// interleave with a query's storage writes cancel the query and then wait on
/// that lock.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    inflight: Inflight,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `session_id`; `None` when a query already holds it
    pub fn acquire(&self, session_id: &str) -> Option<SessionPermit> {
        let mut inflight = lock(&self.inflight);
        if inflight.contains_key(session_id) {
            return None;
        }

        let slot = Slot {
            token: CancellationToken::new(),
            commit: Arc::new(AsyncMutex::new(())),
        };
        inflight.insert(session_id.to_string(), slot.clone());

        Some(SessionPermit {
            session_id: session_id.to_string(),
            slot,
            inflight: Arc::clone(&self.inflight),
        })
    }

    /// Cancel the in-flight query for `session_id`, if any
    pub fn cancel(&self, session_id: &str) -> bool {
        match lock(&self.inflight).get(session_id) {
            Some(slot) => {
                slot.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the in-flight query and wait out any commit it already started
    ///
    /// Once this returns, that query has either finished its writes or will
    /// write nothing.
    pub async fn cancel_and_wait(&self, session_id: &str) -> bool {
        let commit = match lock(&self.inflight).get(session_id) {
            Some(slot) => {
                slot.token.cancel();
                Arc::clone(&slot.commit)
            }
            None => return false,
        };

        drop(commit.lock().await);
        true
    }

    pub fn is_busy(&self, session_id: &str) -> bool {
        lock(&self.inflight).contains_key(session_id)
    }
}

/// Held for the lifetime of one query; releases the session on drop
#[derive(Debug)]
pub struct SessionPermit {
    session_id: String,
    slot: Slot,
    inflight: Inflight,
}

impl SessionPermit {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.slot.token
    }

    /// Lock the session for writing; `None` if the query was cancelled first
    pub async fn begin_commit(&self) -> Option<OwnedMutexGuard<()>> {
        let guard = Arc::clone(&self.slot.commit).lock_owned().await;
        if self.slot.token.is_cancelled() {
            return None;
        }
        Some(guard)
    }
}

impl Drop for SessionPermit {
    fn drop(&mut self) {
        lock(&self.inflight).remove(&self.session_id);
    }
}

// A panic while holding the map cannot leave it inconsistent, so poisoning is ignored.
fn lock(inflight: &Inflight) -> MutexGuard<'_, HashMap<String, Slot>> {
    inflight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
