//! Live sessions keyed by id.
//!
//! The registry holds at most `max_sessions` games. Creating a session when
//! it is full drops the one that was used least recently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chess_openings::OpeningDatabase;
use tokio::sync::Mutex;

use crate::session::GameSession;

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// A session behind its own lock. Holding the lock serializes every
/// operation on that game, including the engine round-trips.
pub type SharedSession = Arc<Mutex<GameSession>>;

struct Entry {
    session: SharedSession,
    /// Registry tick of the last lookup.
    last_used: AtomicU64,
}

/// All live sessions.
pub struct SessionRegistry {
    corpus: Arc<OpeningDatabase>,
    max_sessions: usize,
    tick: AtomicU64,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl SessionRegistry {
    pub fn new(corpus: Arc<OpeningDatabase>) -> Self {
        Self::with_max_sessions(corpus, DEFAULT_MAX_SESSIONS)
    }

    /// A registry holding at most `max_sessions` games (at least one).
    pub fn with_max_sessions(corpus: Arc<OpeningDatabase>, max_sessions: usize) -> Self {
        Self {
            corpus,
            max_sessions: max_sessions.max(1),
            tick: AtomicU64::new(0),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    /// Starts a new game and returns its id.
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let entry = Entry {
            session: Arc::new(Mutex::new(GameSession::new(Arc::clone(&self.corpus)))),
            last_used: AtomicU64::new(self.next_tick()),
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        while sessions.len() >= self.max_sessions {
            let idle = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(id, _)| id.clone());
            let Some(idle) = idle else { break };
            sessions.remove(&idle);
            tracing::info!(session_id = %idle, "idle session evicted");
        }
        sessions.insert(id.clone(), entry);
        drop(sessions);

        tracing::info!(session_id = %id, "session created");
        id
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let entry = sessions.get(id)?;
        entry.last_used.store(self.next_tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.session))
    }

    /// Drops a session. Returns false if it did not exist.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some();
        if removed {
            tracing::info!(session_id = %id, "session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_openings::builtin_database;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(builtin_database()))
    }

    #[test]
    fn test_create_get_remove() {
        let registry = registry();
        let id = registry.create();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_some());

        assert!(registry.remove(&id));
        assert!(registry.get(&id).is_none());
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = registry();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);

        {
            let session = registry.get(&a).unwrap();
            let mut game = session.lock().await;
            game.set_position(None, &["e2e4".to_string()]).unwrap();
        }

        let a_moves = registry.get(&a).unwrap().lock().await.history().len();
        let b_moves = registry.get(&b).unwrap().lock().await.history().len();
        assert_eq!(a_moves, 1);
        assert_eq!(b_moves, 0);
    }

    #[test]
    fn test_full_registry_evicts_least_recently_used() {
        let registry = SessionRegistry::with_max_sessions(Arc::new(builtin_database()), 3);
        let first = registry.create();
        let second = registry.create();
        let third = registry.create();

        // Touch the oldest so the second becomes the idle one.
        assert!(registry.get(&first).is_some());

        let fourth = registry.create();
        assert_eq!(registry.len(), 3);
        assert!(registry.get(&second).is_none());
        for id in [&first, &third, &fourth] {
            assert!(registry.get(id).is_some());
        }
    }

    #[test]
    fn test_creating_many_sessions_stays_bounded() {
        let registry = SessionRegistry::with_max_sessions(Arc::new(builtin_database()), 5);
        let ids: Vec<String> = (0..50).map(|_| registry.create()).collect();

        assert_eq!(registry.len(), 5);
        assert!(registry.get(&ids[49]).is_some());
        assert!(registry.get(&ids[0]).is_none());
    }

    #[test]
    fn test_zero_limit_keeps_one_session() {
        let registry = SessionRegistry::with_max_sessions(Arc::new(builtin_database()), 0);
        assert_eq!(registry.max_sessions(), 1);
        let a = registry.create();
        let b = registry.create();
        assert!(registry.get(&a).is_none());
        assert!(registry.get(&b).is_some());
    }
}
