//! Bounded archive of finished games.
//!
//! The store keeps at most [`GAME_STORE_CAPACITY`] games. Inserting into a
//! full store evicts the oldest entry first. Reads never change the order.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Maximum number of games kept.
pub const GAME_STORE_CAPACITY: usize = 10;

/// An archived game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredGame {
    pub id: String,
    pub payload: Value,
    pub inserted_at: DateTime<Utc>,
}

/// Listing entry for an archived game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredGameSummary {
    pub id: String,
    pub inserted_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    /// Ids, oldest first.
    order: VecDeque<String>,
    games: HashMap<String, StoredGame>,
}

/// FIFO game store shared by all sessions.
#[derive(Default)]
pub struct GameStore {
    inner: Mutex<Inner>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archives `payload` and returns its new id.
    pub fn store(&self, payload: Value) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let game = StoredGame {
            id: id.clone(),
            payload,
            inserted_at: Utc::now(),
        };

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.order.len() >= GAME_STORE_CAPACITY {
            if let Some(oldest) = inner.order.pop_front() {
                inner.games.remove(&oldest);
                tracing::debug!(evicted = %oldest, "game store full, evicted oldest game");
            }
        }
        inner.order.push_back(id.clone());
        inner.games.insert(id.clone(), game);
        id
    }

    /// Looks up an archived game.
    pub fn get(&self, id: &str) -> Option<StoredGame> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.games.get(id).cloned()
    }

    /// All archived games, oldest first.
    pub fn list(&self) -> Vec<StoredGameSummary> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .order
            .iter()
            .filter_map(|id| inner.games.get(id))
            .map(|game| StoredGameSummary {
                id: game.id.clone(),
                inserted_at: game.inserted_at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
