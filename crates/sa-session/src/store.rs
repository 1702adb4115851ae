//! Session storage keyed by user id.
//!
//! The in-memory store keeps every session behind its own mutex, so turns
//! from different users run in parallel while read-modify-write cycles for
//! the same user are serialized. State is process-local: it is lost on
//! restart and not shared between instances. A persistent backend can be
//! plugged in by implementing [`SessionStore`].

use parking_lot::{Mutex, RwLock};
use sa_core::config::DEFAULT_HISTORY_LIMIT;
use sa_core::{Intent, SentimentCategory};
use std::collections::HashMap;
use std::sync::Arc;

use crate::session::{ConversationSession, Turn};

pub trait SessionStore: Send + Sync {
    /// Run `f` with exclusive access to the user's session, creating it if absent.
    fn with_session<R>(&self, user_id: &str, f: impl FnOnce(&mut ConversationSession) -> R) -> R;

    /// Snapshot of the user's session without creating one.
    fn get(&self, user_id: &str) -> Option<ConversationSession>;

    /// Delete the user's session. Returns whether one existed.
    fn reset(&self, user_id: &str) -> bool;

    fn len(&self) -> usize;

    fn user_ids(&self) -> Vec<String>;

    /// Maximum turns retained per session.
    fn history_limit(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the user's session, creating an empty one if absent.
    fn get_or_create(&self, user_id: &str) -> ConversationSession {
        self.with_session(user_id, |s| s.clone())
    }

    fn record_turn(&self, user_id: &str, text: &str, sentiment: SentimentCategory, intent: Intent) {
        let limit = self.history_limit();
        self.with_session(user_id, |s| s.record_turn(Turn::new(text, sentiment, intent), limit));
    }
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<ConversationSession>>>>,
    history_limit: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_limit: history_limit.max(1),
        }
    }

    /// Drop every session.
    pub fn clear(&self) {
        self.sessions.write().clear();
    }

    fn slot(&self, user_id: &str) -> Arc<Mutex<ConversationSession>> {
        if let Some(slot) = self.sessions.read().get(user_id) {
            return slot.clone();
        }
        let mut map = self.sessions.write();
        map.entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(user_id, "creating conversation session");
                Arc::new(Mutex::new(ConversationSession::new(user_id)))
            })
            .clone()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn with_session<R>(&self, user_id: &str, f: impl FnOnce(&mut ConversationSession) -> R) -> R {
        let slot = self.slot(user_id);
        let mut session = slot.lock();
        f(&mut session)
    }

    fn get(&self, user_id: &str) -> Option<ConversationSession> {
        let slot = self.sessions.read().get(user_id).cloned()?;
        let session = slot.lock().clone();
        Some(session)
    }

    fn reset(&self, user_id: &str) -> bool {
        let removed = self.sessions.write().remove(user_id).is_some();
        if removed {
            tracing::debug!(user_id, "conversation session reset");
        }
        removed
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }

    fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn history_limit(&self) -> usize {
        self.history_limit
    }
}
