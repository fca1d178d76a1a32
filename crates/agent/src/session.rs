//! Per-user session context
//!
//! Every user id gets its own [`SessionContext`]: a bounded turn history plus
//! the running statistics the assistant uses (last intent, success rate,
//! expertise). The store is shared by all request handlers; each session
//! sits behind its own mutex so different users never wait on each other
//! beyond the map lookup.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use voxta_config::constants::session::{
    EXPERIENCED_AFTER_TURNS, MAX_HISTORY, SUCCESS_CONFIDENCE,
};
use voxta_config::SessionConfig;
use voxta_core::{ClassificationResult, IntentTag};

/// One classified utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub input: String,
    pub result: ClassificationResult,
    pub timestamp: DateTime<Utc>,
}

/// How familiar the user is with the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expertise {
    Beginner,
    Experienced,
}

/// Conversation state for one user
#[derive(Debug, Clone)]
pub struct SessionContext {
    user_id: String,
    history: VecDeque<TurnRecord>,
    max_history: usize,
    turn_count: u64,
    last_intent: Option<IntentTag>,
    success_rate: f32,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    /// `max_history` is clamped into `1..=MAX_HISTORY`
    pub fn new(user_id: impl Into<String>, max_history: usize) -> Self {
        let max_history = max_history.clamp(1, MAX_HISTORY);
        Self {
            user_id: user_id.into(),
            history: VecDeque::with_capacity(max_history),
            max_history,
            turn_count: 0,
            last_intent: None,
            success_rate: 0.0,
            started_at: Utc::now(),
        }
    }

    /// Append a turn, dropping the oldest ones beyond the history bound
    pub fn record(&mut self, input: impl Into<String>, result: ClassificationResult) {
        let confidence = result.confidence;
        self.last_intent = Some(result.intent);
        self.history.push_back(TurnRecord {
            input: input.into(),
            result,
            timestamp: Utc::now(),
        });
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        self.turn_count += 1;
        if confidence > SUCCESS_CONFIDENCE {
            self.success_rate = self.success_rate * 0.9 + 0.1;
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn history(&self) -> impl Iterator<Item = &TurnRecord> {
        self.history.iter()
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    pub fn last_intent(&self) -> Option<IntentTag> {
        self.last_intent
    }

    /// Moving average of confident turns, in [0.0, 1.0)
    pub fn success_rate(&self) -> f32 {
        self.success_rate
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn expertise(&self) -> Expertise {
        if self.turn_count < EXPERIENCED_AFTER_TURNS as u64 {
            Expertise::Beginner
        } else {
            Expertise::Experienced
        }
    }

    /// Intents of the last `n` turns, oldest first
    pub fn recent_intents(&self, n: usize) -> Vec<IntentTag> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).map(|t| t.result.intent).collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.user_id.clone(),
            turn_count: self.turn_count,
            history_len: self.history.len(),
            last_intent: self.last_intent,
            recent_intents: self.recent_intents(3),
            success_rate: self.success_rate,
            expertise: self.expertise(),
            started_at: self.started_at,
        }
    }
}

/// Read-only view of a session, safe to hand out across threads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user_id: String,
    pub turn_count: u64,
    pub history_len: usize,
    pub last_intent: Option<IntentTag>,
    pub recent_intents: Vec<IntentTag>,
    pub success_rate: f32,
    pub expertise: Expertise,
    pub started_at: DateTime<Utc>,
}

/// All sessions, keyed by user id
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionContext>>>>,
    max_history: usize,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.max_history)
    }

    fn get(&self, user_id: &str) -> Option<Arc<Mutex<SessionContext>>> {
        self.sessions.read().get(user_id).cloned()
    }

    fn get_or_create(&self, user_id: &str) -> Arc<Mutex<SessionContext>> {
        if let Some(session) = self.get(user_id) {
            return session;
        }
        let mut sessions = self.sessions.write();
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(user_id = %user_id, "Created session");
                Arc::new(Mutex::new(SessionContext::new(user_id, self.max_history)))
            })
            .clone()
    }

    /// Record a classified turn for `user_id`, creating the session if needed
    pub fn record_turn(
        &self,
        user_id: &str,
        input: &str,
        result: ClassificationResult,
    ) -> SessionSnapshot {
        let session = self.get_or_create(user_id);
        let mut session = session.lock();
        session.record(input, result);
        session.snapshot()
    }

    pub fn last_intent(&self, user_id: &str) -> Option<IntentTag> {
        self.get(user_id).and_then(|s| s.lock().last_intent())
    }

    pub fn snapshot(&self, user_id: &str) -> Option<SessionSnapshot> {
        self.get(user_id).map(|s| s.lock().snapshot())
    }

    /// Copy of the user's history, oldest first
    pub fn history(&self, user_id: &str) -> Vec<TurnRecord> {
        self.get(user_id)
            .map(|s| s.lock().history().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of known users
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn user_ids(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxta_core::MatchMethod;

    fn result(intent: IntentTag, confidence: f32) -> ClassificationResult {
        ClassificationResult::new(intent, confidence, MatchMethod::PatternMatch)
    }

    #[test]
    fn test_history_keeps_last_fifty() {
        let store = SessionStore::default();
        for i in 0..60 {
            store.record_turn("alice", &format!("turn {i}"), result(IntentTag::Status, 0.9));
        }

        let history = store.history("alice");
        assert_eq!(history.len(), 50);
        let inputs: Vec<String> = history.iter().map(|t| t.input.clone()).collect();
        let expected: Vec<String> = (10..60).map(|i| format!("turn {i}")).collect();
        assert_eq!(inputs, expected);

        let snapshot = store.snapshot("alice").unwrap();
        assert_eq!(snapshot.turn_count, 60);
        assert_eq!(snapshot.history_len, 50);
    }

    #[test]
    fn test_oversized_bound_is_clamped() {
        let store = SessionStore::new(100);
        for i in 0..60 {
            store.record_turn("bob", &format!("turn {i}"), result(IntentTag::Help, 0.9));
        }

        let history = store.history("bob");
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].input, "turn 10");
        assert_eq!(store.snapshot("bob").unwrap().history_len, 50);
    }

    #[test]
    fn test_zero_bound_keeps_one_turn() {
        let mut session = SessionContext::new("carol", 0);
        session.record("hello", result(IntentTag::Greeting, 0.97));
        session.record("help", result(IntentTag::Help, 0.98));
        assert_eq!(session.history().count(), 1);
    }

    #[test]
    fn test_last_intent_tracks_latest_turn() {
        let store = SessionStore::default();
        assert_eq!(store.last_intent("bob"), None);

        store.record_turn("bob", "hello", result(IntentTag::Greeting, 0.97));
        store.record_turn("bob", "list auctions", result(IntentTag::Listing, 0.99));
        assert_eq!(store.last_intent("bob"), Some(IntentTag::Listing));
    }

    #[test]
    fn test_success_rate_moving_average() {
        let mut session = SessionContext::new("carol", 50);
        session.record("help", result(IntentTag::Help, 0.98));
        assert!((session.success_rate() - 0.1).abs() < 1e-6);

        session.record("help", result(IntentTag::Help, 0.98));
        assert!((session.success_rate() - 0.19).abs() < 1e-6);

        // low-confidence turns leave the rate alone
        session.record("???", result(IntentTag::Unknown, 0.1));
        assert!((session.success_rate() - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_expertise_after_five_turns() {
        let mut session = SessionContext::new("dave", 50);
        for _ in 0..4 {
            session.record("status", result(IntentTag::Status, 0.99));
        }
        assert_eq!(session.expertise(), Expertise::Beginner);
        session.record("status", result(IntentTag::Status, 0.99));
        assert_eq!(session.expertise(), Expertise::Experienced);
    }

    #[test]
    fn test_recent_intents_oldest_first() {
        let mut session = SessionContext::new("erin", 50);
        session.record("hi", result(IntentTag::Greeting, 0.97));
        session.record("list", result(IntentTag::Listing, 0.75));
        session.record("bid 10", result(IntentTag::Bidding, 0.95));
        session.record("status", result(IntentTag::Status, 0.99));

        assert_eq!(
            session.recent_intents(3),
            vec![IntentTag::Listing, IntentTag::Bidding, IntentTag::Status]
        );
        assert_eq!(session.recent_intents(10).len(), 4);
    }

    #[test]
    fn test_users_are_isolated() {
        let store = SessionStore::default();
        store.record_turn("a", "hi", result(IntentTag::Greeting, 0.97));
        store.record_turn("b", "help", result(IntentTag::Help, 0.98));

        assert_eq!(store.len(), 2);
        assert_eq!(store.history("a").len(), 1);
        assert_eq!(store.last_intent("b"), Some(IntentTag::Help));
        assert!(store.snapshot("nobody").is_none());
    }

    #[test]
    fn test_concurrent_turns_for_one_user() {
        let store = Arc::new(SessionStore::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..20 {
                        store.record_turn("shared", &format!("{t}-{i}"), result(IntentTag::Status, 0.9));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot("shared").unwrap();
        assert_eq!(snapshot.turn_count, 160);
        assert_eq!(snapshot.history_len, 50);
    }
}
