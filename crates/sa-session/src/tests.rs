use crate::*;
use sa_core::{Intent, SentimentCategory};
use std::sync::Arc;
use std::thread;

fn turn(text: &str, sentiment: SentimentCategory) -> Turn {
    Turn::new(text, sentiment, Intent::Unknown)
}

// ========== Session ==========

#[test]
fn test_session_new_is_empty() {
    let s = ConversationSession::new("u1");
    assert_eq!(s.user_id, "u1");
    assert!(s.messages.is_empty());
    assert_eq!(s.failure_count, 0);
    assert_eq!(s.last_intent, None);
    assert!(!s.escalated);
    assert_eq!(s.total_turns, 0);
}

#[test]
fn test_record_turn_updates_last() {
    let mut s = ConversationSession::new("u");
    s.record_turn(Turn::new("where is my order", SentimentCategory::Negative, Intent::OrderTracking), 10);
    assert_eq!(s.message_count(), 1);
    assert_eq!(s.last_intent, Some(Intent::OrderTracking));
    assert_eq!(s.last_sentiment, SentimentCategory::Negative);
    assert_eq!(s.last_turn().map(|t| t.text.as_str()), Some("where is my order"));
}

#[test]
fn test_record_turn_trims_oldest() {
    let mut s = ConversationSession::new("u");
    for i in 0..5 {
        s.record_turn(turn(&format!("m{i}"), SentimentCategory::Neutral), 3);
    }
    assert_eq!(s.message_count(), 3);
    assert_eq!(s.total_turns, 5);
    let texts: Vec<&str> = s.messages.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["m2", "m3", "m4"]);
}

#[test]
fn test_record_turn_zero_limit_keeps_one() {
    let mut s = ConversationSession::new("u");
    s.record_turn(turn("a", SentimentCategory::Neutral), 0);
    s.record_turn(turn("b", SentimentCategory::Neutral), 0);
    assert_eq!(s.message_count(), 1);
    assert_eq!(s.last_turn().map(|t| t.text.as_str()), Some("b"));
}

#[test]
fn test_failure_count_monotonic() {
    let mut s = ConversationSession::new("u");
    let mut prev = s.failure_count;
    for _ in 0..4 {
        s.record_failure();
        assert!(s.failure_count > prev);
        prev = s.failure_count;
    }
    assert_eq!(s.failure_count, 4);
}

#[test]
fn test_failure_count_saturates() {
    let mut s = ConversationSession::new("u");
    s.failure_count = u32::MAX;
    s.record_failure();
    assert_eq!(s.failure_count, u32::MAX);
}

#[test]
fn test_escalated_is_sticky() {
    let mut s = ConversationSession::new("u");
    s.mark_escalated();
    s.record_turn(turn("thanks", SentimentCategory::Positive), 10);
    assert!(s.escalated);
}

#[test]
fn test_session_display() {
    let s = ConversationSession::new("alice");
    let d = s.to_string();
    assert!(d.contains("alice"));
    assert!(d.contains("failures=0"));
}

#[test]
fn test_session_json_shape() {
    let mut s = ConversationSession::new("u");
    s.record_turn(Turn::new("hello", SentimentCategory::Neutral, Intent::Greeting), 10);
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["user_id"], "u");
    assert_eq!(v["messages"][0]["intent"], "greeting");
    assert_eq!(v["messages"][0]["sentiment"], "neutral");
    assert_eq!(v["last_intent"], "greeting");
    let back: ConversationSession = serde_json::from_value(v).unwrap();
    assert_eq!(back.messages, s.messages);
}

// ========== Store ==========

#[test]
fn test_store_get_or_create() {
    let store = InMemorySessionStore::new();
    assert!(store.is_empty());
    assert!(store.get("u").is_none());
    let s = store.get_or_create("u");
    assert_eq!(s.user_id, "u");
    assert_eq!(store.len(), 1);
    assert!(store.get("u").is_some());
}

#[test]
fn test_store_get_does_not_create() {
    let store = InMemorySessionStore::new();
    assert!(store.get("ghost").is_none());
    assert!(store.is_empty());
}

#[test]
fn test_store_record_turn() {
    let store = InMemorySessionStore::new();
    store.record_turn("u", "find shoes", SentimentCategory::Neutral, Intent::ProductSearch);
    store.record_turn("u", "thanks", SentimentCategory::Positive, Intent::Unknown);
    let s = store.get("u").unwrap();
    assert_eq!(s.message_count(), 2);
    assert_eq!(s.last_intent, Some(Intent::Unknown));
}

#[test]
fn test_store_history_limit() {
    let store = InMemorySessionStore::with_history_limit(2);
    assert_eq!(store.history_limit(), 2);
    for i in 0..4 {
        store.record_turn("u", &format!("m{i}"), SentimentCategory::Neutral, Intent::Unknown);
    }
    let s = store.get("u").unwrap();
    assert_eq!(s.message_count(), 2);
    assert_eq!(s.total_turns, 4);
}

#[test]
fn test_store_default_history_limit() {
    let store = InMemorySessionStore::default();
    assert_eq!(store.history_limit(), sa_core::config::DEFAULT_HISTORY_LIMIT);
}

#[test]
fn test_store_reset() {
    let store = InMemorySessionStore::new();
    store.with_session("u", |s| {
        s.record_failure();
        s.mark_escalated();
    });
    assert!(store.reset("u"));
    assert!(!store.reset("u"));
    let fresh = store.get_or_create("u");
    assert_eq!(fresh.failure_count, 0);
    assert!(!fresh.escalated);
}

#[test]
fn test_store_user_ids_sorted() {
    let store = InMemorySessionStore::new();
    for id in ["carol", "alice", "bob"] {
        store.get_or_create(id);
    }
    assert_eq!(store.user_ids(), vec!["alice", "bob", "carol"]);
    store.clear();
    assert!(store.is_empty());
}

#[test]
fn test_store_with_session_returns_value() {
    let store = InMemorySessionStore::new();
    let before = store.with_session("u", |s| {
        let before = s.failure_count;
        s.record_failure();
        before
    });
    assert_eq!(before, 0);
    assert_eq!(store.get("u").unwrap().failure_count, 1);
}

#[test]
fn test_store_users_isolated() {
    let store = InMemorySessionStore::new();
    store.with_session("a", |s| s.record_failure());
    assert_eq!(store.get_or_create("b").failure_count, 0);
    assert_eq!(store.get("a").unwrap().failure_count, 1);
}

// ========== Concurrency ==========

#[test]
fn test_concurrent_same_user_no_lost_updates() {
    let store = Arc::new(InMemorySessionStore::with_history_limit(1000));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    store.with_session("shared", |s| {
                        s.record_turn(
                            Turn::new(format!("t{t}-{i}"), SentimentCategory::Neutral, Intent::Unknown),
                            1000,
                        );
                        s.record_failure();
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let s = store.get("shared").unwrap();
    assert_eq!(s.failure_count, 400);
    assert_eq!(s.total_turns, 400);
    assert_eq!(s.message_count(), 400);
}

#[test]
fn test_concurrent_distinct_users() {
    let store = Arc::new(InMemorySessionStore::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                let user = format!("user{t}");
                for _ in 0..10 {
                    store.record_turn(&user, "hello", SentimentCategory::Neutral, Intent::Greeting);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 8);
    for id in store.user_ids() {
        assert_eq!(store.get(&id).unwrap().total_turns, 10);
    }
}
