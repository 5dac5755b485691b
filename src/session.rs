//! In-memory analysis sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::{AnalysisError, DocumentType, Language};
use crate::pipeline::IngestedBatch;

/// Outcome of one user action.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Operation label or the question asked.
    pub label: String,
    /// Response text, or the error message when `failed` is set.
    pub text: String,
    pub failed: bool,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn from_result(label: impl Into<String>, result: Result<String, AnalysisError>) -> Self {
        let failed = result.is_err();
        Self {
            label: label.into(),
            text: AnalysisError::display_or_error(result),
            failed,
            created_at: Utc::now(),
        }
    }
}

/// Append-only result log, listed newest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<AnalysisResult>,
}

impl History {
    pub fn push(&mut self, result: AnalysisResult) {
        self.entries.push(result);
    }

    pub fn newest_first(&self) -> Vec<AnalysisResult> {
        self.entries.iter().rev().cloned().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub text: String,
    pub doc_type: DocumentType,
    pub documents: usize,
    pub language: Language,
    pub history: History,
    pub created_at: DateTime<Utc>,
    last_active: Instant,
}

impl Session {
    pub fn new(batch: IngestedBatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: batch.text,
            doc_type: batch.doc_type,
            documents: batch.documents,
            language: Language::default(),
            history: History::default(),
            created_at: Utc::now(),
            last_active: Instant::now(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            document_type: self.doc_type.label.clone(),
            category: self.doc_type.category.to_string(),
            characters: self.text.chars().count(),
            documents: self.documents,
            language: self.language,
            history_len: self.history.entries.len(),
            created_at: self.created_at,
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.last_active.elapsed() > ttl)
    }
}

/// JSON view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub document_type: String,
    pub category: String,
    pub characters: usize,
    pub documents: usize,
    pub language: Language,
    pub history_len: usize,
    pub created_at: DateTime<Utc>,
}

/// Data an operation needs, copied out so no lock is held while it runs.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub text: String,
    pub doc_type: DocumentType,
    pub language: Language,
}

/// Shared session map.
///
/// Sessions idle for longer than the TTL are invisible to lookups and are
/// dropped on the next insert.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub async fn insert(&self, session: Session) -> SessionSummary {
        let summary = session.summary();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle session(s)", evicted);
        }

        sessions.insert(session.id, session);
        summary
    }

    pub async fn summary(&self, id: Uuid) -> Option<SessionSummary> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl))
            .map(Session::summary)
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<SessionSnapshot> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl))
            .map(|s| SessionSnapshot {
                text: s.text.clone(),
                doc_type: s.doc_type.clone(),
                language: s.language,
            })
    }

    /// Append a result and remember the language it was produced in.
    /// Returns `false` if the session was removed or expired in the meantime.
    pub async fn record(&self, id: Uuid, language: Language, result: AnalysisResult) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(session) if !session.is_expired(self.ttl) => {
                session.language = language;
                session.history.push(result);
                session.last_active = Instant::now();
                true
            }
            _ => false,
        }
    }

    pub async fn history(&self, id: Uuid) -> Option<Vec<AnalysisResult>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl))
            .map(|s| s.history.newest_first())
    }

    /// Drop a session with its text and history.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired(self.ttl))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str) -> AnalysisResult {
        AnalysisResult::from_result(label, Ok(format!("{} text", label)))
    }

    fn batch(text: &str) -> IngestedBatch {
        IngestedBatch {
            text: text.to_string(),
            doc_type: DocumentType::from_label("Legal Contract"),
            documents: 1,
        }
    }

    #[test]
    fn test_history_newest_first() {
        let mut history = History::default();
        history.push(result("first"));
        history.push(result("second"));
        history.push(result("third"));

        let labels: Vec<String> = history.newest_first().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_failed_flag_from_error() {
        let failed = AnalysisResult::from_result("Ask", Err(AnalysisError::NoContent));
        assert!(failed.failed);
        assert_eq!(failed.text, "No content extracted from the documents.");
        assert!(!result("ok").failed);
    }

    #[tokio::test]
    async fn test_store_lifecycle() {
        let store = SessionStore::new(None);
        let summary = store.insert(Session::new(batch("héllo"))).await;
        assert_eq!(summary.characters, 5);
        assert_eq!(summary.category, "Legal Contract/Agreement");

        assert!(store.record(summary.id, Language::Hindi, result("Summary")).await);
        let snapshot = store.snapshot(summary.id).await.unwrap();
        assert_eq!(snapshot.language, Language::Hindi);
        assert_eq!(store.history(summary.id).await.unwrap().len(), 1);

        assert!(store.remove(summary.id).await);
        assert!(store.snapshot(summary.id).await.is_none());
        assert!(!store.record(summary.id, Language::English, result("x")).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let store = SessionStore::new(Some(Duration::from_millis(200)));
        let stale = store.insert(Session::new(batch("old"))).await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(store.summary(stale.id).await.is_none());
        assert!(store.snapshot(stale.id).await.is_none());
        assert!(!store.record(stale.id, Language::English, result("x")).await);

        let fresh = store.insert(Session::new(batch("new"))).await;
        assert!(store.summary(fresh.id).await.is_some());
        assert_eq!(store.len().await, 1);
        // Evicted on insert, not just hidden.
        assert!(!store.remove(stale.id).await);
    }
}
