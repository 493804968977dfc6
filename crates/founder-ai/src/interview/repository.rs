use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::SessionId;
use super::session::ProfileSnapshot;

/// Persisted result of one completed interview.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRecord {
    pub session_id: SessionId,
    pub snapshot: ProfileSnapshot,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn upsert(&self, record: ProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileRecord>, RepositoryError>;
    fn completed(&self, limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError>;
}

/// Error enumeration for profile store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notifying downstream enrichment that a profile is ready.
pub trait EnrichmentSink: Send + Sync {
    fn publish(&self, request: EnrichmentRequest) -> Result<(), EnrichmentError>;
}

/// Payload handed to enrichment when an interview completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentRequest {
    pub session_id: SessionId,
    pub signals: Vec<&'static str>,
    pub highlights: BTreeMap<String, String>,
}

/// Enrichment dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment transport unavailable: {0}")]
    Transport(String),
}
