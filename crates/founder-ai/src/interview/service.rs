use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerValue, SessionId};
use super::repository::{
    EnrichmentError, EnrichmentRequest, EnrichmentSink, ProfileRecord, ProfileRepository,
    RepositoryError,
};
use super::session::{InterviewSession, SessionError, SubmitOutcome};
use super::views::SessionStateView;

/// Service owning the live session registry and the completion handoff to
/// the profile store and enrichment sink.
///
/// All session mutation happens under one registry lock, so concurrent
/// submissions to the same session serialize instead of interleaving.
pub struct InterviewService<R, E> {
    catalog: Arc<QuestionCatalog>,
    sessions: Mutex<HashMap<SessionId, TrackedSession>>,
    profiles: Arc<R>,
    enrichment: Arc<E>,
    capacity: usize,
}

struct TrackedSession {
    session: InterviewSession,
    started_at: DateTime<Utc>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("intv-{id:06}"))
}

fn enrichment_request(record: &ProfileRecord) -> EnrichmentRequest {
    let mut highlights = BTreeMap::new();
    for answer in &record.snapshot.answers {
        let rendered = match &answer.value {
            AnswerValue::Scalar(value) => value.clone(),
            AnswerValue::Selections(values) => values.join(", "),
        };
        highlights.insert(answer.question_id.to_string(), rendered);
    }

    EnrichmentRequest {
        session_id: record.session_id.clone(),
        signals: record.snapshot.signals.clone(),
        highlights,
    }
}

impl<R, E> InterviewService<R, E>
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    pub fn new(
        catalog: QuestionCatalog,
        profiles: Arc<R>,
        enrichment: Arc<E>,
        capacity: usize,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Mutex::new(HashMap::new()),
            profiles,
            enrichment,
            capacity,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn live_sessions(&self) -> usize {
        self.lock_sessions().len()
    }

    /// Open a new session and return its initial state.
    pub fn start(&self) -> Result<SessionStateView, InterviewServiceError> {
        let mut sessions = self.lock_sessions();
        if sessions.len() >= self.capacity {
            return Err(InterviewServiceError::AtCapacity(self.capacity));
        }

        let session_id = next_session_id();
        let session = InterviewSession::new(Arc::clone(&self.catalog));
        let view = SessionStateView::capture(session_id.clone(), &session, None);
        sessions.insert(
            session_id,
            TrackedSession {
                session,
                started_at: Utc::now(),
            },
        );

        Ok(view)
    }

    /// Current state of a live session.
    pub fn state(&self, session_id: &SessionId) -> Result<SessionStateView, InterviewServiceError> {
        let sessions = self.lock_sessions();
        let tracked = sessions
            .get(session_id)
            .ok_or_else(|| InterviewServiceError::UnknownSession(session_id.clone()))?;

        Ok(SessionStateView::capture(
            session_id.clone(),
            &tracked.session,
            None,
        ))
    }

    /// Commit an answer. A completing answer also persists the profile and
    /// notifies enrichment before returning; the session stays queryable
    /// until it is released.
    pub fn submit(
        &self,
        session_id: &SessionId,
        value: AnswerValue,
    ) -> Result<SessionStateView, InterviewServiceError> {
        let mut sessions = self.lock_sessions();
        let tracked = sessions
            .get_mut(session_id)
            .ok_or_else(|| InterviewServiceError::UnknownSession(session_id.clone()))?;

        let outcome = tracked.session.submit_answer(value)?;
        let view = SessionStateView::capture(session_id.clone(), &tracked.session, None);

        if let SubmitOutcome::Completed(snapshot) = outcome {
            let record = ProfileRecord {
                session_id: session_id.clone(),
                snapshot,
                started_at: tracked.started_at,
                completed_at: Utc::now(),
            };
            let request = enrichment_request(&record);

            // The registry lock is not held across storage or transport.
            drop(sessions);
            self.profiles.upsert(record)?;
            self.enrichment.publish(request)?;
        }

        Ok(view)
    }

    /// Step back one question, returning the popped value as a prefill.
    pub fn back(&self, session_id: &SessionId) -> Result<SessionStateView, InterviewServiceError> {
        let mut sessions = self.lock_sessions();
        let tracked = sessions
            .get_mut(session_id)
            .ok_or_else(|| InterviewServiceError::UnknownSession(session_id.clone()))?;

        let popped = tracked.session.go_back()?;

        Ok(SessionStateView::capture(
            session_id.clone(),
            &tracked.session,
            Some(popped.value),
        ))
    }

    /// Fetch the persisted profile for a completed interview.
    pub fn profile(&self, session_id: &SessionId) -> Result<ProfileRecord, InterviewServiceError> {
        let completed_locally = {
            let sessions = self.lock_sessions();
            match sessions.get(session_id) {
                Some(tracked) => {
                    if !tracked.session.is_complete() {
                        return Err(InterviewServiceError::ProfileNotReady {
                            session_id: session_id.clone(),
                        });
                    }
                    true
                }
                None => false,
            }
        };

        match self.profiles.fetch(session_id)? {
            Some(record) => Ok(record),
            // Completed in the registry but missing from the store means the
            // completion handoff failed; the profile is not ready rather
            // than unknown.
            None if completed_locally => Err(InterviewServiceError::ProfileNotReady {
                session_id: session_id.clone(),
            }),
            None => Err(InterviewServiceError::UnknownSession(session_id.clone())),
        }
    }

    /// Most recently completed profiles from the store.
    pub fn completed_profiles(
        &self,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>, InterviewServiceError> {
        Ok(self.profiles.completed(limit)?)
    }

    /// Drop a session from the registry, freeing its capacity slot. The
    /// persisted profile, if any, is unaffected.
    pub fn release(&self, session_id: &SessionId) -> Result<(), InterviewServiceError> {
        let mut sessions = self.lock_sessions();
        sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| InterviewServiceError::UnknownSession(session_id.clone()))
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<SessionId, TrackedSession>> {
        self.sessions.lock().expect("session registry mutex poisoned")
    }
}

/// Error raised by the interview service.
#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionId),
    #[error("session '{session_id}' has not completed its interview")]
    ProfileNotReady { session_id: SessionId },
    #[error("session registry is at capacity ({0})")]
    AtCapacity(usize),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
}
