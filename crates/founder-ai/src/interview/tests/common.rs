use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::interview::catalog::QuestionCatalog;
use crate::interview::domain::{
    AnswerKind, ChoiceOption, OptionSource, Question, SessionId, VisibilityRule,
};
use crate::interview::repository::{
    EnrichmentError, EnrichmentRequest, EnrichmentSink, ProfileRecord, ProfileRepository,
    RepositoryError,
};
use crate::interview::router::interview_router;
use crate::interview::service::InterviewService;

/// Two-question flow where the revenue follow-up unlocks only for paying
/// customers.
pub(super) fn traction_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        Question {
            id: "has_customers",
            prompt: "Do you have paying customers yet?",
            subtext: None,
            disclaimer: None,
            insight: None,
            kind: AnswerKind::SingleChoice,
            options: OptionSource::Static(const {
                &[
                    ChoiceOption::new("no", "Not yet"),
                    ChoiceOption::new("early", "A few early adopters"),
                    ChoiceOption::new("yes", "Yes, paying customers"),
                ]
            }),
            visibility: VisibilityRule::Always,
            signal_tags: &["traction"],
        },
        Question {
            id: "mrr",
            prompt: "What is your monthly recurring revenue in USD?",
            subtext: None,
            disclaimer: None,
            insight: None,
            kind: AnswerKind::Numeric,
            options: OptionSource::none(),
            visibility: VisibilityRule::AnswerEquals {
                question: "has_customers",
                value: "yes",
            },
            signal_tags: &["revenue", "traction"],
        },
    ])
    .expect("traction catalog is well formed")
}

/// Two-question flow where the second question derives its options from the
/// first answer's selections.
pub(super) fn feature_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        Question {
            id: "core_features",
            prompt: "Which capabilities form the core of your product?",
            subtext: None,
            disclaimer: None,
            insight: None,
            kind: AnswerKind::MultiSelect,
            options: OptionSource::Static(const {
                &[
                    ChoiceOption::new("analytics", "Analytics"),
                    ChoiceOption::new("automation", "Automation"),
                    ChoiceOption::new("reporting", "Reporting"),
                ]
            }),
            visibility: VisibilityRule::Always,
            signal_tags: &["product-shape"],
        },
        Question {
            id: "value_impact",
            prompt: "Which of those capabilities delivers the most customer value?",
            subtext: None,
            disclaimer: None,
            insight: None,
            kind: AnswerKind::SingleChoice,
            options: OptionSource::SelectionsOf {
                source: "core_features",
            },
            visibility: VisibilityRule::Always,
            signal_tags: &["value-prop"],
        },
    ])
    .expect("feature catalog is well formed")
}

pub(super) fn build_service(
    catalog: QuestionCatalog,
) -> (
    InterviewService<MemoryProfiles, MemoryEnrichment>,
    Arc<MemoryProfiles>,
    Arc<MemoryEnrichment>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let enrichment = Arc::new(MemoryEnrichment::default());
    let service = InterviewService::new(catalog, profiles.clone(), enrichment.clone(), 32);
    (service, profiles, enrichment)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<SessionId, ProfileRecord>>>,
}

impl MemoryProfiles {
    pub(super) fn stored(&self) -> Vec<ProfileRecord> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl ProfileRepository for MemoryProfiles {
    fn upsert(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn completed(&self, limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        let mut records: Vec<ProfileRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEnrichment {
    events: Arc<Mutex<Vec<EnrichmentRequest>>>,
}

impl MemoryEnrichment {
    pub(super) fn events(&self) -> Vec<EnrichmentRequest> {
        self.events.lock().expect("enrichment mutex poisoned").clone()
    }
}

impl EnrichmentSink for MemoryEnrichment {
    fn publish(&self, request: EnrichmentRequest) -> Result<(), EnrichmentError> {
        self.events
            .lock()
            .expect("enrichment mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn upsert(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("profile store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("profile store offline".to_string()))
    }

    fn completed(&self, _limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("profile store offline".to_string()))
    }
}

pub(super) struct FailingEnrichment;

impl EnrichmentSink for FailingEnrichment {
    fn publish(&self, _request: EnrichmentRequest) -> Result<(), EnrichmentError> {
        Err(EnrichmentError::Transport("enrichment queue offline".to_string()))
    }
}

pub(super) fn interview_router_with_service(
    service: InterviewService<MemoryProfiles, MemoryEnrichment>,
) -> axum::Router {
    interview_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
