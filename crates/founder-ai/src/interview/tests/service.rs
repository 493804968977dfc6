use std::collections::BTreeMap;
use std::sync::Arc;

use super::common::{
    build_service, feature_catalog, traction_catalog, FailingEnrichment, MemoryEnrichment,
    MemoryProfiles, UnavailableProfiles,
};
use crate::interview::domain::{AnswerValue, SessionId};
use crate::interview::repository::EnrichmentRequest;
use crate::interview::service::{InterviewService, InterviewServiceError};
use crate::interview::session::{SessionError, SessionStatus};

#[test]
fn start_assigns_prefixed_unique_session_ids() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());

    let first = service.start().expect("first session").session_id;
    let second = service.start().expect("second session").session_id;

    assert!(first.0.starts_with("intv-"));
    assert!(second.0.starts_with("intv-"));
    assert_ne!(first, second);
    assert_eq!(service.live_sessions(), 2);
}

#[test]
fn a_fresh_session_reports_zero_progress() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());

    let started = service.start().expect("session starts");

    assert_eq!(started.status, SessionStatus::InProgress);
    assert_eq!(started.status_label, "in progress");
    assert_eq!(started.answered, 0);
    assert_eq!(started.visible_total, 1);
    assert_eq!(started.confidence, 0);
    assert!(started.signals.is_empty());
    assert!(started.prefill.is_none());

    let question = started.question.expect("first question");
    assert_eq!(question.id, "has_customers");
    assert_eq!(question.kind_label, "single choice");
    let values: Vec<&str> = question.options.iter().map(|option| option.value).collect();
    assert_eq!(values, ["no", "early", "yes"]);
}

#[test]
fn a_qualifying_answer_extends_the_visible_flow() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    let advanced = service
        .submit(&id, AnswerValue::scalar("yes"))
        .expect("answer accepted");

    assert_eq!(advanced.status, SessionStatus::InProgress);
    assert_eq!(advanced.answered, 1);
    assert_eq!(advanced.visible_total, 2);
    assert_eq!(advanced.confidence, 50);
    assert_eq!(advanced.signals, ["traction"]);
    assert_eq!(advanced.question.map(|question| question.id), Some("mrr"));
}

#[test]
fn rejected_answer_leaves_the_session_untouched() {
    let (service, profiles, enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    let err = service
        .submit(&id, AnswerValue::scalar("maybe"))
        .expect_err("unlisted option");
    assert!(matches!(
        err,
        InterviewServiceError::Session(SessionError::InvalidAnswerKind {
            question_id: "has_customers",
            ..
        })
    ));

    let state = service.state(&id).expect("session is still live");
    assert_eq!(state.answered, 0);
    assert_eq!(state.confidence, 0);
    assert!(profiles.stored().is_empty());
    assert!(enrichment.events().is_empty());
}

#[test]
fn completion_persists_the_profile_and_notifies_enrichment() {
    let (service, profiles, enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    service
        .submit(&id, AnswerValue::scalar("yes"))
        .expect("traction answer");
    let done = service
        .submit(&id, AnswerValue::scalar(" 4200 "))
        .expect("revenue answer");

    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.status_label, "completed");
    assert_eq!(done.confidence, 100);
    assert!(done.question.is_none());

    let stored = profiles.stored();
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.session_id, id);
    assert_eq!(record.snapshot.confidence, 100);
    assert_eq!(record.snapshot.signals, ["traction", "revenue", "traction"]);
    assert_eq!(record.snapshot.answers.len(), 2);
    assert_eq!(record.snapshot.answers[1].question_id, "mrr");
    assert_eq!(record.snapshot.answers[1].value, AnswerValue::scalar("4200"));
    assert!(record.completed_at >= record.started_at);

    let mut highlights = BTreeMap::new();
    highlights.insert("has_customers".to_string(), "yes".to_string());
    highlights.insert("mrr".to_string(), "4200".to_string());
    assert_eq!(
        enrichment.events(),
        vec![EnrichmentRequest {
            session_id: id,
            signals: vec!["traction", "revenue", "traction"],
            highlights,
        }]
    );
}

#[test]
fn enrichment_highlights_join_multi_selections() {
    let (service, _profiles, enrichment) = build_service(feature_catalog());
    let id = service.start().expect("session starts").session_id;

    service
        .submit(&id, AnswerValue::selections(["analytics", "reporting"]))
        .expect("feature answer");
    let done = service
        .submit(&id, AnswerValue::scalar("reporting"))
        .expect("impact answer");
    assert_eq!(done.status, SessionStatus::Completed);

    let events = enrichment.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].highlights.get("core_features"),
        Some(&"analytics, reporting".to_string())
    );
    assert_eq!(
        events[0].highlights.get("value_impact"),
        Some(&"reporting".to_string())
    );
}

#[test]
fn capacity_is_enforced_until_a_session_is_released() {
    let service = InterviewService::new(
        traction_catalog(),
        Arc::new(MemoryProfiles::default()),
        Arc::new(MemoryEnrichment::default()),
        1,
    );

    let only = service.start().expect("first session fits").session_id;
    let err = service.start().expect_err("registry is full");
    assert!(matches!(err, InterviewServiceError::AtCapacity(1)));

    service.release(&only).expect("release frees the slot");
    assert_eq!(service.live_sessions(), 0);
    service.start().expect("slot is free again");
}

#[test]
fn operations_on_unknown_sessions_are_typed_errors() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let ghost = SessionId("intv-ghost".to_string());

    assert!(matches!(
        service.state(&ghost),
        Err(InterviewServiceError::UnknownSession(_))
    ));
    assert!(matches!(
        service.submit(&ghost, AnswerValue::scalar("yes")),
        Err(InterviewServiceError::UnknownSession(_))
    ));
    assert!(matches!(
        service.back(&ghost),
        Err(InterviewServiceError::UnknownSession(_))
    ));
    assert!(matches!(
        service.release(&ghost),
        Err(InterviewServiceError::UnknownSession(_))
    ));
    assert!(matches!(
        service.profile(&ghost),
        Err(InterviewServiceError::UnknownSession(_))
    ));
}

#[test]
fn profile_is_not_ready_before_completion() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    assert!(matches!(
        service.profile(&id),
        Err(InterviewServiceError::ProfileNotReady { .. })
    ));

    service
        .submit(&id, AnswerValue::scalar("no"))
        .expect("closing answer");
    let record = service.profile(&id).expect("profile is ready");
    assert_eq!(record.session_id, id);
}

#[test]
fn released_sessions_keep_their_stored_profile() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    service
        .submit(&id, AnswerValue::scalar("no"))
        .expect("closing answer");
    service.release(&id).expect("session released");

    assert_eq!(service.live_sessions(), 0);
    let record = service.profile(&id).expect("profile outlives the session");
    assert_eq!(record.session_id, id);
    assert_eq!(record.snapshot.confidence, 100);
}

#[test]
fn storage_failure_surfaces_and_skips_enrichment() {
    let enrichment = Arc::new(MemoryEnrichment::default());
    let service = InterviewService::new(
        traction_catalog(),
        Arc::new(UnavailableProfiles),
        Arc::clone(&enrichment),
        8,
    );
    let id = service.start().expect("session starts").session_id;

    let err = service
        .submit(&id, AnswerValue::scalar("no"))
        .expect_err("store is offline");
    assert!(matches!(err, InterviewServiceError::Repository(_)));
    assert!(enrichment.events().is_empty());

    // the session itself still completed; the handoff can be retried
    let state = service.state(&id).expect("session is still live");
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.confidence, 100);
}

#[test]
fn enrichment_failure_still_stores_the_profile() {
    let profiles = Arc::new(MemoryProfiles::default());
    let service = InterviewService::new(
        traction_catalog(),
        Arc::clone(&profiles),
        Arc::new(FailingEnrichment),
        8,
    );
    let id = service.start().expect("session starts").session_id;

    let err = service
        .submit(&id, AnswerValue::scalar("no"))
        .expect_err("queue is offline");
    assert!(matches!(err, InterviewServiceError::Enrichment(_)));

    assert_eq!(profiles.stored().len(), 1);
    service.profile(&id).expect("profile was stored first");
}

#[test]
fn back_returns_the_prior_answer_as_prefill() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;
    service
        .submit(&id, AnswerValue::scalar("yes"))
        .expect("traction answer");

    let rewound = service.back(&id).expect("one step back");

    assert_eq!(rewound.status, SessionStatus::InProgress);
    assert_eq!(rewound.answered, 0);
    assert_eq!(rewound.prefill, Some(AnswerValue::scalar("yes")));
    assert_eq!(
        rewound.question.as_ref().map(|question| question.id),
        Some("has_customers")
    );
}

#[test]
fn back_reopens_a_completed_session() {
    let (service, profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;
    let done = service
        .submit(&id, AnswerValue::scalar("no"))
        .expect("closing answer");
    assert_eq!(done.status, SessionStatus::Completed);

    let rewound = service.back(&id).expect("reopen the flow");
    assert_eq!(rewound.status, SessionStatus::InProgress);
    assert_eq!(rewound.prefill, Some(AnswerValue::scalar("no")));

    // the stored profile is stale while the session is being re-driven
    assert!(matches!(
        service.profile(&id),
        Err(InterviewServiceError::ProfileNotReady { .. })
    ));

    service
        .submit(&id, AnswerValue::scalar("yes"))
        .expect("revised answer");
    service
        .submit(&id, AnswerValue::scalar("125"))
        .expect("revenue answer");

    // re-completion overwrites the earlier record for the same session
    assert_eq!(profiles.stored().len(), 1);
    let record = service.profile(&id).expect("profile is ready again");
    assert_eq!(record.snapshot.answers.len(), 2);
}

#[test]
fn back_before_any_answer_is_an_error() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());
    let id = service.start().expect("session starts").session_id;

    let err = service.back(&id).expect_err("nothing to rewind");
    assert!(matches!(
        err,
        InterviewServiceError::Session(SessionError::AtStart)
    ));
}

#[test]
fn completed_profiles_lists_in_completion_order() {
    let (service, _profiles, _enrichment) = build_service(traction_catalog());

    let first = service.start().expect("first session").session_id;
    service
        .submit(&first, AnswerValue::scalar("no"))
        .expect("first completion");
    let second = service.start().expect("second session").session_id;
    service
        .submit(&second, AnswerValue::scalar("no"))
        .expect("second completion");

    let records = service.completed_profiles(10).expect("listing succeeds");
    assert_eq!(records.len(), 2);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].completed_at <= pair[1].completed_at));
    let ids: Vec<&SessionId> = records.iter().map(|record| &record.session_id).collect();
    assert!(ids.contains(&&first));
    assert!(ids.contains(&&second));

    assert_eq!(service.completed_profiles(1).expect("capped listing").len(), 1);
}
