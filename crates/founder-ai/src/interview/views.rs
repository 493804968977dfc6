use serde::Serialize;

use super::catalog::QuestionCatalog;
use super::domain::{AnswerKind, AnswerValue, ChoiceOption, SessionId, VisibilityRule};
use super::session::{InterviewSession, SessionStatus};

/// Client-facing rendering of the current question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: &'static str,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<&'static str>,
    pub kind: AnswerKind,
    pub kind_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl QuestionView {
    pub(crate) fn capture(session: &InterviewSession) -> Option<Self> {
        let question = session.current_question().ok()?;
        let options = session.current_options().ok()?;

        Some(Self {
            id: question.id,
            prompt: question.prompt,
            subtext: question.subtext,
            disclaimer: question.disclaimer,
            insight: question.insight,
            kind: question.kind,
            kind_label: question.kind.label(),
            options,
        })
    }
}

/// Session state as returned by every interview endpoint: progress, signals,
/// and the question to render next (absent once the flow is complete).
#[derive(Debug, Clone, Serialize)]
pub struct SessionStateView {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub status_label: &'static str,
    pub answered: usize,
    pub visible_total: usize,
    pub confidence: u8,
    pub signals: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill: Option<AnswerValue>,
}

impl SessionStateView {
    pub(crate) fn capture(
        session_id: SessionId,
        session: &InterviewSession,
        prefill: Option<AnswerValue>,
    ) -> Self {
        let status = session.status();

        Self {
            session_id,
            status,
            status_label: status.label(),
            answered: session.cursor(),
            visible_total: session.visible_questions().len(),
            confidence: session.confidence(),
            signals: session.signals(),
            question: QuestionView::capture(session),
            prefill,
        }
    }
}

/// One catalog entry summarized for authors.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionOutline {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: AnswerKind,
    pub kind_label: &'static str,
    pub visibility: String,
    pub options: String,
    pub signal_tags: Vec<&'static str>,
}

/// Authoring-time summary of a whole catalog, used by the CLI outline
/// command and the catalog endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogOutline {
    pub question_count: usize,
    pub always_visible_count: usize,
    pub gated_count: usize,
    pub dynamic_option_count: usize,
    pub questions: Vec<QuestionOutline>,
}

impl CatalogOutline {
    pub fn from_catalog(catalog: &QuestionCatalog) -> Self {
        let questions: Vec<QuestionOutline> = catalog
            .questions()
            .iter()
            .map(|question| QuestionOutline {
                id: question.id,
                prompt: question.prompt,
                kind: question.kind,
                kind_label: question.kind.label(),
                visibility: question.visibility.summary(),
                options: question.options.summary(),
                signal_tags: question.signal_tags.to_vec(),
            })
            .collect();

        let always_visible_count = catalog
            .questions()
            .iter()
            .filter(|question| matches!(question.visibility, VisibilityRule::Always))
            .count();
        let dynamic_option_count = catalog
            .questions()
            .iter()
            .filter(|question| question.options.is_dynamic())
            .count();

        Self {
            question_count: questions.len(),
            always_visible_count,
            gated_count: questions.len() - always_visible_count,
            dynamic_option_count,
            questions,
        }
    }
}
