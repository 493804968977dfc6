use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for interview sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input widget a question expects, which also fixes the shape of a valid answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    SingleChoice,
    MultiSelect,
    Numeric,
    FreeText,
}

impl AnswerKind {
    pub const fn label(self) -> &'static str {
        match self {
            AnswerKind::SingleChoice => "single choice",
            AnswerKind::MultiSelect => "multi select",
            AnswerKind::Numeric => "numeric",
            AnswerKind::FreeText => "free text",
        }
    }
}

/// One selectable option: the stored value plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl ChoiceOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Gate deciding whether a question participates in the flow, evaluated
/// against the answer history on every read.
///
/// The closed variants cover the catalog's branching needs; `Custom` admits
/// any pure predicate a host wants to supply. A rule referencing an
/// unanswered (or differently shaped) answer is simply false.
#[derive(Debug, Clone, Copy)]
pub enum VisibilityRule {
    Always,
    AnswerEquals {
        question: &'static str,
        value: &'static str,
    },
    AnswerAmong {
        question: &'static str,
        any_of: &'static [&'static str],
    },
    SelectionIncludes {
        question: &'static str,
        option: &'static str,
    },
    Custom(fn(&AnswerHistory) -> bool),
}

impl VisibilityRule {
    pub fn applies(&self, history: &AnswerHistory) -> bool {
        match self {
            VisibilityRule::Always => true,
            VisibilityRule::AnswerEquals { question, value } => {
                history.scalar_of(question) == Some(*value)
            }
            VisibilityRule::AnswerAmong { question, any_of } => history
                .scalar_of(question)
                .is_some_and(|answered| any_of.iter().any(|candidate| *candidate == answered)),
            VisibilityRule::SelectionIncludes { question, option } => history
                .selections_of(question)
                .is_some_and(|chosen| chosen.iter().any(|selection| selection == option)),
            VisibilityRule::Custom(predicate) => predicate(history),
        }
    }

    /// Question id this gate reads from, when it reads from one at all.
    pub(crate) fn references(&self) -> Option<&'static str> {
        match self {
            VisibilityRule::Always | VisibilityRule::Custom(_) => None,
            VisibilityRule::AnswerEquals { question, .. }
            | VisibilityRule::AnswerAmong { question, .. }
            | VisibilityRule::SelectionIncludes { question, .. } => Some(question),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            VisibilityRule::Always => "always".to_string(),
            VisibilityRule::AnswerEquals { question, value } => {
                format!("{question} == {value}")
            }
            VisibilityRule::AnswerAmong { question, any_of } => {
                format!("{question} in [{}]", any_of.join(", "))
            }
            VisibilityRule::SelectionIncludes { question, option } => {
                format!("{question} includes {option}")
            }
            VisibilityRule::Custom(_) => "custom predicate".to_string(),
        }
    }
}

/// Where a choice question's options come from.
///
/// `SelectionsOf` re-derives its options from an earlier multi-select answer
/// on every read; nothing is cached, so back-navigation is reflected
/// immediately. The source question's own visibility is not consulted here,
/// so an author pairing a dynamic question with a gated source must give
/// both the same gate.
#[derive(Debug, Clone, Copy)]
pub enum OptionSource {
    Static(&'static [ChoiceOption]),
    SelectionsOf { source: &'static str },
    Custom(fn(&AnswerHistory) -> Vec<ChoiceOption>),
}

impl OptionSource {
    /// Marker for questions that take typed input instead of options.
    pub const fn none() -> Self {
        OptionSource::Static(&[])
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            OptionSource::SelectionsOf { .. } | OptionSource::Custom(_)
        )
    }

    /// Question id this source reads from, when it reads from one at all.
    pub(crate) fn references(&self) -> Option<&'static str> {
        match self {
            OptionSource::Static(_) | OptionSource::Custom(_) => None,
            OptionSource::SelectionsOf { source } => Some(source),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            OptionSource::Static(options) if options.is_empty() => "none".to_string(),
            OptionSource::Static(options) => format!("{} fixed", options.len()),
            OptionSource::SelectionsOf { source } => format!("selections of {source}"),
            OptionSource::Custom(_) => "custom".to_string(),
        }
    }
}

/// A single authored interview question.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub subtext: Option<&'static str>,
    pub disclaimer: Option<&'static str>,
    pub insight: Option<&'static str>,
    pub kind: AnswerKind,
    pub options: OptionSource,
    pub visibility: VisibilityRule,
    pub signal_tags: &'static [&'static str],
}

/// Raw answer payload: one value for single-choice, numeric, and free-text
/// questions; a list for multi-selects. Serialized untagged so the wire shape
/// is a bare string or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    Selections(Vec<String>),
}

impl AnswerValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        AnswerValue::Scalar(value.into())
    }

    pub fn selections<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Selections(values.into_iter().map(Into::into).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AnswerValue::Scalar(value) => Some(value),
            AnswerValue::Selections(_) => None,
        }
    }

    pub fn as_selections(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Scalar(_) => None,
            AnswerValue::Selections(values) => Some(values),
        }
    }
}

/// A committed answer. `sequence` is the history position it was appended at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question_id: &'static str,
    pub value: AnswerValue,
    pub sequence: usize,
}

/// Append-only record of committed answers, in submission order.
///
/// Sessions are the only writers. Everything else reads it through the typed
/// accessors, so a mismatched lookup (selections of a scalar answer, say)
/// comes back as `None` rather than a panic.
#[derive(Debug, Clone, Default)]
pub struct AnswerHistory {
    answers: Vec<Answer>,
}

impl AnswerHistory {
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn latest(&self) -> Option<&Answer> {
        self.answers.last()
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|answer| answer.question_id == question_id)
    }

    pub fn scalar_of(&self, question_id: &str) -> Option<&str> {
        self.answer_for(question_id)
            .and_then(|answer| answer.value.as_scalar())
    }

    pub fn selections_of(&self, question_id: &str) -> Option<&[String]> {
        self.answer_for(question_id)
            .and_then(|answer| answer.value.as_selections())
    }

    pub(crate) fn push(&mut self, question_id: &'static str, value: AnswerValue) -> usize {
        let sequence = self.answers.len();
        self.answers.push(Answer {
            question_id,
            value,
            sequence,
        });
        sequence
    }

    pub(crate) fn pop(&mut self) -> Option<Answer> {
        self.answers.pop()
    }
}
