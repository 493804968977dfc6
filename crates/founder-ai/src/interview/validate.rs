use super::domain::{AnswerKind, AnswerValue, ChoiceOption, Question};

/// Reasons a submitted value fails to conform to the current question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerRejection {
    #[error("expected a {} answer", .expected.label())]
    ShapeMismatch { expected: AnswerKind },
    #[error("answer must not be empty")]
    EmptyValue,
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("number must be zero or greater")]
    NegativeNumber,
    #[error("select at least one option")]
    EmptySelection,
    #[error("option '{0}' was selected more than once")]
    DuplicateSelection(String),
    #[error("'{0}' is not one of the available options")]
    UnknownOption(String),
}

/// Check a raw value against the current question, returning the sanitized
/// value to commit.
///
/// `presented` must be the options resolved at submission time, so dynamic
/// questions are validated against exactly what the user was shown. Typed
/// input is trimmed before validation and stored trimmed; clicked option
/// values are matched verbatim.
pub(crate) fn conform_value(
    question: &Question,
    presented: &[ChoiceOption],
    value: AnswerValue,
) -> Result<AnswerValue, AnswerRejection> {
    match question.kind {
        AnswerKind::SingleChoice => conform_choice(presented, value),
        AnswerKind::MultiSelect => conform_selections(presented, value),
        AnswerKind::Numeric => conform_numeric(value),
        AnswerKind::FreeText => conform_text(value),
    }
}

fn conform_choice(
    presented: &[ChoiceOption],
    value: AnswerValue,
) -> Result<AnswerValue, AnswerRejection> {
    let chosen = match value {
        AnswerValue::Scalar(chosen) => chosen,
        AnswerValue::Selections(_) => {
            return Err(AnswerRejection::ShapeMismatch {
                expected: AnswerKind::SingleChoice,
            })
        }
    };

    if chosen.is_empty() {
        return Err(AnswerRejection::EmptyValue);
    }
    if !presented.iter().any(|option| option.value == chosen) {
        return Err(AnswerRejection::UnknownOption(chosen));
    }

    Ok(AnswerValue::Scalar(chosen))
}

fn conform_selections(
    presented: &[ChoiceOption],
    value: AnswerValue,
) -> Result<AnswerValue, AnswerRejection> {
    let selections = match value {
        AnswerValue::Selections(selections) => selections,
        AnswerValue::Scalar(_) => {
            return Err(AnswerRejection::ShapeMismatch {
                expected: AnswerKind::MultiSelect,
            })
        }
    };

    if selections.is_empty() {
        return Err(AnswerRejection::EmptySelection);
    }

    let mut seen: Vec<&str> = Vec::with_capacity(selections.len());
    for selection in &selections {
        if seen.contains(&selection.as_str()) {
            return Err(AnswerRejection::DuplicateSelection(selection.clone()));
        }
        if !presented.iter().any(|option| selection == option.value) {
            return Err(AnswerRejection::UnknownOption(selection.clone()));
        }
        seen.push(selection.as_str());
    }

    Ok(AnswerValue::Selections(selections))
}

fn conform_numeric(value: AnswerValue) -> Result<AnswerValue, AnswerRejection> {
    let raw = match value {
        AnswerValue::Scalar(raw) => raw,
        AnswerValue::Selections(_) => {
            return Err(AnswerRejection::ShapeMismatch {
                expected: AnswerKind::Numeric,
            })
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnswerRejection::EmptyValue);
    }

    // f64::from_str accepts "nan" and "inf"; neither belongs in a profile.
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| AnswerRejection::NotNumeric(trimmed.to_string()))?;
    if !parsed.is_finite() {
        return Err(AnswerRejection::NotNumeric(trimmed.to_string()));
    }
    if parsed < 0.0 {
        return Err(AnswerRejection::NegativeNumber);
    }

    Ok(AnswerValue::Scalar(trimmed.to_string()))
}

fn conform_text(value: AnswerValue) -> Result<AnswerValue, AnswerRejection> {
    let raw = match value {
        AnswerValue::Scalar(raw) => raw,
        AnswerValue::Selections(_) => {
            return Err(AnswerRejection::ShapeMismatch {
                expected: AnswerKind::FreeText,
            })
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnswerRejection::EmptyValue);
    }

    Ok(AnswerValue::Scalar(trimmed.to_string()))
}
