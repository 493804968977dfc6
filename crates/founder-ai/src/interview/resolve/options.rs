use crate::interview::catalog::QuestionCatalog;
use crate::interview::domain::{AnswerHistory, ChoiceOption, OptionSource, Question};

/// Options to present for `question` given the history so far.
///
/// Static lists come back as authored. A `SelectionsOf` source yields the
/// subset of the feeding question's own options that the user selected,
/// preserving the feeding question's order rather than click order. An
/// unanswered source yields no options.
pub fn resolve_options(
    catalog: &QuestionCatalog,
    question: &Question,
    history: &AnswerHistory,
) -> Vec<ChoiceOption> {
    match question.options {
        OptionSource::Static(options) => options.to_vec(),
        OptionSource::SelectionsOf { source } => {
            selections_in_catalog_order(catalog, source, history)
        }
        OptionSource::Custom(derive) => derive(history),
    }
}

fn selections_in_catalog_order(
    catalog: &QuestionCatalog,
    source: &str,
    history: &AnswerHistory,
) -> Vec<ChoiceOption> {
    let chosen = match history.selections_of(source) {
        Some(chosen) if !chosen.is_empty() => chosen,
        _ => return Vec::new(),
    };
    let feeding = match catalog.question(source) {
        Some(feeding) => feeding,
        None => return Vec::new(),
    };

    // Resolving the feeding question keeps chained dynamic sources working;
    // catalog validation rules out cycles by forcing sources backward.
    resolve_options(catalog, feeding, history)
        .into_iter()
        .filter(|option| chosen.iter().any(|selection| selection == option.value))
        .collect()
}
