use crate::interview::catalog::QuestionCatalog;
use crate::interview::domain::{AnswerHistory, Question};

/// Questions participating in the flow for this history, in catalog order.
pub fn visible_questions<'a>(
    catalog: &'a QuestionCatalog,
    history: &AnswerHistory,
) -> Vec<&'a Question> {
    catalog
        .questions()
        .iter()
        .filter(|question| question.visibility.applies(history))
        .collect()
}
