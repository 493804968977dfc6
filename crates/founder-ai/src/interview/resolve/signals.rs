use crate::interview::catalog::QuestionCatalog;
use crate::interview::domain::AnswerHistory;

/// Signal tags contributed by every answered question, in submission order.
///
/// Tags repeat when several answered questions carry the same one; the
/// repetition is the weighting downstream enrichment relies on.
pub fn accumulated_signals(catalog: &QuestionCatalog, history: &AnswerHistory) -> Vec<&'static str> {
    let mut signals = Vec::new();
    for answer in history.answers() {
        if let Some(question) = catalog.question(answer.question_id) {
            signals.extend_from_slice(question.signal_tags);
        }
    }
    signals
}
