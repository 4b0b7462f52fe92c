use tracing::debug;

use super::domain::{answered_yes, AnswerMap, AnswerRecord, Dependency, QuestionDefinition};

/// Returns true when the question's prerequisites are unmet. Missing answers count as "no".
pub fn needs_skip(question: &QuestionDefinition, answers: &AnswerMap) -> bool {
    match &question.dependency {
        Some(Dependency::Single(symptom)) => !answered_yes(answers, symptom),
        Some(Dependency::AnyOf(symptoms)) => !symptoms
            .iter()
            .any(|symptom| answered_yes(answers, symptom)),
        None => false,
    }
}

/// Decides whether `question` must be auto-skipped and, if so, records a zero-weight
/// skipped answer for it so dependants cascade.
pub fn resolve_skip(question: &QuestionDefinition, answers: &mut AnswerMap) -> bool {
    if !needs_skip(question, answers) {
        return false;
    }

    debug!(
        symptom = %question.symptom,
        "skipping question due to unmet dependencies"
    );
    answers.insert(question.symptom.clone(), AnswerRecord::skipped(question));
    true
}
