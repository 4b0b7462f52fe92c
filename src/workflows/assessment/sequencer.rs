use serde::{Deserialize, Serialize};
use tracing::info;

use super::dependencies::resolve_skip;
use super::domain::{AnswerMap, AnswerRecord, AnswerValue, QuestionDefinition};
use super::validation::{validate_answer, ValidationRejection, ValidationRuleSet};
use super::weights::compute_question_weight;

/// Position of an assessment within the ordered question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequenceState {
    /// `index` is the question currently presented to the respondent.
    AwaitingQuestion { index: usize },
    Complete,
}

impl SequenceState {
    pub fn current_index(&self) -> Option<usize> {
        match self {
            SequenceState::AwaitingQuestion { index } => Some(*index),
            SequenceState::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SequenceState::Complete)
    }
}

/// Moves forward from `start` past every question whose prerequisites are unmet, recording a
/// skipped answer for each, and stops at the first eligible question or at the end of the list.
pub fn advance_sequence(
    questions: &[QuestionDefinition],
    answers: &mut AnswerMap,
    start: usize,
) -> SequenceState {
    let mut index = start;
    while let Some(question) = questions.get(index) {
        if !resolve_skip(question, answers) {
            return SequenceState::AwaitingQuestion { index };
        }
        index += 1;
    }

    SequenceState::Complete
}

/// Validates and records an answer for the presented question.
///
/// A rejected answer leaves `answers` untouched.
pub fn submit_answer(
    question: &QuestionDefinition,
    severity: &str,
    answers: &mut AnswerMap,
    rules: &ValidationRuleSet,
) -> Result<AnswerRecord, ValidationRejection> {
    let value = AnswerValue::from_severity(severity);
    validate_answer(&question.symptom, value, answers, rules)?;

    let record = AnswerRecord {
        value,
        severity: severity.to_string(),
        question_weight: match value {
            AnswerValue::Yes => {
                compute_question_weight(&question.dsm_codes, severity, question.binary)
            }
            AnswerValue::No => 0.0,
        },
        dsm_codes: question.dsm_codes.clone(),
        was_skipped: false,
    };

    info!(
        symptom = %question.symptom,
        value = record.value.label(),
        weight = record.question_weight,
        "recorded answer"
    );
    answers.insert(question.symptom.clone(), record.clone());
    Ok(record)
}

/// Index of the last respondent-answered question strictly before `position`.
///
/// Recomputed from the answers each time, since skip status may change after edits.
pub fn last_answered_before(
    questions: &[QuestionDefinition],
    answers: &AnswerMap,
    position: usize,
) -> Option<usize> {
    questions
        .iter()
        .take(position)
        .enumerate()
        .rev()
        .find(|(_, question)| {
            answers
                .get(&question.symptom)
                .map(|record| !record.was_skipped)
                .unwrap_or(false)
        })
        .map(|(index, _)| index)
}

/// Steps back to the most recent answered question, re-presenting it. Falls back to the
/// start of the list when nothing was answered.
pub fn go_back(
    questions: &[QuestionDefinition],
    answers: &mut AnswerMap,
    state: SequenceState,
) -> SequenceState {
    let position = state.current_index().unwrap_or(questions.len());
    let target = last_answered_before(questions, answers, position).unwrap_or(0);
    advance_sequence(questions, answers, target)
}
