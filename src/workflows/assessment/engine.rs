use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::diagnosis::{evaluate_diagnoses, DiagnosisOutcome, DiagnosisRuleSet};
use super::domain::{AnswerMap, QuestionDefinition};
use super::sequencer::{advance_sequence, go_back, submit_answer, SequenceState};
use super::validation::{ValidationRejection, ValidationRuleSet};

/// Caller-owned progress of a single assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub position: SequenceState,
    pub answers: AnswerMap,
}

/// Stateless engine applying the question catalog and rule tables to caller-provided state.
///
/// Holds only immutable configuration, so one instance can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    catalog: Arc<QuestionCatalog>,
    diagnosis_rules: DiagnosisRuleSet,
    validation_rules: ValidationRuleSet,
}

impl AssessmentEngine {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        diagnosis_rules: DiagnosisRuleSet,
        validation_rules: ValidationRuleSet,
    ) -> Self {
        Self {
            catalog,
            diagnosis_rules,
            validation_rules,
        }
    }

    pub fn standard(catalog: Arc<QuestionCatalog>) -> Self {
        Self::new(
            catalog,
            DiagnosisRuleSet::standard(),
            ValidationRuleSet::standard(),
        )
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn diagnosis_rules(&self) -> &DiagnosisRuleSet {
        &self.diagnosis_rules
    }

    pub fn start(&self) -> AssessmentState {
        let mut answers = AnswerMap::new();
        let position = advance_sequence(self.catalog.questions(), &mut answers, 0);
        AssessmentState { position, answers }
    }

    pub fn current_question(&self, state: &AssessmentState) -> Option<&QuestionDefinition> {
        state
            .position
            .current_index()
            .and_then(|index| self.catalog.questions().get(index))
    }

    /// Answers the presented question and moves to the next eligible one.
    pub fn submit(
        &self,
        state: &AssessmentState,
        severity: &str,
    ) -> Result<AssessmentState, AssessmentStepError> {
        let index = state
            .position
            .current_index()
            .ok_or(AssessmentStepError::Complete)?;
        let question = self
            .catalog
            .questions()
            .get(index)
            .ok_or(AssessmentStepError::Complete)?;

        let mut answers = state.answers.clone();
        submit_answer(question, severity, &mut answers, &self.validation_rules)?;
        let position = advance_sequence(self.catalog.questions(), &mut answers, index + 1);

        Ok(AssessmentState { position, answers })
    }

    pub fn go_back(&self, state: &AssessmentState) -> AssessmentState {
        let mut answers = state.answers.clone();
        let position = go_back(self.catalog.questions(), &mut answers, state.position);
        AssessmentState { position, answers }
    }

    /// Final diagnoses, available once the sequence is complete.
    pub fn outcome(&self, state: &AssessmentState) -> Option<DiagnosisOutcome> {
        state
            .position
            .is_complete()
            .then(|| evaluate_diagnoses(&state.answers, &self.diagnosis_rules))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentStepError {
    #[error(transparent)]
    Rejected(#[from] ValidationRejection),
    #[error("assessment is already complete")]
    Complete,
}
