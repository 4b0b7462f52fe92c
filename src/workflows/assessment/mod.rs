//! Symptom questionnaire rule engine: weighting, dependency gating, answer validation,
//! sequencing and diagnosis aggregation, plus the session service built on top of it.

pub mod catalog;
pub mod dependencies;
pub mod diagnosis;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod repository;
pub mod router;
pub mod sequencer;
pub mod service;
pub mod validation;
pub mod weights;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuestionCatalog};
pub use dependencies::resolve_skip;
pub use diagnosis::{
    evaluate_diagnoses, DiagnosisOutcome, DiagnosisResult, DiagnosisRule, DiagnosisRuleSet,
    Requirement,
};
pub use domain::{AnswerMap, AnswerRecord, AnswerValue, Dependency, QuestionDefinition};
pub use engine::{AssessmentEngine, AssessmentState, AssessmentStepError};
pub use graph::{render_decision_tree, render_disorder_tree, render_simplified_tree, GraphError};
pub use repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView,
};
pub use router::assessment_router;
pub use sequencer::{advance_sequence, go_back, submit_answer, SequenceState};
pub use service::{AssessmentService, AssessmentServiceError};
pub use validation::{
    validate_answer, RuleSetError, ValidationCondition, ValidationRejection, ValidationRule,
    ValidationRuleSet,
};
pub use weights::compute_question_weight;
