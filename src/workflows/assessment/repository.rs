use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::diagnosis::{DiagnosisOutcome, DiagnosisResult};
use super::engine::AssessmentState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Repository record for one in-progress or completed assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub state: AssessmentState,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub outcome: Option<DiagnosisOutcome>,
    /// Bumped by the repository on every successful update.
    pub version: u64,
}

impl SessionRecord {
    pub fn status_label(&self) -> &'static str {
        if self.state.position.is_complete() {
            "complete"
        } else {
            "in_progress"
        }
    }

    pub fn status_view(&self, catalog: &QuestionCatalog) -> SessionView {
        let question = self.state.position.current_index().and_then(|index| {
            catalog.questions().get(index).map(|question| QuestionView {
                index,
                total: catalog.len(),
                symptom: question.symptom.clone(),
                prompt: question.question_text.clone(),
                binary: question.binary,
                question_weight: question.question_weight,
            })
        });

        let result = self.outcome.as_ref().map(|outcome| match outcome {
            DiagnosisOutcome::Determined { diagnoses } => ResultView {
                determined: true,
                summary: outcome.summary(),
                diagnoses: diagnoses.iter().map(DiagnosisView::from).collect(),
            },
            DiagnosisOutcome::Undetermined => ResultView {
                determined: false,
                summary: outcome.summary(),
                diagnoses: Vec::new(),
            },
        });

        SessionView {
            session_id: self.session_id.clone(),
            status: self.status_label(),
            answered: self
                .state
                .answers
                .values()
                .filter(|record| !record.was_skipped)
                .count(),
            question,
            result,
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the service can be exercised without a real session store.
///
/// `update` is a compare-and-swap on `version`: it must fail with `RepositoryError::Stale` when
/// the stored record has moved on since `record` was fetched, and otherwise store and return the
/// record with its version incremented.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record was changed by another request")]
    Stale,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public representation of a session's progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub symptom: String,
    pub prompt: String,
    pub binary: bool,
    pub question_weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub determined: bool,
    pub summary: String,
    pub diagnoses: Vec<DiagnosisView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisView {
    pub name: String,
    pub dsm_code: String,
    pub confidence: f64,
    pub certainty_pct: u8,
}

impl From<&DiagnosisResult> for DiagnosisView {
    fn from(result: &DiagnosisResult) -> Self {
        Self {
            name: result.name.clone(),
            dsm_code: result.dsm_code.clone(),
            confidence: result.confidence,
            certainty_pct: result.certainty_pct(),
        }
    }
}
