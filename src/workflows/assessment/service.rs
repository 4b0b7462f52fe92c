use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::engine::{AssessmentEngine, AssessmentState, AssessmentStepError};
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use super::validation::ValidationRejection;

/// Service composing the stateless engine with a session repository.
pub struct AssessmentService<R> {
    engine: Arc<AssessmentEngine>,
    repository: Arc<R>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(engine: Arc<AssessmentEngine>, repository: Arc<R>) -> Self {
        Self { engine, repository }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    /// Start a new assessment positioned at the first eligible question.
    pub fn start(&self) -> Result<SessionRecord, AssessmentServiceError> {
        let state = self.engine.start();
        let now = Utc::now();
        let record = SessionRecord {
            session_id: next_session_id(),
            outcome: self.engine.outcome(&state),
            state,
            started_at: now,
            updated_at: now,
            version: 0,
        };

        info!(session = %record.session_id.0, "starting new assessment");
        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Answer the presented question. Rejected answers leave the stored session untouched, and a
    /// concurrent change to the same session fails with `RepositoryError::Stale`.
    pub fn submit(
        &self,
        session_id: &SessionId,
        severity: &str,
    ) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self.get(session_id)?;
        let state = self
            .engine
            .submit(&record.state, severity)
            .map_err(|err| match err {
                AssessmentStepError::Rejected(rejection) => {
                    AssessmentServiceError::Rejected(rejection)
                }
                AssessmentStepError::Complete => AssessmentServiceError::AlreadyComplete,
            })?;

        self.store(record, state)
    }

    /// Re-present the most recently answered question.
    pub fn back(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self.get(session_id)?;
        let state = self.engine.go_back(&record.state);
        self.store(record, state)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn store(
        &self,
        mut record: SessionRecord,
        state: AssessmentState,
    ) -> Result<SessionRecord, AssessmentServiceError> {
        record.outcome = self.engine.outcome(&state);
        record.state = state;
        record.updated_at = Utc::now();

        let stored = self.repository.update(record)?;
        Ok(stored)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Rejected(ValidationRejection),
    #[error("assessment is already complete")]
    AlreadyComplete,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
