use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::catalog::QuestionCatalog;
use crate::workflows::assessment::domain::{AnswerMap, AnswerRecord, AnswerValue};
use crate::workflows::assessment::engine::AssessmentEngine;
use crate::workflows::assessment::repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use crate::workflows::assessment::service::AssessmentService;

/// Five-question catalog exercising single, any-of and binary questions.
pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::from_reader(
        r#"[
            {"symptom": "obsessions", "question": "Intrusive thoughts?", "dsm_codes": ["300.3"]},
            {"symptom": "compulsions", "question": "Repetitive acts?", "dsm_codes": ["300.3"], "dependency": "obsessions"},
            {"symptom": "distress", "question": "Distressing?", "dsm_codes": ["300.3"], "dependencies": ["obsessions", "compulsions"]},
            {"symptom": "manic_episode", "question": "Elevated mood?", "dsm_codes": ["296.4x"], "binary": true},
            {"symptom": "depressed_mood", "question": "Feeling down?", "dsm_codes": ["296.2x", "296.4x"]}
        ]"#
        .as_bytes(),
    )
    .expect("fixture catalog loads")
}

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::standard(Arc::new(catalog()))
}

pub(super) fn service() -> Arc<AssessmentService<MemoryRepository>> {
    Arc::new(AssessmentService::new(
        Arc::new(engine()),
        Arc::new(MemoryRepository::default()),
    ))
}

pub(super) fn yes(weight: f64) -> AnswerRecord {
    AnswerRecord {
        value: AnswerValue::Yes,
        severity: "Severe".to_string(),
        question_weight: weight,
        dsm_codes: vec!["X".to_string()],
        was_skipped: false,
    }
}

pub(super) fn no() -> AnswerRecord {
    AnswerRecord {
        value: AnswerValue::No,
        severity: "No".to_string(),
        question_weight: 0.0,
        dsm_codes: vec!["X".to_string()],
        was_skipped: false,
    }
}

pub(super) fn answers(entries: &[(&str, AnswerRecord)]) -> AnswerMap {
    entries
        .iter()
        .map(|(symptom, record)| ((*symptom).to_string(), record.clone()))
        .collect()
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let existing = guard
            .get_mut(&record.session_id)
            .ok_or(RepositoryError::NotFound)?;
        if existing.version != record.version {
            return Err(RepositoryError::Stale);
        }
        record.version += 1;
        *existing = record.clone();
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}
