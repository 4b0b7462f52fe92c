use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::domain::{Dependency, QuestionDefinition};
use super::weights::{compute_question_weight, default_severity};

/// Ordered, immutable question list loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<QuestionDefinition>,
}

impl QuestionCatalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref()).map_err(|source| CatalogError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let rows: Vec<QuestionRow> = serde_json::from_reader(reader)?;
        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<QuestionRow>) -> Result<Self, CatalogError> {
        if rows.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let question = row.into_definition(index)?;
            if !seen.insert(question.symptom.clone()) {
                return Err(CatalogError::DuplicateSymptom(question.symptom));
            }
            questions.push(question);
        }

        for question in &questions {
            let Some(dependency) = &question.dependency else {
                continue;
            };
            for symptom in dependency.symptoms() {
                if !seen.contains(symptom) {
                    warn!(
                        question = %question.symptom,
                        dependency = %symptom,
                        "dependency is not in the catalog; question will always be skipped"
                    );
                }
            }
        }

        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, symptom: &str) -> Option<&QuestionDefinition> {
        self.questions
            .iter()
            .find(|question| question.symptom == symptom)
    }

    /// Catalog questions mapped to `dsm_code`, in declaration order.
    pub fn questions_for_code<'a>(
        &'a self,
        dsm_code: &'a str,
    ) -> impl Iterator<Item = &'a QuestionDefinition> + 'a {
        self.questions
            .iter()
            .filter(move |question| question.contributes_to(dsm_code))
    }
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    #[serde(default)]
    symptom: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    dsm_codes: Option<Vec<String>>,
    #[serde(default)]
    binary: bool,
    #[serde(default)]
    dependency: Option<String>,
    #[serde(default)]
    dependencies: Option<Vec<String>>,
}

/// Trims every entry; `None` when any entry is blank.
fn trim_all(values: Vec<String>) -> Option<Vec<String>> {
    values
        .into_iter()
        .map(|value| Some(value.trim().to_string()).filter(|value| !value.is_empty()))
        .collect()
}

impl QuestionRow {
    fn into_definition(self, index: usize) -> Result<QuestionDefinition, CatalogError> {
        let malformed = |reason: &str| CatalogError::Malformed {
            index,
            reason: reason.to_string(),
        };

        let symptom = self
            .symptom
            .map(|symptom| symptom.trim().to_string())
            .filter(|symptom| !symptom.is_empty())
            .ok_or_else(|| malformed("missing symptom"))?;

        let dsm_codes = self
            .dsm_codes
            .filter(|codes| !codes.is_empty())
            .ok_or_else(|| malformed("missing dsm_codes"))?;
        let dsm_codes = trim_all(dsm_codes).ok_or_else(|| malformed("blank dsm code"))?;

        let dependency = match (self.dependency, self.dependencies) {
            (Some(_), Some(_)) => {
                return Err(malformed("both dependency and dependencies declared"));
            }
            (Some(single), None) => {
                let single = single.trim();
                if single.is_empty() {
                    return Err(malformed("blank dependency"));
                }
                Some(Dependency::Single(single.to_string()))
            }
            (None, Some(any_of)) if any_of.is_empty() => {
                return Err(malformed("empty dependencies"));
            }
            (None, Some(any_of)) => Some(Dependency::AnyOf(
                trim_all(any_of).ok_or_else(|| malformed("blank dependency"))?,
            )),
            (None, None) => None,
        };

        let question_weight =
            compute_question_weight(&dsm_codes, default_severity(self.binary), self.binary);

        Ok(QuestionDefinition {
            symptom,
            question_text: self.question.unwrap_or_default(),
            dsm_codes,
            binary: self.binary,
            dependency,
            question_weight,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read question file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("question file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question file contains no questions")]
    Empty,
    #[error("question {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("symptom '{0}' is declared more than once")]
    DuplicateSymptom(String),
}
