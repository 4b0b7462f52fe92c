use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prerequisite gating a question behind earlier "yes" answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// The named symptom must be answered "yes".
    Single(String),
    /// At least one of the named symptoms must be answered "yes".
    AnyOf(Vec<String>),
}

impl Dependency {
    pub fn symptoms(&self) -> Vec<&str> {
        match self {
            Dependency::Single(symptom) => vec![symptom.as_str()],
            Dependency::AnyOf(symptoms) => symptoms.iter().map(String::as_str).collect(),
        }
    }
}

/// Static question record loaded once from the question configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDefinition {
    pub symptom: String,
    pub question_text: String,
    pub dsm_codes: Vec<String>,
    pub binary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
    /// Display-only weight computed with the canonical default severity.
    pub question_weight: f64,
}

impl QuestionDefinition {
    pub fn is_entry_point(&self) -> bool {
        self.dependency.is_none()
    }

    pub fn contributes_to(&self, dsm_code: &str) -> bool {
        self.dsm_codes.iter().any(|code| code == dsm_code)
    }

    /// Human-readable label derived from the symptom key.
    pub fn display_label(&self) -> String {
        self.symptom
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Recorded yes/no value of an answered (or auto-skipped) question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Yes,
    No,
}

impl AnswerValue {
    /// "no", "none" and blank severities count as a negative answer; anything else is positive.
    pub fn from_severity(severity: &str) -> Self {
        if is_negative_severity(severity) {
            AnswerValue::No
        } else {
            AnswerValue::Yes
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnswerValue::Yes => "yes",
            AnswerValue::No => "no",
        }
    }
}

pub(crate) fn is_negative_severity(severity: &str) -> bool {
    matches!(
        severity.trim().to_lowercase().as_str(),
        "no" | "none" | ""
    )
}

/// Per-session answer for a single symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub value: AnswerValue,
    pub severity: String,
    pub question_weight: f64,
    pub dsm_codes: Vec<String>,
    pub was_skipped: bool,
}

impl AnswerRecord {
    /// Zero-weight record standing in for a question whose prerequisites were not met.
    pub fn skipped(question: &QuestionDefinition) -> Self {
        Self {
            value: AnswerValue::No,
            severity: "No".to_string(),
            question_weight: 0.0,
            dsm_codes: question.dsm_codes.clone(),
            was_skipped: true,
        }
    }

    pub fn is_yes(&self) -> bool {
        self.value == AnswerValue::Yes
    }

    /// Counts towards a diagnosis requirement.
    pub fn is_present(&self) -> bool {
        self.is_yes() && self.question_weight > 0.0
    }
}

/// Answers keyed by symptom. Owned by the caller, never by the engine.
pub type AnswerMap = BTreeMap<String, AnswerRecord>;

pub(crate) fn answered_yes(answers: &AnswerMap, symptom: &str) -> bool {
    answers
        .get(symptom)
        .map(AnswerRecord::is_yes)
        .unwrap_or(false)
}
