mod aggregate;
mod rules;

pub use aggregate::required_count;
pub use rules::{DiagnosisRule, DiagnosisRuleSet, Requirement};

use super::domain::AnswerMap;
use aggregate::{tally_rule, MINIMUM_CERTAINTY_PCT};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Qualifying diagnosis with its mean-weight confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub name: String,
    pub dsm_code: String,
    pub confidence: f64,
}

impl DiagnosisResult {
    /// Confidence as a whole percentage for display.
    pub fn certainty_pct(&self) -> u8 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Final outcome of an assessment. An empty ranking is reported as `Undetermined`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosisOutcome {
    Determined { diagnoses: Vec<DiagnosisResult> },
    Undetermined,
}

impl DiagnosisOutcome {
    pub fn diagnoses(&self) -> &[DiagnosisResult] {
        match self {
            DiagnosisOutcome::Determined { diagnoses } => diagnoses,
            DiagnosisOutcome::Undetermined => &[],
        }
    }

    pub fn summary(&self) -> String {
        match self {
            DiagnosisOutcome::Determined { diagnoses } => diagnoses
                .iter()
                .map(|result| {
                    format!(
                        "{} ({}) {}%",
                        result.name,
                        result.dsm_code,
                        result.certainty_pct()
                    )
                })
                .collect::<Vec<_>>()
                .join("; "),
            DiagnosisOutcome::Undetermined => {
                "No diagnosis could be determined based on your responses.".to_string()
            }
        }
    }
}

/// Scores every rule against the answer set and ranks the qualifying diagnoses.
///
/// A rule qualifies once at least 70% (rounded up) of its requirements are present; its
/// confidence is the mean weight of the present requirements. Results under 40% are dropped
/// and the remainder sorted by descending confidence, keeping declaration order on ties.
pub fn evaluate_diagnoses(answers: &AnswerMap, rules: &DiagnosisRuleSet) -> DiagnosisOutcome {
    let mut diagnoses: Vec<DiagnosisResult> = rules
        .rules()
        .iter()
        .filter_map(|rule| {
            let confidence = tally_rule(rule, answers).confidence()?;
            Some(DiagnosisResult {
                name: rule.name.clone(),
                dsm_code: rule.dsm_code.clone(),
                confidence,
            })
        })
        .filter(|result| result.confidence * 100.0 >= MINIMUM_CERTAINTY_PCT)
        .collect();

    diagnoses.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));

    let outcome = if diagnoses.is_empty() {
        DiagnosisOutcome::Undetermined
    } else {
        DiagnosisOutcome::Determined { diagnoses }
    };

    info!(outcome = %outcome.summary(), "final diagnoses");
    outcome
}
