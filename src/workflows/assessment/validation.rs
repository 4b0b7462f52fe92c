use serde::{Deserialize, Serialize};

use super::domain::{answered_yes, AnswerMap, AnswerValue};

/// Condition enforced across the symptoms of a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCondition {
    /// No two symptoms of the rule may both be answered "yes".
    NotSimultaneous,
}

/// Declarative mutual-exclusion rule checked before an answer is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub symptoms: Vec<String>,
    pub condition: ValidationCondition,
    pub message: String,
}

impl ValidationRule {
    pub fn references(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|candidate| candidate == symptom)
    }

    fn violated_by(&self, symptom: &str, answers: &AnswerMap) -> bool {
        match self.condition {
            ValidationCondition::NotSimultaneous => self
                .symptoms
                .iter()
                .filter(|other| other.as_str() != symptom)
                .any(|other| answered_yes(answers, other)),
        }
    }
}

/// Validated collection of rules. Every rule carries a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationRuleSet {
    rules: Vec<ValidationRule>,
}

impl ValidationRuleSet {
    pub fn new(rules: Vec<ValidationRule>) -> Result<Self, RuleSetError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.message.trim().is_empty() {
                return Err(RuleSetError::MissingMessage { index });
            }
            if rule.symptoms.len() < 2 {
                return Err(RuleSetError::TooFewSymptoms { index });
            }
        }

        Ok(Self { rules })
    }

    pub fn standard() -> Self {
        Self {
            rules: vec![ValidationRule {
                symptoms: vec!["manic_episode".to_string(), "depressed_mood".to_string()],
                condition: ValidationCondition::NotSimultaneous,
                message: "Manic episode and depression are typically not simultaneous."
                    .to_string(),
            }],
        }
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }
}

/// Rejected answer, carrying the message of the rule that was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationRejection {
    pub symptom: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    #[error("validation rule {index} has no message")]
    MissingMessage { index: usize },
    #[error("validation rule {index} must reference at least two symptoms")]
    TooFewSymptoms { index: usize },
}

/// Checks a candidate answer against the rule set. A "no" answer is always accepted.
pub fn validate_answer(
    symptom: &str,
    value: AnswerValue,
    answers: &AnswerMap,
    rules: &ValidationRuleSet,
) -> Result<(), ValidationRejection> {
    if value == AnswerValue::No {
        return Ok(());
    }

    match rules
        .rules
        .iter()
        .filter(|rule| rule.references(symptom))
        .find(|rule| rule.violated_by(symptom, answers))
    {
        Some(rule) => Err(ValidationRejection {
            symptom: symptom.to_string(),
            message: rule.message.clone(),
        }),
        None => Ok(()),
    }
}
