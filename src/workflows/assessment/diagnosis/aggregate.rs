use super::super::domain::AnswerMap;
use super::rules::{DiagnosisRule, Requirement};

const THRESHOLD_RATIO: f64 = 0.7;
pub(crate) const MINIMUM_CERTAINTY_PCT: f64 = 40.0;

/// Intermediate tally of one rule against an answer set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleTally {
    pub total_requirements: usize,
    pub present_count: usize,
    pub total_weight: f64,
}

impl RuleTally {
    pub fn threshold(&self) -> usize {
        required_count(self.total_requirements)
    }

    pub fn qualifies(&self) -> bool {
        self.present_count > 0 && self.present_count >= self.threshold()
    }

    /// Mean weight over satisfied requirements only.
    pub fn confidence(&self) -> Option<f64> {
        self.qualifies()
            .then(|| self.total_weight / self.present_count as f64)
    }
}

/// Number of satisfied requirements needed out of `total` (70%, rounded up).
pub fn required_count(total: usize) -> usize {
    (THRESHOLD_RATIO * total as f64).ceil() as usize
}

fn present_weight(answers: &AnswerMap, symptom: &str) -> Option<f64> {
    answers
        .get(symptom)
        .filter(|record| record.is_present())
        .map(|record| record.question_weight)
}

fn requirement_weight(answers: &AnswerMap, requirement: &Requirement) -> Option<f64> {
    match requirement {
        Requirement::Symptom(symptom) => present_weight(answers, symptom),
        Requirement::AnyOf(symptoms) => symptoms
            .iter()
            .find_map(|symptom| present_weight(answers, symptom)),
    }
}

pub(crate) fn tally_rule(rule: &DiagnosisRule, answers: &AnswerMap) -> RuleTally {
    let mut present_count = 0;
    let mut total_weight = 0.0;

    for weight in rule
        .requirements
        .iter()
        .filter_map(|requirement| requirement_weight(answers, requirement))
    {
        present_count += 1;
        total_weight += weight;
    }

    RuleTally {
        total_requirements: rule.requirements.len(),
        present_count,
        total_weight,
    }
}
