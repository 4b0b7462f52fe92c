use serde::{Deserialize, Serialize};

/// One entry of a diagnosis rule's requirement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Symptom(String),
    /// Satisfied by the first member, in declaration order, that is present.
    AnyOf(Vec<String>),
}

impl Requirement {
    pub fn symptoms(&self) -> Vec<&str> {
        match self {
            Requirement::Symptom(symptom) => vec![symptom.as_str()],
            Requirement::AnyOf(symptoms) => symptoms.iter().map(String::as_str).collect(),
        }
    }
}

/// Hand-authored threshold rule for a single diagnostic category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRule {
    pub name: String,
    pub dsm_code: String,
    pub requirements: Vec<Requirement>,
}

impl DiagnosisRule {
    fn new(name: &str, dsm_code: &str, requirements: Vec<Requirement>) -> Self {
        Self {
            name: name.to_string(),
            dsm_code: dsm_code.to_string(),
            requirements,
        }
    }
}

/// Ordered rule table; declaration order breaks confidence ties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DiagnosisRuleSet {
    rules: Vec<DiagnosisRule>,
}

impl DiagnosisRuleSet {
    pub fn new(rules: Vec<DiagnosisRule>) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self {
            rules: standard_diagnosis_rules(),
        }
    }

    pub fn rules(&self) -> &[DiagnosisRule] {
        &self.rules
    }

    pub fn find(&self, dsm_code: &str) -> Option<&DiagnosisRule> {
        self.rules.iter().find(|rule| rule.dsm_code == dsm_code)
    }
}

fn symptoms(keys: &[&str]) -> Vec<Requirement> {
    keys.iter()
        .map(|key| Requirement::Symptom((*key).to_string()))
        .collect()
}

fn any_of(keys: &[&str]) -> Requirement {
    Requirement::AnyOf(keys.iter().map(|key| (*key).to_string()).collect())
}

fn standard_diagnosis_rules() -> Vec<DiagnosisRule> {
    vec![
        DiagnosisRule::new(
            "Major Depressive Disorder",
            "296.2x",
            symptoms(&[
                "depressed_mood",
                "loss_of_interest",
                "fatigue",
                "sleep_disturbance",
                "feelings_of_guilt",
                "difficulty_concentrating",
                "social_withdrawal",
                "weight_appetite_change",
                "hopelessness",
            ]),
        ),
        DiagnosisRule::new(
            "Generalized Anxiety Disorder",
            "300.02",
            symptoms(&[
                "excessive_worry",
                "restlessness",
                "difficulty_concentrating",
                "irritability",
                "sleep_disturbance",
                "fatigue",
                "muscle_tension",
            ]),
        ),
        DiagnosisRule::new(
            "Bipolar Disorder",
            "296.4x",
            symptoms(&[
                "depressed_mood",
                "loss_of_interest",
                "manic_episode",
                "decreased_need_for_sleep",
                "racing_thoughts",
                "impulsivity",
                "irritability",
            ]),
        ),
        DiagnosisRule::new("Schizophrenia", "295.90", {
            let mut requirements = vec![any_of(&["hallucinations", "delusions"])];
            requirements.extend(symptoms(&[
                "disorganized_speech",
                "social_withdrawal",
                "disorganized_behavior",
            ]));
            requirements
        }),
        DiagnosisRule::new(
            "Obsessive-Compulsive Disorder",
            "300.3",
            symptoms(&[
                "obsessions",
                "compulsions",
                "distress",
                "time_consuming",
                "suppress_obsessions",
            ]),
        ),
        DiagnosisRule::new(
            "Post-Traumatic Stress Disorder",
            "309.81",
            vec![
                Requirement::Symptom("trauma_exposure".to_string()),
                any_of(&["intrusive_memories", "flashbacks"]),
                Requirement::Symptom("avoidance".to_string()),
                Requirement::Symptom("hyperarousal".to_string()),
            ],
        ),
        DiagnosisRule::new(
            "Attention-Deficit/Hyperactivity Disorder",
            "314.0x",
            symptoms(&[
                "inattention",
                "hyperactivity",
                "impulsivity",
                "difficulty_organizing",
                "difficulty_concentrating",
                "irritability",
            ]),
        ),
    ]
}
