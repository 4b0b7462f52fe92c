use std::collections::HashMap;
use std::sync::Arc;

use symptom_assessor::workflows::assessment::{
    evaluate_diagnoses, AssessmentEngine, AssessmentState, AssessmentStepError, DiagnosisOutcome,
    DiagnosisRuleSet, QuestionCatalog, SequenceState,
};

fn shipped_catalog() -> QuestionCatalog {
    QuestionCatalog::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/data/questions.json"))
        .expect("shipped question file loads")
}

fn walk(engine: &AssessmentEngine, sheet: &HashMap<&str, &str>) -> (AssessmentState, usize) {
    let mut state = engine.start();
    let mut presented = 0;
    while let Some(question) = engine.current_question(&state) {
        presented += 1;
        let severity = sheet
            .get(question.symptom.as_str())
            .copied()
            .unwrap_or("No");
        state = engine.submit(&state, severity).expect("answer accepted");
    }
    (state, presented)
}

#[test]
fn shipped_catalog_covers_every_rule_symptom() {
    let catalog = shipped_catalog();
    let rules = DiagnosisRuleSet::standard();

    assert_eq!(catalog.len(), 34);
    for rule in rules.rules() {
        for requirement in &rule.requirements {
            for symptom in requirement.symptoms() {
                let question = catalog
                    .get(symptom)
                    .unwrap_or_else(|| panic!("{symptom} missing from catalog"));
                assert!(
                    question.contributes_to(&rule.dsm_code),
                    "{symptom} should map to {}",
                    rule.dsm_code
                );
            }
        }
    }
    for question in catalog.questions() {
        assert!((0.0..=1.0).contains(&question.question_weight));
        if question.binary {
            assert_eq!(question.question_weight, 1.0);
        }
    }
}

#[test]
fn all_negative_assessment_determines_nothing() {
    let engine = AssessmentEngine::standard(Arc::new(shipped_catalog()));

    let (state, presented) = walk(&engine, &HashMap::new());

    assert_eq!(state.position, SequenceState::Complete);
    assert_eq!(presented, 34 - 12);
    assert_eq!(engine.outcome(&state), Some(DiagnosisOutcome::Undetermined));
    assert!(state
        .answers
        .values()
        .all(|record| record.question_weight == 0.0));
}

#[test]
fn trauma_and_anxiety_profile_ranks_ptsd_first() {
    let engine = AssessmentEngine::standard(Arc::new(shipped_catalog()));
    let sheet: HashMap<&str, &str> = [
        ("excessive_worry", "Severe"),
        ("restlessness", "Severe"),
        ("muscle_tension", "Severe"),
        ("irritability", "Mild"),
        ("sleep_disturbance", "Moderate"),
        ("fatigue", "Severe"),
        ("trauma_exposure", "Yes"),
        ("intrusive_memories", "Severe"),
        ("flashbacks", "Severe"),
        ("avoidance", "Moderate"),
        ("hyperarousal", "Severe"),
    ]
    .into_iter()
    .collect();

    let (state, presented) = walk(&engine, &sheet);

    assert_eq!(presented, 26);
    assert_eq!(state.answers["irritability"].question_weight, 0.25);
    assert_eq!(state.answers["sleep_disturbance"].question_weight, 0.52);
    assert_eq!(state.answers["avoidance"].question_weight, 0.68);
    assert!(state.answers["racing_thoughts"].was_skipped);

    let outcome = engine.outcome(&state).expect("assessment complete");
    let diagnoses = outcome.diagnoses();
    assert_eq!(diagnoses.len(), 2);
    assert_eq!(diagnoses[0].dsm_code, "309.81");
    assert!((diagnoses[0].confidence - 0.87).abs() < 1e-9);
    assert_eq!(diagnoses[0].certainty_pct(), 87);
    assert_eq!(diagnoses[1].dsm_code, "300.02");
    // (0.9 * 3 + 0.25 + 0.52 + 0.7) / 6 = 0.695, displayed as 70%.
    assert!((diagnoses[1].confidence - 4.17 / 6.0).abs() < 1e-9);
    assert_eq!(diagnoses[1].certainty_pct(), 70);

    assert_eq!(
        evaluate_diagnoses(&state.answers, engine.diagnosis_rules()),
        outcome
    );
}

#[test]
fn mania_after_depression_is_rejected() {
    let engine = AssessmentEngine::standard(Arc::new(shipped_catalog()));
    let mut state = engine.start();
    state = engine.submit(&state, "Severe").expect("depressed mood accepted");

    while engine
        .current_question(&state)
        .map(|question| question.symptom != "manic_episode")
        .unwrap_or(false)
    {
        state = engine.submit(&state, "No").expect("no accepted");
    }

    match engine.submit(&state, "Yes") {
        Err(AssessmentStepError::Rejected(rejection)) => {
            assert_eq!(
                rejection.message,
                "Manic episode and depression are typically not simultaneous."
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    let state = engine.submit(&state, "No").expect("no always accepted");
    assert_eq!(
        engine.current_question(&state).map(|q| q.symptom.as_str()),
        Some("impulsivity")
    );
}
