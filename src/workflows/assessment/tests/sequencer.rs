use super::common::*;
use crate::workflows::assessment::diagnosis::DiagnosisOutcome;
use crate::workflows::assessment::domain::AnswerValue;
use crate::workflows::assessment::engine::AssessmentStepError;
use crate::workflows::assessment::sequencer::{
    advance_sequence, last_answered_before, SequenceState,
};

#[test]
fn start_presents_first_question() {
    let state = engine().start();
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 0 });
    assert!(state.answers.is_empty());
}

#[test]
fn negative_answer_cascades_skips_through_dependants() {
    let engine = engine();
    let state = engine.start();

    let state = engine.submit(&state, "No").expect("no is always valid");

    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 3 });
    assert!(state.answers["compulsions"].was_skipped);
    assert!(state.answers["distress"].was_skipped);
    assert_eq!(state.answers["distress"].question_weight, 0.0);
    assert_eq!(state.answers["obsessions"].value, AnswerValue::No);
    assert!(!state.answers["obsessions"].was_skipped);
}

#[test]
fn binary_answer_weighs_one() {
    let engine = engine();
    let state = engine.submit(&engine.start(), "No").expect("answered");

    let state = engine.submit(&state, "Yes").expect("answered");

    let manic = &state.answers["manic_episode"];
    assert_eq!(manic.value, AnswerValue::Yes);
    assert_eq!(manic.question_weight, 1.0);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 4 });
}

#[test]
fn rejected_answer_leaves_state_untouched() {
    let engine = engine();
    let state = engine.submit(&engine.start(), "No").expect("answered");
    let state = engine.submit(&state, "Yes").expect("answered");

    let err = engine
        .submit(&state, "Severe")
        .expect_err("mutually exclusive with mania");

    match err {
        AssessmentStepError::Rejected(rejection) => {
            assert_eq!(rejection.symptom, "depressed_mood");
            assert!(rejection.message.contains("Manic episode"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 4 });
    assert!(!state.answers.contains_key("depressed_mood"));
}

#[test]
fn completing_the_list_produces_an_outcome() {
    let engine = engine();
    let mut state = engine.start();
    for severity in ["No", "Yes", "No"] {
        state = engine.submit(&state, severity).expect("answered");
    }

    assert_eq!(state.position, SequenceState::Complete);
    assert_eq!(
        engine.outcome(&state),
        Some(DiagnosisOutcome::Undetermined)
    );
    assert_eq!(
        engine.submit(&state, "Severe"),
        Err(AssessmentStepError::Complete)
    );
}

#[test]
fn outcome_is_unavailable_mid_assessment() {
    let engine = engine();
    assert_eq!(engine.outcome(&engine.start()), None);
}

#[test]
fn go_back_walks_answered_questions_skipping_auto_filled_ones() {
    let engine = engine();
    let mut state = engine.start();
    for severity in ["No", "Yes", "No"] {
        state = engine.submit(&state, severity).expect("answered");
    }

    let state = engine.go_back(&state);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 4 });

    let state = engine.go_back(&state);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 3 });

    let state = engine.go_back(&state);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 0 });

    let state = engine.go_back(&state);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 0 });
}

#[test]
fn editing_an_answer_reopens_dependants() {
    let engine = engine();
    let state = engine.submit(&engine.start(), "No").expect("answered");
    let state = engine.go_back(&state);
    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 0 });

    let state = engine.submit(&state, "Moderate").expect("answered");

    assert_eq!(state.position, SequenceState::AwaitingQuestion { index: 1 });
    assert_eq!(state.answers["obsessions"].question_weight, 0.68);
}

#[test]
fn last_answered_ignores_skipped_records() {
    let catalog = catalog();
    let mut answers = answers(&[("obsessions", no())]);
    let state = advance_sequence(catalog.questions(), &mut answers, 1);

    assert_eq!(state, SequenceState::AwaitingQuestion { index: 3 });
    assert_eq!(last_answered_before(catalog.questions(), &answers, 3), Some(0));
    assert_eq!(last_answered_before(catalog.questions(), &answers, 0), None);
}

#[test]
fn sequence_state_serializes_with_state_tag() {
    assert_eq!(
        serde_json::to_value(SequenceState::AwaitingQuestion { index: 2 }).expect("serializes"),
        serde_json::json!({ "state": "awaiting_question", "index": 2 })
    );
    assert_eq!(
        serde_json::to_value(SequenceState::Complete).expect("serializes"),
        serde_json::json!({ "state": "complete" })
    );
}
