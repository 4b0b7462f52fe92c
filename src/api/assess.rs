use crate::config::AppConfig;
use crate::error::AppError;
use crate::workflows::assessment::{
    render_decision_tree, render_disorder_tree, render_simplified_tree, AssessmentEngine,
    AssessmentState, AssessmentStepError, DiagnosisOutcome, QuestionCatalog,
};
use clap::Args;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// CSV answer sheet with `symptom,severity` columns
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Question configuration file (defaults to APP_QUESTIONS_PATH)
    #[arg(long)]
    pub(crate) questions: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct GraphArgs {
    /// Restrict the tree to one diagnostic category code
    #[arg(long, conflicts_with = "simplified")]
    pub(crate) disorder: Option<String>,
    /// Emit one cluster per diagnostic category instead of the full tree
    #[arg(long)]
    pub(crate) simplified: bool,
    /// Question configuration file (defaults to APP_QUESTIONS_PATH)
    #[arg(long)]
    pub(crate) questions: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    symptom: String,
    #[serde(default)]
    severity: String,
}

pub(crate) fn load_answer_sheet<R: Read>(reader: R) -> Result<HashMap<String, String>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut sheet = HashMap::new();

    for record in csv_reader.deserialize::<AnswerRow>() {
        let row = record?;
        sheet.insert(row.symptom, row.severity);
    }

    Ok(sheet)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TrailEntry {
    Answered {
        symptom: String,
        severity: String,
        weight: f64,
    },
    Rejected {
        symptom: String,
        message: String,
    },
}

#[derive(Debug)]
pub(crate) struct Replay {
    pub(crate) trail: Vec<TrailEntry>,
    pub(crate) state: AssessmentState,
    pub(crate) outcome: DiagnosisOutcome,
}

/// Walks the questionnaire answering from `sheet`. Unlisted symptoms answer "No" and a rejected
/// answer is replaced by "No" so the walk always completes.
pub(crate) fn replay(engine: &AssessmentEngine, sheet: &HashMap<String, String>) -> Replay {
    let mut trail = Vec::new();
    let mut state = engine.start();

    while let Some(question) = engine.current_question(&state) {
        let symptom = question.symptom.clone();
        let severity = sheet
            .get(&symptom)
            .cloned()
            .unwrap_or_else(|| "No".to_string());

        let next = match engine.submit(&state, &severity) {
            Ok(next) => next,
            Err(AssessmentStepError::Rejected(rejection)) => {
                trail.push(TrailEntry::Rejected {
                    symptom: symptom.clone(),
                    message: rejection.message,
                });
                match engine.submit(&state, "No") {
                    Ok(next) => next,
                    Err(_) => break,
                }
            }
            Err(AssessmentStepError::Complete) => break,
        };

        let weight = next
            .answers
            .get(&symptom)
            .map(|record| record.question_weight)
            .unwrap_or_default();
        let recorded = next
            .answers
            .get(&symptom)
            .map(|record| record.severity.clone())
            .unwrap_or_default();
        trail.push(TrailEntry::Answered {
            symptom,
            severity: recorded,
            weight,
        });
        state = next;
    }

    let outcome = engine
        .outcome(&state)
        .unwrap_or(DiagnosisOutcome::Undetermined);
    Replay {
        trail,
        state,
        outcome,
    }
}

fn load_catalog(path: Option<PathBuf>) -> Result<QuestionCatalog, AppError> {
    let path = match path {
        Some(path) => path,
        None => AppConfig::load()?.assessment.questions_path,
    };
    Ok(QuestionCatalog::from_path(path)?)
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { answers, questions } = args;

    let catalog = load_catalog(questions)?;
    let engine = AssessmentEngine::standard(Arc::new(catalog));
    let sheet = load_answer_sheet(File::open(&answers)?)?;

    let result = replay(&engine, &sheet);
    render_replay(&engine, &result);
    Ok(())
}

pub(crate) fn run_graph(args: GraphArgs) -> Result<(), AppError> {
    let GraphArgs {
        disorder,
        simplified,
        questions,
    } = args;

    let catalog = load_catalog(questions)?;
    let engine = AssessmentEngine::standard(Arc::new(catalog));
    let dot = match disorder {
        Some(code) => render_disorder_tree(engine.catalog(), engine.diagnosis_rules(), &code)?,
        None if simplified => render_simplified_tree(engine.catalog(), engine.diagnosis_rules()),
        None => render_decision_tree(engine.catalog(), engine.diagnosis_rules()),
    };

    print!("{dot}");
    Ok(())
}

fn render_replay(engine: &AssessmentEngine, replay: &Replay) {
    println!("Symptom assessment");
    println!(
        "{} questions, {} answered, {} skipped",
        engine.catalog().len(),
        replay
            .state
            .answers
            .values()
            .filter(|record| !record.was_skipped)
            .count(),
        replay
            .state
            .answers
            .values()
            .filter(|record| record.was_skipped)
            .count()
    );

    println!("\nAnswers");
    for entry in &replay.trail {
        match entry {
            TrailEntry::Answered {
                symptom,
                severity,
                weight,
            } => println!("- {}: {} (weight {:.2})", symptom, severity, weight),
            TrailEntry::Rejected { symptom, message } => {
                println!("- {}: rejected, recorded as No ({})", symptom, message)
            }
        }
    }

    println!("\nResult");
    match &replay.outcome {
        DiagnosisOutcome::Determined { diagnoses } => {
            for diagnosis in diagnoses {
                println!(
                    "- {} | DSM-5-TR: {} | Certainty: {}%",
                    diagnosis.name,
                    diagnosis.dsm_code,
                    diagnosis.certainty_pct()
                );
            }
        }
        DiagnosisOutcome::Undetermined => println!("- {}", replay.outcome.summary()),
    }
}
