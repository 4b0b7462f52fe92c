//! Graphviz DOT rendering of the question/dependency/diagnosis structure.
//!
//! Read-only over the catalog and rule table; nothing here feeds back into scoring.

use std::fmt::{self, Write};

use super::catalog::QuestionCatalog;
use super::diagnosis::{required_count, DiagnosisRule, DiagnosisRuleSet};
use super::domain::{Dependency, QuestionDefinition};

const SEVERITY_SCALING: &str = "Severity scaling:\\nSevere: 100%\\nModerate: 75%\\nMild: 50%";
const MINIMUM_CERTAINTY: &str = "Minimum certainty: 40%";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown disorder code '{0}'")]
    UnknownDisorder(String),
}

fn escape(label: &str) -> String {
    label.replace('"', "\\\"")
}

fn question_node(question: &QuestionDefinition) -> String {
    format!("q_{}", question.symptom)
}

fn question_label(question: &QuestionDefinition) -> String {
    let kind = if question.binary {
        "(Yes/No)"
    } else {
        "(Severity rated)"
    };
    format!("{}\\n{}", escape(&question.display_label()), kind)
}

fn disorder_label(rule: &DiagnosisRule, mapped: usize) -> String {
    format!(
        "{}\\n({})\\nRequired: {}/{} symptoms\\n{}",
        escape(&rule.name),
        rule.dsm_code,
        required_count(mapped),
        mapped,
        MINIMUM_CERTAINTY
    )
}

fn dependency_sources(question: &QuestionDefinition) -> Vec<&str> {
    question
        .dependency
        .as_ref()
        .map(Dependency::symptoms)
        .unwrap_or_default()
}

/// Full decision tree across every diagnostic category.
pub fn render_decision_tree(catalog: &QuestionCatalog, rules: &DiagnosisRuleSet) -> String {
    let mut dot = String::new();
    write_decision_tree(&mut dot, catalog, rules).expect("write decision tree");
    dot
}

fn write_decision_tree(
    dot: &mut String,
    catalog: &QuestionCatalog,
    rules: &DiagnosisRuleSet,
) -> fmt::Result {
    writeln!(dot, "digraph decision_tree {{")?;
    writeln!(dot, "  rankdir=LR;")?;
    writeln!(
        dot,
        "  node [shape=box, style=\"rounded,filled\", fillcolor=lightblue];"
    )?;

    for rule in rules.rules() {
        let mapped = catalog.questions_for_code(&rule.dsm_code).count();
        writeln!(
            dot,
            "  \"disorder_{}\" [label=\"{}\", shape=box, style=filled, fillcolor=lightsalmon];",
            rule.dsm_code,
            disorder_label(rule, mapped)
        )?;
    }

    for question in catalog.questions() {
        let node = question_node(question);
        writeln!(dot, "  \"{}\" [label=\"{}\"];", node, question_label(question))?;
        for source in dependency_sources(question) {
            writeln!(dot, "  \"q_{}\" -> \"{}\" [label=\"Yes\"];", source, node)?;
        }
    }

    for question in catalog.questions() {
        let node = question_node(question);
        for code in &question.dsm_codes {
            if question.binary {
                writeln!(
                    dot,
                    "  \"{}\" -> \"disorder_{}\" [style=dashed, color=gray, label=\"Yes\"];",
                    node, code
                )?;
            } else {
                writeln!(
                    dot,
                    "  \"{}\" -> \"disorder_{}\" [style=dashed, color=purple, label=\"{}\"];",
                    node, code, SEVERITY_SCALING
                )?;
            }
        }
    }

    write_start_node(dot, catalog.questions().iter())?;

    writeln!(dot, "  subgraph cluster_legend {{")?;
    writeln!(
        dot,
        "    label=\"Severity Impact Legend\"; style=filled; fillcolor=white;"
    )?;
    for (key, label, color) in [
        ("severe", "Severe: 100% impact", "#FFCCCC"),
        ("moderate", "Moderate: 75% impact", "#FFEEBB"),
        ("mild", "Mild: 50% impact", "#FFFFCC"),
    ] {
        writeln!(
            dot,
            "    \"legend_{}\" [label=\"{}\", shape=box, style=filled, fillcolor=\"{}\"];",
            key, label, color
        )?;
    }
    writeln!(
        dot,
        "    \"legend_severe\" -> \"legend_moderate\" -> \"legend_mild\" [style=invis];"
    )?;
    writeln!(dot, "  }}")?;
    writeln!(dot, "}}")
}

/// Tree restricted to the questions mapped to one diagnostic category.
pub fn render_disorder_tree(
    catalog: &QuestionCatalog,
    rules: &DiagnosisRuleSet,
    dsm_code: &str,
) -> Result<String, GraphError> {
    let rule = rules
        .find(dsm_code)
        .ok_or_else(|| GraphError::UnknownDisorder(dsm_code.to_string()))?;
    let relevant: Vec<&QuestionDefinition> = catalog.questions_for_code(dsm_code).collect();

    let mut dot = String::new();
    write_disorder_tree(&mut dot, rule, &relevant).expect("write disorder tree");
    Ok(dot)
}

fn write_disorder_tree(
    dot: &mut String,
    rule: &DiagnosisRule,
    relevant: &[&QuestionDefinition],
) -> fmt::Result {
    writeln!(dot, "digraph \"disorder_{}\" {{", rule.dsm_code)?;
    writeln!(dot, "  rankdir=TB;")?;
    writeln!(
        dot,
        "  node [shape=box, style=\"rounded,filled\", fillcolor=lightblue];"
    )?;
    writeln!(
        dot,
        "  \"disorder\" [label=\"{}\", shape=box, style=filled, fillcolor=lightsalmon];",
        disorder_label(rule, relevant.len())
    )?;

    for question in relevant {
        let node = question_node(question);
        writeln!(dot, "  \"{}\" [label=\"{}\"];", node, question_label(question))?;
        if question.binary {
            writeln!(
                dot,
                "  \"{}\" -> \"disorder\" [label=\"Yes\", style=dashed];",
                node
            )?;
        } else {
            writeln!(
                dot,
                "  \"{}\" -> \"disorder\" [label=\"{}\", color=purple, style=dashed];",
                node, SEVERITY_SCALING
            )?;
        }

        for source in dependency_sources(question) {
            if relevant.iter().any(|candidate| candidate.symptom == source) {
                writeln!(dot, "  \"q_{}\" -> \"{}\" [label=\"Yes\"];", source, node)?;
            }
        }
    }

    write_start_node(dot, relevant.iter().copied())?;
    writeln!(dot, "}}")
}

/// One cluster per diagnostic category with its questions and in-cluster dependencies.
pub fn render_simplified_tree(catalog: &QuestionCatalog, rules: &DiagnosisRuleSet) -> String {
    let mut dot = String::new();
    write_simplified_tree(&mut dot, catalog, rules).expect("write simplified tree");
    dot
}

fn write_simplified_tree(
    dot: &mut String,
    catalog: &QuestionCatalog,
    rules: &DiagnosisRuleSet,
) -> fmt::Result {
    writeln!(dot, "digraph simplified_decision_tree {{")?;
    writeln!(dot, "  rankdir=TB;")?;
    writeln!(
        dot,
        "  node [shape=box, style=\"rounded,filled\", fillcolor=lightblue];"
    )?;

    for rule in rules.rules() {
        let code = &rule.dsm_code;
        let relevant: Vec<&QuestionDefinition> = catalog.questions_for_code(code).collect();
        writeln!(dot, "  subgraph \"cluster_{}\" {{", code)?;
        writeln!(
            dot,
            "    label=\"{} ({})\\nRequired: {}/{} symptoms\"; style=filled; fillcolor=lightyellow;",
            escape(&rule.name),
            code,
            required_count(relevant.len()),
            relevant.len()
        )?;
        writeln!(
            dot,
            "    \"severity_legend_{}\" [label=\"{}\", shape=note, style=filled, fillcolor=lightcyan];",
            code, SEVERITY_SCALING
        )?;

        for question in &relevant {
            writeln!(
                dot,
                "    \"{}_{}\" [label=\"{}\"];",
                code,
                question.symptom,
                question_label(question)
            )?;
            if let Some(Dependency::Single(source)) = &question.dependency {
                if relevant.iter().any(|candidate| &candidate.symptom == source) {
                    writeln!(
                        dot,
                        "    \"{}_{}\" -> \"{}_{}\" [label=\"Yes\"];",
                        code, source, code, question.symptom
                    )?;
                }
            }
        }
        writeln!(dot, "  }}")?;
    }

    writeln!(dot, "}}")
}

fn write_start_node<'a>(
    dot: &mut String,
    questions: impl Iterator<Item = &'a QuestionDefinition>,
) -> fmt::Result {
    let entries: Vec<&QuestionDefinition> = questions
        .filter(|question| question.is_entry_point())
        .collect();
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(
        dot,
        "  \"start\" [label=\"Start Assessment\", shape=oval, style=filled, fillcolor=lightgreen];"
    )?;
    for entry in entries {
        writeln!(dot, "  \"start\" -> \"{}\";", question_node(entry))?;
    }
    Ok(())
}
