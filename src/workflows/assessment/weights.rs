use super::domain::is_negative_severity;

const BASE_WEIGHT: f64 = 0.9;
const SHARED_CODE_REDUCTION: f64 = 0.2;
const MINIMUM_SEVERITY_WEIGHT: f64 = 0.5;

/// Multiplier applied to the code-adjusted weight for a severity label.
pub fn severity_factor(severity: &str) -> f64 {
    match severity.trim().to_lowercase().as_str() {
        "severe" => 1.0,
        "moderate" => 0.75,
        "mild" => 0.5,
        _ => 0.0,
    }
}

/// Weight in `[0, 1]` for a symptom answered at `severity`.
///
/// Symptoms shared by several diagnostic categories are discounted by 0.2 per extra code, never
/// below 0.5 before the severity factor. Binary questions only ever score 0 or 1.
pub fn compute_question_weight<S: AsRef<str>>(dsm_codes: &[S], severity: &str, binary: bool) -> f64 {
    if is_negative_severity(severity) {
        return 0.0;
    }

    if binary {
        return if severity.trim().eq_ignore_ascii_case("yes") {
            1.0
        } else {
            0.0
        };
    }

    let extra_codes = dsm_codes.len().saturating_sub(1) as f64;
    let weight = (BASE_WEIGHT - SHARED_CODE_REDUCTION * extra_codes).max(MINIMUM_SEVERITY_WEIGHT);
    round_to_hundredths(weight * severity_factor(severity))
}

/// Severity used for the display weight shown alongside a question.
pub(crate) fn default_severity(binary: bool) -> &'static str {
    if binary {
        "Yes"
    } else {
        "Severe"
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
