//! Formatting of a prediction into display lines.
//!
//! Emphasis is carried as structured `(label, value)` segments and applied by
//! the renderer, so no markup ever travels through the text itself.

use crate::predict::Prediction;

/// Marker prefixed to every user-visible failure line.
pub const ERROR_PREFIX: &str = "❌ Error: ";
/// Placeholder for optional fields the service did not return.
pub const MISSING_FIELD: &str = "N/A";

/// One line of the result block; `label` is rendered with emphasis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub label: Option<&'static str>,
    pub text: String,
}

impl ReportLine {
    fn labeled(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label: Some(label),
            text: text.into(),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::plain("")
    }

    /// Whether this line is an empty spacer.
    pub fn is_blank(&self) -> bool {
        self.label.is_none() && self.text.is_empty()
    }
}

/// Build the fixed-order report block for a prediction.
pub fn build_report(prediction: &Prediction) -> Vec<ReportLine> {
    vec![
        ReportLine::labeled("Prediction:", prediction.class_name.clone()),
        ReportLine::blank(),
        ReportLine::labeled("Confidence:", confidence_percent(prediction.confidence)),
        ReportLine::blank(),
        ReportLine::labeled("Description:", field_or_missing(&prediction.description)),
        ReportLine::labeled("Treatment:", field_or_missing(&prediction.treatment)),
        ReportLine::labeled(
            "Recommendation:",
            field_or_missing(&prediction.recommendation),
        ),
    ]
}

/// Single-line report for a failed request.
pub fn error_report(message: &str) -> Vec<ReportLine> {
    vec![ReportLine::plain(format!("{ERROR_PREFIX}{message}"))]
}

/// Render lines as plain text, one per line, labels joined with a space.
pub fn plain_text(lines: &[ReportLine]) -> String {
    lines
        .iter()
        .map(|line| match line.label {
            Some(label) if line.text.is_empty() => label.to_string(),
            Some(label) => format!("{label} {}", line.text),
            None => line.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn confidence_percent(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn field_or_missing(field: &Option<String>) -> String {
    match field {
        Some(value) if !value.is_empty() => value.clone(),
        _ => MISSING_FIELD.to_string(),
    }
}
