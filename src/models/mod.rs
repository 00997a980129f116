//! Shared data models for audit/fix outputs and the rules schema.

pub mod rules;

use crate::models::rules::Severity;
use serde::Serialize;

#[derive(Serialize)]
/// A single audit issue with severity and location.
pub struct Issue {
    pub rule: String,
    pub severity: Severity,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// What a fix did to the document.
pub enum FixAction {
    Created,
    Modified,
}

impl FixAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixAction::Created => "created",
            FixAction::Modified => "modified",
        }
    }
}

#[derive(Serialize)]
/// Record of one applied patch. Only created when a write actually occurred.
pub struct Fix {
    pub rule: String,
    pub file: String,
    pub action: FixAction,
}

#[derive(Serialize)]
/// Aggregated severity accounting used by printers and the report.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
}

impl Summary {
    /// Count issues by severity over `files` inspected documents.
    pub fn tally(issues: &[Issue], files: usize) -> Summary {
        let errors = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        Summary {
            errors,
            warnings: issues.len() - errors,
            files,
        }
    }
}

#[derive(Serialize)]
/// Audit/fix results container.
pub struct AuditResult {
    pub issues: Vec<Issue>,
    pub fixes: Vec<Fix>,
    pub summary: Summary,
}
