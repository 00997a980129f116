//! JSON report composition and persistence.
//!
//! The report enumerates issues found and fixes applied, with a severity
//! summary and an RFC3339 timestamp. `compose_report` is pure so tests can
//! assert on the shape without touching the filesystem.

use crate::models::AuditResult;
use chrono::Local;
use serde_json::{json, Value as Json};
use std::fs;
use std::io;
use std::path::Path;

/// Compose the report object written after every run.
pub fn compose_report(root: &Path, rules_version: &str, res: &AuditResult) -> Json {
    json!({
        "timestamp": Local::now().to_rfc3339(),
        "rulesVersion": rules_version,
        "projectRoot": root.to_string_lossy(),
        "summary": serde_json::to_value(&res.summary).unwrap(),
        "issues": serde_json::to_value(&res.issues).unwrap(),
        "fixes": serde_json::to_value(&res.fixes).unwrap(),
    })
}

/// Write the report to disk, pretty-printed.
pub fn write_report(path: &Path, report: &Json) -> io::Result<()> {
    fs::write(path, serde_json::to_string_pretty(report).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rules::Severity;
    use crate::models::{Fix, FixAction, Issue, Summary};
    use tempfile::tempdir;

    fn sample_result() -> AuditResult {
        AuditResult {
            issues: vec![Issue {
                rule: "BP001".into(),
                severity: Severity::Warning,
                file: "ios/App.xcodeproj/project.pbxproj".into(),
                anchor: Some("Bundle React Native code and images".into()),
                message: "missing output files".into(),
            }],
            fixes: vec![Fix {
                rule: "BP001".into(),
                file: "ios/App.xcodeproj/project.pbxproj".into(),
                action: FixAction::Created,
            }],
            summary: Summary {
                errors: 0,
                warnings: 1,
                files: 1,
            },
        }
    }

    #[test]
    fn test_compose_report_shape() {
        let res = sample_result();
        let out = compose_report(Path::new("/proj"), "1.0.0", &res);
        assert_eq!(out["rulesVersion"], "1.0.0");
        assert_eq!(out["projectRoot"], "/proj");
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["issues"][0]["severity"], "warning");
        assert_eq!(
            out["issues"][0]["anchor"],
            "Bundle React Native code and images"
        );
        assert_eq!(out["fixes"][0]["action"], "created");
        assert!(out["timestamp"].is_string());
    }

    #[test]
    fn test_write_report_round_trips() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("xcaudit-report.json");
        let out = compose_report(Path::new("/proj"), "1.0.0", &sample_result());
        write_report(&path, &out).unwrap();
        let back: Json = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["summary"]["files"], 1);
    }
}
