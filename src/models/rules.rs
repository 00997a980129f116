//! Rule set schema loaded from the JSON rules file.
//!
//! Rules are an ordered collection; audit and fix apply them in declaration
//! order. Each rule carries an id, a severity, and a `kind` tag selecting the
//! matching/patching behavior plus its kind-specific fields.

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
/// Top-level rules document (`xcaudit.json`).
pub struct RuleSet {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Deserialize, Clone)]
/// One declarative rule driving both auditing and fixing.
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: RuleKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
/// Issue severity. Errors drive the non-zero exit code.
pub enum Severity {
    Error,
    #[default]
    Warning,
}

#[derive(Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// Kind-specific matching and patching behavior.
pub enum RuleKind {
    /// Ensure a named shell-script build phase declares its output files.
    BuildPhaseOutputs {
        #[serde(rename = "scriptName")]
        script_name: String,
        #[serde(rename = "requiredOutputs")]
        required_outputs: Vec<String>,
    },
    /// Remove repeated entries from a build-settings list (e.g. OTHER_LDFLAGS).
    DedupeSetting { setting: String },
    /// Replace a deprecated symbol across native source files.
    ReplaceSymbol {
        symbol: String,
        replacement: String,
        #[serde(default = "default_source_globs")]
        globs: Vec<String>,
    },
    /// Require a named hook (e.g. post_install) to be present in the Podfile.
    PodfileHook { hook: String },
}

fn default_source_globs() -> Vec<String> {
    ["**/*.m", "**/*.mm", "**/*.h", "**/*.cpp"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ruleset_all_kinds() {
        let raw = r#"{
  "version": "1.0.0",
  "rules": [
    {"id": "BP001", "severity": "warning", "kind": "build-phase-outputs",
     "scriptName": "Bundle React Native code and images",
     "requiredOutputs": ["$(DERIVED_FILE_DIR)/react-native-bundle.log"]},
    {"id": "LD001", "kind": "dedupe-setting", "setting": "OTHER_LDFLAGS"},
    {"id": "CC001", "severity": "error", "kind": "replace-symbol",
     "symbol": "CallSeqFactory", "replacement": "callInvoker_->invokeAsync"},
    {"id": "DM001", "kind": "podfile-hook", "hook": "post_install"}
  ]
}"#;
        let rs: RuleSet = serde_json::from_str(raw).unwrap();
        assert_eq!(rs.version, "1.0.0");
        assert_eq!(rs.rules.len(), 4);
        assert_eq!(rs.rules[0].severity, Severity::Warning);
        assert_eq!(rs.rules[2].severity, Severity::Error);
        // severity defaults to warning when omitted
        assert_eq!(rs.rules[1].severity, Severity::Warning);
        match &rs.rules[2].kind {
            RuleKind::ReplaceSymbol { globs, .. } => {
                assert!(globs.iter().any(|g| g == "**/*.mm"));
            }
            _ => panic!("expected replace-symbol"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let raw = r#"{"rules": [{"id": "X", "kind": "frobnicate"}]}"#;
        assert!(serde_json::from_str::<RuleSet>(raw).is_err());
    }
}
