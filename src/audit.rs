//! Audit runner: applies every rule read-only and aggregates issues.
//!
//! Recoverable conditions (document absent, signature not found) become
//! warning issues rather than errors; only main treats unreadable rule
//! configuration as fatal.

use crate::models::rules::{RuleKind, RuleSet, Severity};
use crate::models::{AuditResult, Issue, Summary};
use crate::{patch, project};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Run all rules against the project under `root`. Read-only; no side effects.
pub fn run_audit(root: &Path, rules: &RuleSet) -> AuditResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();

    let pbx_path = project::find_pbxproj(root);
    let pbx_text = pbx_path.as_ref().and_then(|p| fs::read_to_string(p).ok());
    if let (Some(p), Some(_)) = (&pbx_path, &pbx_text) {
        seen.insert(p.clone());
    }

    for rule in &rules.rules {
        match &rule.kind {
            RuleKind::BuildPhaseOutputs {
                script_name,
                required_outputs,
            } => {
                let (path, text) = match (&pbx_path, &pbx_text) {
                    (Some(p), Some(t)) => (p, t),
                    _ => {
                        issues.push(missing_pbxproj(&rule.id, root));
                        continue;
                    }
                };
                match patch::find_phase(text, script_name) {
                    None => issues.push(Issue {
                        rule: rule.id.clone(),
                        severity: Severity::Warning,
                        file: display(path),
                        anchor: Some(script_name.clone()),
                        message: format!("build phase '{}' not found; rule skipped", script_name),
                    }),
                    Some(span) => {
                        let missing = patch::missing_outputs(&text[span], required_outputs);
                        if !missing.is_empty() {
                            issues.push(Issue {
                                rule: rule.id.clone(),
                                severity: rule.severity,
                                file: display(path),
                                anchor: Some(script_name.clone()),
                                message: format!(
                                    "build phase '{}' is missing output files: {}",
                                    script_name,
                                    missing
                                        .iter()
                                        .map(|s| s.as_str())
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                ),
                            });
                        }
                    }
                }
            }
            RuleKind::DedupeSetting { setting } => {
                let (path, text) = match (&pbx_path, &pbx_text) {
                    (Some(p), Some(t)) => (p, t),
                    _ => {
                        issues.push(missing_pbxproj(&rule.id, root));
                        continue;
                    }
                };
                let dups = patch::list_duplicates(text, setting);
                if dups > 0 {
                    issues.push(Issue {
                        rule: rule.id.clone(),
                        severity: rule.severity,
                        file: display(path),
                        anchor: Some(setting.clone()),
                        message: format!("{} contains {} duplicate entries", setting, dups),
                    });
                }
            }
            RuleKind::ReplaceSymbol { symbol, globs, .. } => {
                let files = project::source_files(root, globs);
                let mut found: Vec<Issue> = files
                    .par_iter()
                    .filter_map(|p| {
                        let data = fs::read_to_string(p).ok()?;
                        data.contains(symbol.as_str()).then(|| Issue {
                            rule: rule.id.clone(),
                            severity: rule.severity,
                            file: display(p),
                            anchor: None,
                            message: format!("found deprecated symbol '{}'", symbol),
                        })
                    })
                    .collect();
                found.sort_by(|a, b| a.file.cmp(&b.file));
                issues.append(&mut found);
                seen.extend(files);
            }
            RuleKind::PodfileHook { hook } => match project::find_podfile(root) {
                None => issues.push(Issue {
                    rule: rule.id.clone(),
                    severity: Severity::Warning,
                    file: display(root),
                    anchor: None,
                    message: "no Podfile found; rule skipped".to_string(),
                }),
                Some(p) => {
                    seen.insert(p.clone());
                    let has_hook = fs::read_to_string(&p)
                        .map(|s| s.contains(hook.as_str()))
                        .unwrap_or(false);
                    if !has_hook {
                        issues.push(Issue {
                            rule: rule.id.clone(),
                            severity: rule.severity,
                            file: display(&p),
                            anchor: Some(hook.clone()),
                            message: format!("Podfile has no {} hook", hook),
                        });
                    }
                }
            },
        }
    }

    let summary = Summary::tally(&issues, seen.len());
    AuditResult {
        issues,
        fixes: Vec::new(),
        summary,
    }
}

fn missing_pbxproj(rule_id: &str, root: &Path) -> Issue {
    Issue {
        rule: rule_id.to_string(),
        severity: Severity::Warning,
        file: display(root),
        anchor: None,
        message: "project.pbxproj not found; rule skipped".to_string(),
    }
}

fn display(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rules::Rule;
    use tempfile::tempdir;

    fn write_pbxproj(root: &Path, body_lines: &[&str]) {
        let dir = root.join("ios/App.xcodeproj");
        fs::create_dir_all(&dir).unwrap();
        let mut lines = vec![
            "// !$*UTF8*$!".to_string(),
            "{".to_string(),
            "\t\tAABBCCDDEEFF00112233AABB /* Bundle React Native code and images */ = {"
                .to_string(),
            "\t\t\tisa = PBXShellScriptBuildPhase;".to_string(),
        ];
        lines.extend(body_lines.iter().map(|l| l.to_string()));
        lines.push("\t\t\tshellPath = /bin/sh;".to_string());
        lines.push("\t\t};".to_string());
        lines.push("}".to_string());
        fs::write(dir.join("project.pbxproj"), lines.join("\n")).unwrap();
    }

    fn phase_rule(outputs: &[&str]) -> RuleSet {
        RuleSet {
            version: "1.0.0".into(),
            rules: vec![Rule {
                id: "BP001".into(),
                severity: Severity::Warning,
                kind: RuleKind::BuildPhaseOutputs {
                    script_name: "Bundle React Native code and images".into(),
                    required_outputs: outputs.iter().map(|s| s.to_string()).collect(),
                },
            }],
        }
    }

    #[test]
    fn test_satisfied_rule_reports_no_issue() {
        let tmp = tempdir().unwrap();
        write_pbxproj(
            tmp.path(),
            &["\t\t\toutputPaths = (", "\t\t\t\t\"a.log\",", "\t\t\t);"],
        );
        let res = run_audit(tmp.path(), &phase_rule(&["a.log"]));
        assert!(res.issues.is_empty());
        assert_eq!(res.summary.files, 1);
    }

    #[test]
    fn test_unsatisfied_rule_reports_issue_with_anchor() {
        let tmp = tempdir().unwrap();
        write_pbxproj(tmp.path(), &[]);
        let res = run_audit(tmp.path(), &phase_rule(&["a.log"]));
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.summary.warnings, 1);
        assert_eq!(
            res.issues[0].anchor.as_deref(),
            Some("Bundle React Native code and images")
        );
    }

    #[test]
    fn test_missing_phase_is_skipped_as_warning() {
        let tmp = tempdir().unwrap();
        write_pbxproj(tmp.path(), &[]);
        let mut rules = phase_rule(&["a.log"]);
        if let RuleKind::BuildPhaseOutputs { script_name, .. } = &mut rules.rules[0].kind {
            *script_name = "No Such Phase".into();
        }
        let res = run_audit(tmp.path(), &rules);
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.issues[0].severity, Severity::Warning);
        assert!(res.issues[0].message.contains("rule skipped"));
    }

    #[test]
    fn test_missing_pbxproj_is_recoverable() {
        let tmp = tempdir().unwrap();
        let res = run_audit(tmp.path(), &phase_rule(&["a.log"]));
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.issues[0].severity, Severity::Warning);
        assert_eq!(res.summary.errors, 0);
    }

    #[test]
    fn test_symbol_scan_and_podfile_hook() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("ios/App")).unwrap();
        fs::write(
            root.join("ios/App/Module.mm"),
            "auto f = CallSeqFactory(rt);\n",
        )
        .unwrap();
        fs::write(root.join("ios/Podfile"), "platform :ios, '13.0'\n").unwrap();
        let rules = RuleSet {
            version: "1.0.0".into(),
            rules: vec![
                Rule {
                    id: "CC001".into(),
                    severity: Severity::Error,
                    kind: RuleKind::ReplaceSymbol {
                        symbol: "CallSeqFactory".into(),
                        replacement: "callInvoker_->invokeAsync".into(),
                        globs: vec!["**/*.mm".into()],
                    },
                },
                Rule {
                    id: "DM001".into(),
                    severity: Severity::Warning,
                    kind: RuleKind::PodfileHook {
                        hook: "post_install".into(),
                    },
                },
            ],
        };
        let res = run_audit(root, &rules);
        assert_eq!(res.summary.errors, 1);
        assert_eq!(res.summary.warnings, 1);
        assert_eq!(res.summary.files, 2);
    }
}
