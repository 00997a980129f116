//! Fix runner: re-applies the audit matching and patches documents in place.
//!
//! The pbxproj is patched once through all of its rules and saved at most one
//! time; its pending fixes are only committed when the save succeeds, so every
//! recorded Fix corresponds to an actual write. Backup happens before the
//! overwrite. Save failures degrade to warning issues and the run continues.

use crate::models::rules::{RuleKind, RuleSet, Severity};
use crate::models::{Fix, FixAction, Issue};
use crate::project::Document;
use crate::{patch, project};
use std::path::Path;

/// Apply every fixable rule under `root`. Returns the fixes applied and the
/// recoverable issues (load/save failures) encountered along the way.
pub fn run_fix(root: &Path, rules: &RuleSet, backup: bool) -> (Vec<Fix>, Vec<Issue>) {
    let mut fixes: Vec<Fix> = Vec::new();
    let mut issues: Vec<Issue> = Vec::new();

    fix_pbxproj(root, rules, backup, &mut fixes, &mut issues);

    for rule in &rules.rules {
        if let RuleKind::ReplaceSymbol {
            symbol,
            replacement,
            globs,
        } = &rule.kind
        {
            for path in project::source_files(root, globs) {
                let mut doc = match Document::load(&path) {
                    Ok(d) => d,
                    Err(e) => {
                        issues.push(io_issue(&rule.id, &path, "read", &e));
                        continue;
                    }
                };
                if let Some(next) = patch::replace_symbol(&doc.text, symbol, replacement) {
                    doc.text = next;
                    match doc.save(backup) {
                        Ok(_) => fixes.push(Fix {
                            rule: rule.id.clone(),
                            file: path.to_string_lossy().to_string(),
                            action: FixAction::Modified,
                        }),
                        Err(e) => issues.push(io_issue(&rule.id, &path, "save", &e)),
                    }
                }
            }
        }
    }

    (fixes, issues)
}

/// Apply all pbxproj-targeting rules against one in-memory document.
fn fix_pbxproj(
    root: &Path,
    rules: &RuleSet,
    backup: bool,
    fixes: &mut Vec<Fix>,
    issues: &mut Vec<Issue>,
) {
    let path = match project::find_pbxproj(root) {
        Some(p) => p,
        None => return, // audit already reported the skip
    };
    let mut doc = match Document::load(&path) {
        Ok(d) => d,
        Err(e) => {
            issues.push(io_issue("project", &path, "read", &e));
            return;
        }
    };

    let mut pending: Vec<Fix> = Vec::new();
    for rule in &rules.rules {
        match &rule.kind {
            RuleKind::BuildPhaseOutputs {
                script_name,
                required_outputs,
            } => {
                if let Some((next, action)) =
                    patch::ensure_phase_outputs(&doc.text, script_name, required_outputs)
                {
                    doc.text = next;
                    pending.push(Fix {
                        rule: rule.id.clone(),
                        file: path.to_string_lossy().to_string(),
                        action,
                    });
                }
            }
            RuleKind::DedupeSetting { setting } => {
                let (next, removed) = patch::dedupe_setting(&doc.text, setting);
                if removed > 0 {
                    doc.text = next;
                    pending.push(Fix {
                        rule: rule.id.clone(),
                        file: path.to_string_lossy().to_string(),
                        action: FixAction::Modified,
                    });
                }
            }
            _ => {}
        }
    }

    if doc.changed() {
        match doc.save(backup) {
            Ok(_) => fixes.append(&mut pending),
            Err(e) => issues.push(io_issue("project", &path, "save", &e)),
        }
    }
}

fn io_issue(rule_id: &str, path: &Path, op: &str, err: &std::io::Error) -> Issue {
    Issue {
        rule: rule_id.to_string(),
        severity: Severity::Warning,
        file: path.to_string_lossy().to_string(),
        anchor: None,
        message: format!("failed to {} file: {}", op, err),
    }
}
