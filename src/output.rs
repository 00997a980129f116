//! Output rendering for audit and fix runs.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is the same
//! report object that gets written to disk.

use crate::models::rules::Severity;
use crate::models::AuditResult;
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::Value as Json;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a run's results in the requested format.
pub fn print_result(res: &AuditResult, output: &str, report: &Json) {
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(report).unwrap()),
        _ => {
            let color = use_colors(output);
            for is in &res.issues {
                let (icon, sev) = match is.severity {
                    Severity::Error => {
                        if color {
                            ("✖".red().to_string(), "⟦error⟧".red().bold().to_string())
                        } else {
                            ("✖".to_string(), "⟦error⟧".to_string())
                        }
                    }
                    Severity::Warning => {
                        if color {
                            (
                                "▲".yellow().to_string(),
                                "⟦warn⟧".yellow().bold().to_string(),
                            )
                        } else {
                            ("▲".to_string(), "⟦warn⟧".to_string())
                        }
                    }
                };
                let file = utils::rel_to_wd(std::path::Path::new(&is.file));
                let file = if color { file.bold().to_string() } else { file };
                println!("{} {} {} ❲{}❳ — {}", icon, sev, file, is.rule, is.message);
            }
            for f in &res.fixes {
                let file = utils::rel_to_wd(std::path::Path::new(&f.file));
                if color {
                    println!(
                        "{} {} (rule={}, action={})",
                        "✏️  fixed:".green().bold(),
                        file.bold(),
                        f.rule,
                        f.action.as_str()
                    );
                } else {
                    println!(
                        "✏️  fixed: {} (rule={}, action={})",
                        file,
                        f.rule,
                        f.action.as_str()
                    );
                }
            }
            let summary = format!(
                "— Summary — errors={} warnings={} files={} fixes={}",
                res.summary.errors,
                res.summary.warnings,
                res.summary.files,
                res.fixes.len()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}
