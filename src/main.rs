//! xcaudit CLI binary entry point.
//! Delegates to the library for audit/fix and prints results.

use clap::Parser;
use xcaudit::cli::{Cli, Commands};
use xcaudit::models::rules::RuleSet;
use xcaudit::models::Summary;
use xcaudit::{audit, config, fix, output, report, utils};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Audit {
            project_root,
            rules,
            output,
            report,
        } => {
            run(
                project_root.as_deref(),
                rules.as_deref(),
                output.as_deref(),
                report.as_deref(),
                false,
                false,
            );
        }
        Commands::Fix {
            project_root,
            rules,
            output,
            report,
            no_backup,
        } => {
            run(
                project_root.as_deref(),
                rules.as_deref(),
                output.as_deref(),
                report.as_deref(),
                true,
                no_backup,
            );
        }
    }
}

fn run(
    project_root: Option<&str>,
    rules: Option<&str>,
    output_mode: Option<&str>,
    report_path: Option<&str>,
    fix_mode: bool,
    no_backup: bool,
) {
    let eff = config::resolve_effective(
        project_root,
        rules,
        output_mode,
        report_path,
        if no_backup { Some(false) } else { None },
    );
    if !eff.project_root.is_dir() {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!(
                "Project root not found: {}",
                eff.project_root.to_string_lossy()
            )
        );
        std::process::exit(2);
    }
    // Friendly note if no xcaudit config was found
    if config::load_config(&eff.project_root).is_none() {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "No xcaudit.toml found; using defaults."
        );
    }
    let rules_path = eff.project_root.join(&eff.rules);
    if !rules_path.is_file() {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!(
                "Rules file not found: {} (pass --rules or add xcaudit.toml)",
                rules_path.to_string_lossy()
            )
        );
        std::process::exit(2);
    }
    let ruleset: RuleSet = match std::fs::read_to_string(&rules_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(rs) => rs,
        Err(e) => {
            eprintln!(
                "{} {}",
                utils::error_prefix(),
                format!("Could not load rules file: {}", e)
            );
            std::process::exit(2);
        }
    };

    let result = if fix_mode {
        let (fixes, mut write_issues) = fix::run_fix(&eff.project_root, &ruleset, eff.backup);
        // Scan after patching so the report and exit code reflect what remains
        let mut after = audit::run_audit(&eff.project_root, &ruleset);
        after.issues.append(&mut write_issues);
        let files = after.summary.files;
        after.summary = Summary::tally(&after.issues, files);
        after.fixes = fixes;
        after
    } else {
        audit::run_audit(&eff.project_root, &ruleset)
    };

    let report_json = report::compose_report(&eff.project_root, &ruleset.version, &result);
    let report_file = eff.project_root.join(&eff.report);
    if let Err(e) = report::write_report(&report_file, &report_json) {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            format!(
                "Could not write report {}: {}",
                report_file.to_string_lossy(),
                e
            )
        );
    } else if eff.output != "json" {
        eprintln!(
            "{} {}",
            utils::info_prefix(),
            format!("Report saved to {}", utils::rel_to_wd(&report_file))
        );
    }
    output::print_result(&result, &eff.output, &report_json);
    if result.summary.errors > 0 {
        std::process::exit(1);
    }
}
