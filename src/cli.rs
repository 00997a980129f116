//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xcaudit",
    version,
    about = "Xcode build configuration auditor",
    long_about = "xcaudit — a small CLI to audit and patch Xcode project files (project.pbxproj, Podfile, native sources) against a declarative JSON rule set.\n\nConfiguration precedence: CLI > xcaudit.toml > defaults.",
    after_help = "Examples:\n  xcaudit audit --project-root .\n  xcaudit audit --rules config/xcaudit.json --output json\n  xcaudit fix --project-root .\n  xcaudit fix --no-backup",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for auditing and fixing.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current xcaudit version.")]
    Version,
    /// Audit the project without modifying anything
    #[command(
        about = "Run audit checks",
        long_about = "Scan project files against the rule set and report issues. Read-only; error-severity issues drive a non-zero exit.",
        after_help = "Examples:\n  xcaudit audit\n  xcaudit audit --rules config/xcaudit.json --output json"
    )]
    Audit {
        #[arg(long, help = "Project root (default: current dir)")]
        project_root: Option<String>,
        #[arg(long, help = "Path to the JSON rules file (default: xcaudit.json)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Report file path (default: xcaudit-report.json)")]
        report: Option<String>,
    },
    /// Apply automated fixes
    #[command(
        about = "Apply automated fixes",
        long_about = "Re-run the audit matching and patch unsatisfied rules in place. Each modified file is backed up first unless --no-backup is set.",
        after_help = "Examples:\n  xcaudit fix\n  xcaudit fix --no-backup --output json"
    )]
    Fix {
        #[arg(long, help = "Project root (default: current dir)")]
        project_root: Option<String>,
        #[arg(long, help = "Path to the JSON rules file (default: xcaudit.json)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Report file path (default: xcaudit-report.json)")]
        report: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip backup creation before fixes")]
        no_backup: bool,
    },
}
