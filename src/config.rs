//! Configuration discovery and effective settings resolution.
//!
//! xcaudit reads `xcaudit.toml|yaml|yml` from the project root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `rules`: `xcaudit.json`
//! - `output`: `human`
//! - `report`: `xcaudit-report.json`
//! - `backup`: true
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `xcaudit.toml|yaml`.
pub struct XcauditConfig {
    pub rules: Option<String>,
    pub output: Option<String>,
    pub report: Option<String>,
    pub backup: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub project_root: PathBuf,
    pub rules: String,
    pub output: String,
    pub report: String,
    pub backup: bool,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when an `xcaudit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("xcaudit.toml").exists()
            || cur.join("xcaudit.yaml").exists()
            || cur.join("xcaudit.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `XcauditConfig` from `xcaudit.toml` or `xcaudit.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<XcauditConfig> {
    let toml_path = root.join("xcaudit.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: XcauditConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["xcaudit.yaml", "xcaudit.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: XcauditConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_project_root: Option<&str>,
    cli_rules: Option<&str>,
    cli_output: Option<&str>,
    cli_report: Option<&str>,
    cli_backup: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_project_root.unwrap_or("."));
    let project_root = detect_project_root(&start);
    let cfg = load_config(&project_root).unwrap_or_default();

    let rules = cli_rules
        .map(|s| s.to_string())
        .or(cfg.rules)
        .unwrap_or_else(|| "xcaudit.json".to_string());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let report = cli_report
        .map(|s| s.to_string())
        .or(cfg.report)
        .unwrap_or_else(|| "xcaudit-report.json".to_string());

    let backup = cli_backup.or(cfg.backup).unwrap_or(true);

    Effective {
        project_root,
        rules,
        output,
        report,
        backup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("xcaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
rules = "config/rules.json"
output = "json"
backup = false
    "#
        )
        .unwrap();

        // Resolve using explicit project_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None, None);
        assert_eq!(eff.rules, "config/rules.json");
        assert_eq!(eff.output, "json");
        assert!(!eff.backup);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("xcaudit.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None, None);
        assert_eq!(eff.rules, "xcaudit.json");
        assert_eq!(eff.output, "human");
        assert_eq!(eff.report, "xcaudit-report.json");
        // backup defaults to true when unspecified
        assert!(eff.backup);
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("xcaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
rules = "config/rules.json"
output = "json"
backup = true
            "#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("other.json"),
            Some("human"),
            None,
            Some(false),
        );
        assert_eq!(eff.rules, "other.json");
        assert_eq!(eff.output, "human");
        assert!(!eff.backup);
    }

    #[test]
    fn test_detect_walks_up_to_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::File::create(root.join("xcaudit.toml")).unwrap();
        let nested = root.join("ios/App");
        fs::create_dir_all(&nested).unwrap();
        let found = detect_project_root(&nested);
        assert_eq!(found, root);
    }
}
