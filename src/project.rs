//! Project file discovery and document I/O.
//!
//! Documents are loaded once, mutated in memory, and written back only when
//! their content changed, with a timestamped backup created first.

use chrono::Local;
use glob::glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file's full text, loaded once and patched in memory.
pub struct Document {
    pub path: PathBuf,
    original: String,
    pub text: String,
}

impl Document {
    pub fn load(path: &Path) -> io::Result<Document> {
        let original = fs::read_to_string(path)?;
        Ok(Document {
            path: path.to_path_buf(),
            text: original.clone(),
            original,
        })
    }

    /// Pre-patch content, preserved for the backup copy.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn changed(&self) -> bool {
        self.text != self.original
    }

    /// Persist the patched text. When `backup` is set, the pre-patch content
    /// is written to a timestamped sibling before the file is overwritten.
    pub fn save(&self, backup: bool) -> io::Result<Option<PathBuf>> {
        let mut backed_up = None;
        if backup {
            let bp = backup_path(&self.path);
            fs::write(&bp, self.original())?;
            backed_up = Some(bp);
        }
        fs::write(&self.path, &self.text)?;
        Ok(backed_up)
    }
}

/// `<name>.backup_YYYYmmdd_HHMMSS` next to the original.
fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{}.backup_{}", name, stamp))
}

/// Locate `project.pbxproj`: `<root>/ios/*.xcodeproj` first, then `<root>/*.xcodeproj`.
pub fn find_pbxproj(root: &Path) -> Option<PathBuf> {
    for pat in ["ios/*.xcodeproj/project.pbxproj", "*.xcodeproj/project.pbxproj"] {
        let pattern = root.join(pat).to_string_lossy().to_string();
        if let Ok(entries) = glob(&pattern) {
            if let Some(p) = entries.flatten().next() {
                return Some(p);
            }
        }
    }
    None
}

/// Locate the Podfile: `<root>/ios/Podfile` first, then `<root>/Podfile`.
pub fn find_podfile(root: &Path) -> Option<PathBuf> {
    for rel in ["ios/Podfile", "Podfile"] {
        let p = root.join(rel);
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Native source files matched by the rule globs, excluding `Pods/` and
/// `build/` trees. Sorted and deduplicated for deterministic runs.
pub fn source_files(root: &Path, globs: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pat in globs {
        let pattern = root.join(pat).to_string_lossy().to_string();
        if let Ok(entries) = glob(&pattern) {
            for p in entries.flatten() {
                if p.is_file() && !is_excluded(&p) {
                    files.push(p);
                }
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_excluded(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c.as_os_str().to_str(), Some("Pods") | Some("build")))
}
