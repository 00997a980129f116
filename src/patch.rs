//! Text patching primitives for `project.pbxproj` and native sources.
//!
//! Matching is plain regex/substring search over the pbxproj text; the file
//! format is not parsed. Matches are therefore brittle to unusual formatting,
//! which is an accepted limitation of this tool.

use crate::models::FixAction;
use regex::Regex;
use std::ops::Range;

/// Locate the body of the shell-script build phase named `script_name`.
///
/// Returns the byte range of the block body (everything between the braces)
/// so callers can splice replacements without a global string replace.
pub fn find_phase(text: &str, script_name: &str) -> Option<Range<usize>> {
    let pat = format!(
        r"(?s)[0-9A-F]{{24}} /\* {} \*/ = \{{(.*?isa = PBXShellScriptBuildPhase;.*?)\}};",
        regex::escape(script_name)
    );
    let re = Regex::new(&pat).ok()?;
    let caps = re.captures(text)?;
    let body = caps.get(1)?;
    Some(body.start()..body.end())
}

/// Required outputs not yet declared within the phase body.
pub fn missing_outputs<'a>(body: &str, required: &'a [String]) -> Vec<&'a String> {
    required.iter().filter(|o| !body.contains(o.as_str())).collect()
}

/// Ensure the named phase declares all `required` outputs.
///
/// Returns the patched text and the action taken, or `None` when the phase is
/// absent or already satisfied. Re-running on the returned text yields `None`.
pub fn ensure_phase_outputs(
    text: &str,
    script_name: &str,
    required: &[String],
) -> Option<(String, FixAction)> {
    let span = find_phase(text, script_name)?;
    let body = &text[span.clone()];
    let missing = missing_outputs(body, required);
    if missing.is_empty() {
        return None;
    }
    let entries: String = missing
        .iter()
        .map(|o| format!("\n\t\t\t\t\"{}\",", o))
        .collect();

    // Lazy up to the closing `);` so entries like "$(DERIVED_FILE_DIR)/a.log"
    // do not terminate the match at their inner parenthesis.
    let outputs_re = Regex::new(r"(?s)outputPaths = \((.*?)\);").ok()?;
    let (new_body, action) = if let Some(caps) = outputs_re.captures(body) {
        // Existing (possibly empty) list: append the missing entries.
        let inner = caps.get(1)?;
        let new_inner = format!("{}{}\n\t\t\t", inner.as_str().trim_end(), entries);
        let mut nb = String::with_capacity(body.len() + entries.len());
        nb.push_str(&body[..inner.start()]);
        nb.push_str(&new_inner);
        nb.push_str(&body[inner.end()..]);
        (nb, FixAction::Modified)
    } else {
        // No outputPaths section: create one before the closing brace.
        (
            format!(
                "{}\n\t\t\toutputPaths = ({}\n\t\t\t);\n\t\t",
                body.trim_end(),
                entries
            ),
            FixAction::Created,
        )
    };

    let mut out = String::with_capacity(text.len() + new_body.len());
    out.push_str(&text[..span.start]);
    out.push_str(&new_body);
    out.push_str(&text[span.end..]);
    Some((out, action))
}

// Lazy body match: entries like "$(inherited)" contain a parenthesis, so the
// list only ends at the literal `);`.
fn setting_list_re(setting: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?s)({}\s*=\s*\()(.*?)(\);)",
        regex::escape(setting)
    ))
    .ok()
}

// String form: SETTING = "$(inherited) -lc++ -lc++";
fn setting_string_re(setting: &str) -> Option<Regex> {
    Regex::new(&format!(r#"({}\s*=\s*")([^"]+)(";)"#, regex::escape(setting))).ok()
}

// Space-separated string value; $(...) variables are never counted as
// duplicates.
fn duplicate_token_count(value: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    let mut dups = 0usize;
    for tok in value.split_whitespace() {
        if tok.starts_with("$(") {
            continue;
        }
        if seen.contains(&tok) {
            dups += 1;
        } else {
            seen.push(tok);
        }
    }
    dups
}

fn duplicate_count(inner: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    let mut dups = 0usize;
    for seg in inner.split(',') {
        let t = seg.trim();
        if t.is_empty() {
            continue;
        }
        if seen.contains(&t) {
            dups += 1;
        } else {
            seen.push(t);
        }
    }
    dups
}

/// Count duplicated entries across every `setting = ( ... );` list and every
/// `setting = "...";` space-separated string value.
pub fn list_duplicates(text: &str, setting: &str) -> usize {
    let lists: usize = match setting_list_re(setting) {
        Some(re) => re
            .captures_iter(text)
            .map(|c| duplicate_count(c.get(2).map(|m| m.as_str()).unwrap_or("")))
            .sum(),
        None => 0,
    };
    let strings: usize = match setting_string_re(setting) {
        Some(re) => re
            .captures_iter(text)
            .map(|c| duplicate_token_count(c.get(2).map(|m| m.as_str()).unwrap_or("")))
            .sum(),
        None => 0,
    };
    lists + strings
}

/// Drop repeated entries from every `setting = ( ... );` list and every
/// `setting = "...";` string value, keeping the first occurrence of each
/// entry and the relative order of first appearances.
///
/// Values without duplicates are left byte-identical.
pub fn dedupe_setting(text: &str, setting: &str) -> (String, usize) {
    let (out, list_removed) = dedupe_setting_lists(text, setting);
    let (out, string_removed) = dedupe_setting_strings(&out, setting);
    (out, list_removed + string_removed)
}

fn dedupe_setting_lists(text: &str, setting: &str) -> (String, usize) {
    let re = match setting_list_re(setting) {
        Some(r) => r,
        None => return (text.to_string(), 0),
    };
    let mut removed = 0usize;
    let out = re.replace_all(text, |caps: &regex::Captures| {
        let inner = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if duplicate_count(inner) == 0 {
            return caps[0].to_string();
        }
        let segments: Vec<&str> = inner.split(',').collect();
        let mut seen: Vec<String> = Vec::new();
        let mut kept: Vec<&str> = Vec::new();
        let mut tail: Option<&str> = None;
        for (i, seg) in segments.iter().enumerate() {
            let t = seg.trim();
            if t.is_empty() {
                // whitespace after the trailing comma; keep its formatting
                if i == segments.len() - 1 {
                    tail = Some(seg);
                }
                continue;
            }
            if seen.iter().any(|s| s == t) {
                removed += 1;
            } else {
                seen.push(t.to_string());
                kept.push(seg);
            }
        }
        let mut joined = kept.join(",");
        if let Some(t) = tail {
            joined.push(',');
            joined.push_str(t);
        }
        format!("{}{}{}", &caps[1], joined, &caps[3])
    });
    (out.into_owned(), removed)
}

fn dedupe_setting_strings(text: &str, setting: &str) -> (String, usize) {
    let re = match setting_string_re(setting) {
        Some(r) => r,
        None => return (text.to_string(), 0),
    };
    let mut removed = 0usize;
    let out = re.replace_all(text, |caps: &regex::Captures| {
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if duplicate_token_count(value) == 0 {
            return caps[0].to_string();
        }
        let mut seen: Vec<&str> = Vec::new();
        let mut kept: Vec<&str> = Vec::new();
        for tok in value.split_whitespace() {
            // $(...) variables are always kept as-is
            if tok.starts_with("$(") {
                kept.push(tok);
                continue;
            }
            if seen.contains(&tok) {
                removed += 1;
            } else {
                seen.push(tok);
                kept.push(tok);
            }
        }
        format!("{}{}{}", &caps[1], kept.join(" "), &caps[3])
    });
    (out.into_owned(), removed)
}

/// Plain textual replacement of a deprecated symbol. `None` when absent.
pub fn replace_symbol(text: &str, symbol: &str, replacement: &str) -> Option<String> {
    if text.contains(symbol) {
        Some(text.replace(symbol, replacement))
    } else {
        None
    }
}
