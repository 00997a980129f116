//! xcaudit core library.
//!
//! This crate exposes programmatic APIs for auditing and patching Xcode
//! project files according to a JSON rule set.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `audit`: Read-only rule matching producing issues.
//! - `fix`: Rule application with backup-before-write semantics.
//! - `patch`: Regex/substring patching primitives for pbxproj and sources.
//! - `project`: Project file discovery and document I/O.
//! - `models`: Data models for rules, issues, fixes, and summaries.
//! - `report`: JSON report composition and persistence.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod audit;
pub mod cli;
pub mod config;
pub mod fix;
pub mod models;
pub mod output;
pub mod patch;
pub mod project;
pub mod report;
pub mod utils;
