//! Result files.
//!
//! All tables are tab separated with a UTF-8 byte-order mark. The rules table
//! is append-only and has no header; result tables are rewritten per run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lvderiv_corpus::DelimitedWriter;
use lvderiv_rules::escape_control;

use crate::catalog::TransformationCategory;
use crate::derive::{DerivationRecord, ShotMode};
use crate::sweep::ResultRecord;

pub const REGEX_RESULTS_DIR: &str = "regex_results";
pub const DERIVATION_RESULTS_DIR: &str = "derivation_results";

pub const RESULT_HEADER: [&str; 8] = [
    "Lemma",
    "SourceCategory",
    "Rule",
    "Candidate",
    "TargetCategory",
    "Frequency",
    "Tier",
    "Group",
];

pub const DERIVATION_HEADER: [&str; 8] = [
    "Lemma",
    "SourceCategory",
    "Candidate",
    "TargetCategory",
    "Explanation",
    "Frequency",
    "Tier",
    "Group",
];

pub fn rules_table_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}_rules.tsv"))
}

pub fn regex_results_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}.tsv"))
}

pub fn derivation_results_path(dir: &Path, label: &str, mode: ShotMode) -> PathBuf {
    dir.join(format!("{label}_{}.tsv", mode.label()))
}

/// Append one `[source, target, rule]` row per raw rule line.
pub fn append_rules(
    path: &Path,
    category: &TransformationCategory,
    rules: &[String],
) -> Result<()> {
    let mut w = DelimitedWriter::append(path, '\t')
        .with_context(|| format!("open rules table {}", path.display()))?;
    for rule in rules {
        w.write_row([category.source, category.target, &*escape_control(rule)])?;
    }
    w.flush()
        .with_context(|| format!("write rules table {}", path.display()))
}

pub fn write_results(path: &Path, records: &[ResultRecord]) -> Result<()> {
    let mut w = DelimitedWriter::create(path, '\t')
        .with_context(|| format!("create {}", path.display()))?;
    w.write_row(RESULT_HEADER)?;
    for r in records {
        let rule = escape_control(&r.rule);
        let frequency = r.validation.frequency_cell();
        let row: [&str; 8] = [
            &r.lemma,
            &r.source,
            &rule,
            &r.candidate,
            &r.target,
            &frequency,
            r.validation.tier.code(),
            &r.group,
        ];
        w.write_row(row)?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))
}

pub fn write_derivations(path: &Path, records: &[DerivationRecord]) -> Result<()> {
    let mut w = DelimitedWriter::create(path, '\t')
        .with_context(|| format!("create {}", path.display()))?;
    w.write_row(DERIVATION_HEADER)?;
    for r in records {
        let frequency = r.validation.frequency_cell();
        let row: [&str; 8] = [
            &r.lemma,
            &r.source,
            &r.candidate,
            &r.target,
            &r.explanation,
            &frequency,
            r.validation.tier.code(),
            &r.group,
        ];
        w.write_row(row)?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))
}
