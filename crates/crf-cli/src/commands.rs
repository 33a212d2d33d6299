//! Command implementations for the checker CLI.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use crf_cli::outcome::{
    CheckOutcome, GroupReport, check_submission, read_patients, read_submission, review_group,
};
use crf_validate::{FormKind, ValidatorConfig};

use crate::cli::{CheckArgs, GroupArgs};
use crate::summary::apply_table_style;

/// Defaults plus environment overrides, or the given TOML file.
pub fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => {
            ValidatorConfig::load(path).with_context(|| format!("load {}", path.display()))
        }
        None => ValidatorConfig::default()
            .with_env_overrides()
            .context("apply environment overrides"),
    }
}

pub fn run_forms() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Form", "Label", "Clinical review", "Description"]);
    apply_table_style(&mut table);
    for form in FormKind::ALL {
        let review = if form.requires_clinical_review() {
            "required"
        } else {
            "-"
        };
        table.add_row(vec![form.as_str(), form.label(), review, form.description()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs, config: &ValidatorConfig) -> Result<CheckOutcome> {
    let span = info_span!("check", file = %args.file.display());
    let _guard = span.enter();
    let submission = read_submission(&args.file)?;
    let outcome = check_submission(&submission, config)?;
    info!(form = %outcome.form, accepted = outcome.accepted, "submission checked");
    Ok(outcome)
}

pub fn run_group(args: &GroupArgs, config: &ValidatorConfig) -> Result<GroupReport> {
    let span = info_span!("group", file = %args.file.display());
    let _guard = span.enter();
    let patients = read_patients(&args.file)?;
    let report = review_group(&patients, &config.group);
    info!(
        patients = report.patients,
        passed = report.passed(),
        "group reviewed"
    );
    Ok(report)
}
