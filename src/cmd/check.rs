//! `bomgate check`: import an SPDX file and report violations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use bomgate::domain::Distribution;
use bomgate::licenses::{catalog, Violation};
use bomgate::repository::InMemoryStore;
use bomgate::service::{ProjectService, ProjectSummary};

#[derive(Serialize)]
struct Report {
    project: ProjectSummary,
    violations: Vec<Violation>,
}

pub fn run(
    file: &Path,
    distribution: Distribution,
    title: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("cannot open {}", file.display()))?,
    );

    let mut service = ProjectService::new(InMemoryStore::new(), catalog::builtin());
    let id = service.create_project(title);
    service.set_distribution(id, distribution)?;
    service
        .import_spdx(id, reader)
        .with_context(|| format!("cannot import {}", file.display()))?;

    let report = Report {
        project: service.project(id)?,
        violations: service.violations(id)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.violations.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_report(report: &Report) {
    let title = report.project.title.as_deref().unwrap_or("(untitled)");
    println!(
        "{} ({}, {} dependencies)",
        title.bold(),
        report.project.distribution,
        report.project.dependencies.len()
    );
    println!();

    if report.violations.is_empty() {
        println!("{}", "No license violations found.".green());
        return;
    }

    for violation in &report.violations {
        println!(
            "{} {}: {}",
            "✗".red(),
            violation.title().bold(),
            violation.detail()
        );
    }
    println!();
    println!(
        "{}",
        format!("{} violation(s) found.", report.violations.len()).red()
    );
}
