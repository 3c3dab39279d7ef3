//! CLI entry point and command handlers for bomgate.

mod cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use bomgate::domain::Distribution;

#[derive(Parser)]
#[command(name = "bomgate")]
#[command(version)]
#[command(about = "License compliance checks for software bills of materials", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an SPDX tag-value file and report license violations
    Check {
        /// SPDX tag-value file to check
        file: PathBuf,
        /// How the product reaches its audience: standalone or saas
        #[arg(long, default_value = "standalone")]
        distribution: Distribution,
        /// Project title to use when the document has none
        #[arg(long)]
        title: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in license catalog
    Licenses {
        /// List the demandable terms instead of the licenses
        #[arg(long)]
        terms: bool,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Check {
            file,
            distribution,
            title,
            json,
        } => cmd::check::run(&file, distribution, title.as_deref(), json),
        Commands::Licenses { terms, json } => {
            cmd::licenses::run(terms, json).map(|()| ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}
