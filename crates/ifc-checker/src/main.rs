// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ifc-checker` command line front end.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ifc_checker::config::split_list;
use ifc_checker::{Checker, CheckerConfig, FailureMode};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ifc-checker", version, about = "Compare and reduce IFC models")]
struct Cli {
    /// Fail on unreadable files instead of falling back to empty results
    #[arg(long, global = true)]
    strict: bool,

    /// Log progress and absorbed errors
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Comma-separated element types kept by `clean`
    #[arg(long, global = true, value_name = "TYPES")]
    whitelist: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Structural similarity of two models
    Structure { a: PathBuf, b: PathBuf },

    /// Property-set similarity of B against the catalog of A
    Properties { a: PathBuf, b: PathBuf },

    /// Entity types present in a model
    Types { file: PathBuf },

    /// Property sets attached to instances of a type
    Psets {
        file: PathBuf,
        #[arg(value_name = "TYPE")]
        entity_type: String,
    },

    /// Property names of a property set
    Props { file: PathBuf, pset: String },

    /// Value of a single property
    Value {
        file: PathBuf,
        #[arg(value_name = "TYPE")]
        entity_type: String,
        pset: String,
        property: String,
    },

    /// Keep one instance of each whitelisted type and write the result
    Clean {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct StructureScore {
    score: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_config(cli: &Cli) -> CheckerConfig {
    let mut config = CheckerConfig::from_env();
    if cli.strict {
        config = config.with_failure_mode(FailureMode::Strict);
    }
    if cli.verbose {
        config = config.with_diagnostics(true);
    }
    if let Some(list) = &cli.whitelist {
        config = config.with_whitelist(split_list(list));
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "info" } else { "warn" })
        }))
        .with_writer(std::io::stderr)
        .init();

    let checker = Checker::new(build_config(&cli));

    match &cli.command {
        Command::Structure { a, b } => {
            let score = checker.compare_files(a, b)?;
            print_json(&StructureScore { score })
        }
        Command::Properties { a, b } => print_json(&checker.compare_properties(a, b)?),
        Command::Types { file } => print_json(&checker.element_types(file)?),
        Command::Psets { file, entity_type } => {
            print_json(&checker.psets_for_type(file, entity_type)?)
        }
        Command::Props { file, pset } => print_json(&checker.properties_in_pset(file, pset)?),
        Command::Value {
            file,
            entity_type,
            pset,
            property,
        } => print_json(&checker.property_value(file, entity_type, pset, property)?),
        Command::Clean { file, output } => {
            let outcome = checker.clean(file)?;
            ifc_checker_parser::write_to(outcome.model(), output)
                .with_context(|| format!("writing {}", output.display()))?;
            print_json(&outcome.summary())
        }
    }
}
