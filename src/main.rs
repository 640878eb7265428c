use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

mod advisory;
mod config;
mod error;
mod fusion;
mod interactions;
mod knowledge;
mod matching;
mod output;
mod pipeline;
mod profile;
mod scoring;
mod tags;

use crate::config::Config;
use crate::pipeline::Predictor;
use crate::profile::PatientProfile;

#[derive(Parser)]
#[command(name = "adr_fusion")]
#[command(about = "Personalized adverse drug effect and interaction prediction")]
struct Cli {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict side effects of a drug for a patient
    Predict {
        /// Drug name (free text)
        #[arg(short, long)]
        drug: String,

        /// Patient profile JSON file
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Directory for report files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Knowledge base only; skip the advisory source
        #[arg(long)]
        no_ai: bool,
    },
    /// Check a medication list for dangerous interactions
    Interactions {
        #[arg(short, long = "medication", required = true, num_args = 1..)]
        medications: Vec<String>,

        #[arg(long)]
        no_ai: bool,
    },
    /// List drugs known to the knowledge base
    Drugs,
    /// Show knowledge-base records for the best-matching drug
    Lookup {
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("failed to load configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };

    let predictor = Predictor::from_config(&config)
        .with_context(|| format!("failed to load knowledge base {:?}", config.knowledge_base))?;

    match cli.command {
        Command::Predict { drug, profile, output, no_ai } => {
            let profile = match profile {
                Some(path) => PatientProfile::from_file(&path)
                    .with_context(|| format!("failed to load patient profile from {:?}", path))?,
                None => PatientProfile::default(),
            };

            let report = predictor.predict(&drug, &profile, !no_ai);
            println!("{}", serde_json::to_string_pretty(&report)?);

            if let Some(dir) = output {
                output::save_report(&report, &dir)
                    .with_context(|| format!("failed to write reports to {:?}", dir))?;
            }
        }
        Command::Interactions { medications, no_ai } => {
            let report = predictor.check_interactions(&medications, !no_ai);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Drugs => {
            let names = predictor.drug_names();
            println!("{} drugs available", names.len());
            for name in names {
                println!("{}", name);
            }
        }
        Command::Lookup { name } => {
            let found = predictor.lookup(&name);
            match found.matched_name {
                Some(matched) => {
                    println!("{} ({} records)", matched, found.records.len());
                    for record in &found.records {
                        println!(
                            "  {:<30} {:<10} {:<10} {}",
                            record.side_effect,
                            record.frequency.to_string(),
                            record.severity.to_string(),
                            record.risk_factors.as_deref().unwrap_or("")
                        );
                    }
                }
                None => anyhow::bail!("'{}' is not in the knowledge base", name),
            }
        }
    }

    Ok(())
}
