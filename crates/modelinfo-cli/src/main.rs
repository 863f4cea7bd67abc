//! modelinfo - notification metadata record tool
//!
//! Builds, renders, encodes and decodes descriptor-backed notification
//! records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modelinfo_config::ModelInfoConfig;
use modelinfo_core::{
    codec::{RecordCodec, SerialForm},
    info::ModelNotificationInfo,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod document;

use document::{RecordDocument, descriptor_from_args};

/// modelinfo - notification metadata record tool
#[derive(Parser, Debug)]
#[command(name = "modelinfo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to ./modelinfo.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Persisted layout to write (current, legacy or 1.0); overrides config
    #[arg(long)]
    serial_form: Option<SerialForm>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a record from arguments and print it
    Show {
        /// Record name
        #[arg(long)]
        name: String,

        /// Human-readable description
        #[arg(long, default_value = "")]
        description: String,

        /// Notification type (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,

        /// Descriptor field as name=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    /// Encode a JSON record document into a persisted record
    Encode {
        /// JSON record document
        #[arg(short, long)]
        input: PathBuf,

        /// Destination for the encoded record
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode a persisted record and print it
    Decode {
        /// Encoded record
        #[arg(short, long)]
        input: PathBuf,

        /// Print as a JSON record document
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // the layout is fixed here for the rest of the process
    let config = ModelInfoConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let mut codec = config.codec();
    if let Some(form) = cli.serial_form {
        codec = RecordCodec::new(form).with_max_bytes(codec.max_bytes());
    }
    info!(form = %codec.form(), max_bytes = codec.max_bytes(), "record codec ready");

    match cli.command {
        Commands::Show {
            name,
            description,
            types,
            fields,
        } => {
            let descriptor = descriptor_from_args(&fields)?;
            let record = ModelNotificationInfo::with_descriptor(types, name, description, descriptor)?;
            println!("{record}");
        }

        Commands::Encode { input, output } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let record = RecordDocument::from_json(&text)?.into_record()?;
            let bytes = codec.encode(&record)?;

            std::fs::write(&output, &bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "wrote {} bytes ({} layout) to {}",
                bytes.len(),
                codec.form(),
                output.display()
            );
        }

        Commands::Decode { input, json } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let record = codec.decode(&bytes)?;

            if json {
                println!("{}", RecordDocument::from_record(&record).to_json()?);
            } else {
                println!("{record}");
            }
        }
    }

    Ok(())
}
