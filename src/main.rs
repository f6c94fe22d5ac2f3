//! proven-msg - Command line tool to build a message from a JSON-LD document.
//!
//! Usage:
//!   proven-msg --model model/ --input message.json
//!   proven-msg --model model/ --input query.json --domain grid --source scada

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use proven_message::{MessageModel, NoInference, ProvenMessage};

#[derive(Parser, Debug)]
#[command(name = "proven-msg")]
#[command(about = "Build a typed message from a semantic JSON-LD document")]
struct Args {
    /// Model directory containing the registry file and model resources
    #[arg(short, long)]
    model: String,

    /// Message document file (JSON-LD without its context)
    #[arg(short, long)]
    input: String,

    /// Message name
    #[arg(long)]
    name: Option<String>,

    /// Message domain
    #[arg(long)]
    domain: Option<String>,

    /// Message source
    #[arg(long)]
    source: Option<String>,

    /// Keywords (comma-separated)
    #[arg(long)]
    keywords: Option<String>,

    /// Mark the message transient
    #[arg(long)]
    transient: bool,

    /// Mark the message static
    #[arg(long = "static")]
    is_static: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            let mut cause = err.source();
            while let Some(source) = cause {
                error!("  caused by: {source}");
                cause = source.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let model = MessageModel::load(&args.model)?;
    let text = fs::read_to_string(&args.input)?;

    let mut builder = ProvenMessage::message(text)
        .is_transient(args.transient)
        .is_static(args.is_static);
    if let Some(name) = args.name {
        builder = builder.name(name);
    }
    if let Some(domain) = args.domain {
        builder = builder.domain(domain);
    }
    if let Some(source) = args.source {
        builder = builder.source(source);
    }
    if let Some(keywords) = args.keywords {
        builder = builder.keywords(keywords.split(',').map(str::trim));
    }

    let message = builder.build(&model, &NoInference)?;
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}
