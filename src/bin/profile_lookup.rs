//! profile-lookup: resolve player names from the command line
//!
//! Usage:
//!   profile-lookup [--config <file.yaml>] <name>...
//!
//! Prints one JSON line per outcome, then a stats line. Ctrl-C cancels the
//! whole lookup.

use anyhow::{bail, Context};
use futures::StreamExt;
use profile_lookup::{BatchProfileResolver, LookupOutcome, LookupSettings};
use serde_json::json;
use std::path::PathBuf;

struct Args {
    config: Option<PathBuf>,
    names: Vec<String>,
}

fn print_usage() {
    println!(
        r#"profile-lookup: batched player profile lookup

USAGE:
    profile-lookup [--config <file.yaml>] <name>...

OPTIONS:
    --config <file>     YAML settings file (resolver + endpoint sections)
    -h, --help          Show this help message
    -V, --version       Show version information

ENVIRONMENT:
    PROFILE_LOOKUP_BASE_URL, PROFILE_LOOKUP_AGENT, PROFILE_LOOKUP_BATCH_SIZE,
    PROFILE_LOOKUP_MAX_ATTEMPTS, PROFILE_LOOKUP_RETRY_DELAY_MS,
    PROFILE_LOOKUP_INTER_BATCH_DELAY_MS, PROFILE_LOOKUP_HTTP_TIMEOUT_SECS,
    PROFILE_LOOKUP_PROXY_URL, RUST_LOG"#
    );
}

fn parse_args(raw: &[String]) -> anyhow::Result<Option<Args>> {
    let mut config = None;
    let mut names = Vec::new();
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("profile-lookup {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            name => names.push(name.to_string()),
        }
    }
    if names.is_empty() {
        print_usage();
        bail!("no names given");
    }
    Ok(Some(Args { config, names }))
}

fn outcome_json(outcome: &LookupOutcome) -> serde_json::Value {
    match outcome {
        LookupOutcome::Resolved(p) => json!({ "status": "resolved", "id": p.id, "name": p.name }),
        LookupOutcome::NotFound(name) => json!({ "status": "not_found", "name": name }),
        LookupOutcome::Failed { name, error } => {
            json!({ "status": "failed", "name": name, "error": error.to_string() })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        return Ok(());
    };

    let settings = match &args.config {
        Some(path) => LookupSettings::from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => LookupSettings::default(),
    }
    .with_env_overrides();

    let resolver = BatchProfileResolver::from_settings(&settings)?;
    let (mut outcomes, handle) = resolver.resolve_stream(&args.names);

    let cancel = handle.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    while let Some(outcome) = outcomes.next().await {
        println!("{}", outcome_json(&outcome));
    }

    let stats = handle.finish().await?;
    println!("{}", serde_json::to_string(&stats)?);
    if stats.cancelled {
        eprintln!("cancelled: {} name(s) left unresolved", stats.unresolved());
    }
    Ok(())
}
