use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use surfboard::graph::{self, GRAPHS};
use surfboard::{document, Document, Schema, SignalData, Source};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "surfboard",
    version,
    about = "Munin plugin for Motorola SURFboard signal data"
)]
struct Cli {
    /// `config`, `test`, or the page source when no mode is given.
    mode: Option<String>,

    /// URL or file path of the signal data page.
    #[arg(env = "SURFBOARD_URL")]
    source: Option<String>,

    /// JSON schema replacing the built-in page layout.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Fetch timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Values,
    Config,
    Test,
}

/// A first argument that is not a mode is the source.
fn resolve(cli: &Cli) -> (Mode, Source) {
    let (mode, source) = match cli.mode.as_deref() {
        Some("config") => (Mode::Config, cli.source.as_deref()),
        Some("test") => (Mode::Test, cli.source.as_deref()),
        Some(source) => (Mode::Values, Some(source)),
        None => (Mode::Values, cli.source.as_deref()),
    };
    let source = source.map(Source::parse).unwrap_or_default();
    (mode, source)
}

fn load(source: &Source, timeout: Duration, schema: Schema) -> SignalData {
    let agent = document::agent(timeout);
    match Document::load(source, &agent) {
        Ok(document) => SignalData::new(document, schema),
        Err(error) => {
            tracing::warn!(%error, "status page unavailable, reporting unknown values");
            SignalData::unavailable(schema)
        }
    }
}

/// Raw field lists and assembled records of every table.
fn test_report(data: &SignalData) -> Result<String> {
    let mut out = String::new();
    let mut columns = BTreeMap::new();

    for table in data.schema().tables() {
        writeln!(out, "{}:", table.name)?;
        for field in table.field_names() {
            let values: Vec<String> = data
                .fields(&table.name, field)?
                .iter()
                .map(|value| value.as_ref().map_or("None".to_string(), ToString::to_string))
                .collect();
            writeln!(out, "\t{field}: {values:?}")?;
        }
        columns.insert(table.name.as_str(), data.columns(&table.name)?);
    }

    out.push_str(&serde_json::to_string_pretty(&columns)?);
    Ok(out)
}

fn run(cli: &Cli) -> Result<String> {
    let (mode, source) = resolve(cli);
    let schema = match &cli.schema {
        Some(path) => Schema::from_path(path)
            .with_context(|| format!("failed to load schema '{}'", path.display()))?,
        None => Schema::surfboard(),
    };

    let data = load(&source, Duration::from_secs(cli.timeout), schema);
    let output = match mode {
        Mode::Values => graph::values(&data, GRAPHS)?,
        Mode::Config => graph::config(&data, GRAPHS)?,
        Mode::Test => test_report(&data)?,
    };
    Ok(output)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("surfboard=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
