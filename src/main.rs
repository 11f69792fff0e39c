use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use phagomarkers::prelude::*;
use std::fs::File;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "phagomarkers",
    version,
    about = "Presence/absence matrix of phagotrophy markers across annotated genomes"
)]
struct Args {
    /// Directory holding one `.tsv` annotation table per species
    #[arg(long = "input-dir", env = "PHAGO_INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory the matrix is written to
    #[arg(long = "output-dir", env = "PHAGO_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// File name of the matrix inside the output directory
    #[arg(long = "output-name", default_value = "presence_absence.tsv")]
    output_name: String,

    /// Tab separated `name`/`pattern` table replacing the built-in markers
    #[arg(long = "markers")]
    markers: Option<PathBuf>,

    /// Abort the run on the first unreadable annotation table
    #[arg(long = "strict")]
    strict: bool,

    /// Set logging level
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let registry = load_registry(&args)?;
    info!("Looking for {} markers: {}", registry.len(), registry.names().join(", "));

    if !args.input_dir.is_dir() {
        bail!("Input directory not found: {}", args.input_dir.display());
    }

    let policy = if args.strict {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };
    let reader = TsvReaderBuilder::new(&args.input_dir).build();
    let mut sink = TsvFileSink::new(args.output_dir.join(&args.output_name));

    let report = run(
        &DirectoryLister::new(&args.input_dir),
        &reader,
        &registry,
        &mut sink,
        policy,
    )
    .with_context(|| format!("Scanning {} failed", args.input_dir.display()))?;

    info!(
        "{} species in {}, {} other file(s) ignored",
        report.matrix.columns().len(),
        sink.path().display(),
        report.skipped.len()
    );
    for failure in &report.failed {
        warn!("{} is missing from the matrix: {}", failure.file, failure.error);
    }
    Ok(())
}

fn load_registry(args: &Args) -> Result<MarkerRegistry> {
    match &args.markers {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Could not open marker table {}", path.display()))?;
            let registry = MarkerRegistry::from_tsv(file, &path.to_string_lossy())?;
            if registry.is_empty() {
                bail!("Marker table {} defines no markers", path.display());
            }
            Ok(registry)
        }
        None => Ok(MarkerRegistry::phagotrophy()?),
    }
}

/// Logs to stderr with a timestamp, level and target on each line
fn setup_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.init();
}
