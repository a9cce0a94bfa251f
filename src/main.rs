use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use survival_records::{
    config::PartialConfig,
    io::{read_clinical_csv, write_diagnostics_json, write_survival_csv},
    BuildOutput, BuilderConfig, CohortSummary, SurvivalRecordBuilder, UnknownStatusPolicy,
};

#[derive(Debug, Parser)]
#[command(name = "survival-records", version, about = "Build time-to-event tables from clinical exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// derive the survival table and write it out
    Build(BuildArgs),
    /// derive the table, print summary + diagnostics, fail if rows were skipped
    Check(InputArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnknownArg {
    Censor,
    Event,
    Exclude,
}

impl From<UnknownArg> for UnknownStatusPolicy {
    fn from(arg: UnknownArg) -> Self {
        match arg {
            UnknownArg::Censor => Self::Censor,
            UnknownArg::Event => Self::Event,
            UnknownArg::Exclude => Self::Exclude,
        }
    }
}

#[derive(Debug, Args)]
struct InputArgs {
    #[arg(long, help = "Clinical export (delimited text)")]
    input: PathBuf,

    #[arg(long, help = "JSON builder config (columns, vocabulary, date format)")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "How subjects with unknown status map to the event indicator")]
    unknown_status: Option<UnknownArg>,

    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, help = "Write the diagnostics report as JSON")]
    diagnostics: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Leave flagged rows out of the written table")]
    drop_flagged: bool,
}

fn load_config(args: &InputArgs) -> Result<BuilderConfig> {
    let partial = match &args.config {
        Some(path) => PartialConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PartialConfig::default(),
    };

    if args.unknown_status.is_none() && partial.unknown_status.is_none() {
        bail!("--unknown-status (or unknown_status in --config) is required");
    }

    Ok(partial.resolve(args.unknown_status.map(Into::into))?)
}

fn run_builder(args: &InputArgs) -> Result<BuildOutput> {
    if !args.delimiter.is_ascii() {
        bail!("--delimiter must be a single ASCII character");
    }

    let config = load_config(args)?;
    let records = read_clinical_csv(&args.input, &config.columns, args.delimiter as u8)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let builder = SurvivalRecordBuilder::new(config)?;
    Ok(builder.build(&records)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            let out = run_builder(&args.input)?;

            let table = if args.drop_flagged {
                out.table.valid_only()
            } else {
                out.table
            };

            write_survival_csv(&args.output, &table)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            tracing::info!(path = %args.output.display(), subjects = table.n_subjects(), "survival table written");

            if let Some(path) = &args.diagnostics {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                write_diagnostics_json(BufWriter::new(file), &out.diagnostics)?;
                tracing::info!(path = %path.display(), "diagnostics written");
            }
        }
        Commands::Check(args) => {
            let out = run_builder(&args)?;

            match CohortSummary::compute(&out.table) {
                Ok(summary) => summary.print(),
                Err(e) => tracing::warn!("no summary: {}", e),
            }
            println!();
            out.diagnostics.print();

            if out.diagnostics.n_skipped() > 0 {
                bail!("{} row(s) could not be turned into survival records", out.diagnostics.n_skipped());
            }
        }
    }

    Ok(())
}
