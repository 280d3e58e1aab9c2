mod display;
mod generate;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uace_core::{SchoolSettings, parse_subjects, score};
use uace_store::{RecordFile, Verification};

#[derive(Parser)]
#[command(name = "uace", version, about = "UACE result parsing, testimonial data, and verification")]
struct Cli {
    /// School settings TOML file.
    #[arg(long, env = "UACE_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// Examination year (overrides the settings file).
    #[arg(long, env = "UACE_YEAR", global = true)]
    year: Option<String>,

    /// School name (overrides the settings file).
    #[arg(long, env = "UACE_SCHOOL", global = true)]
    school: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and score a single result line.
    Parse {
        /// e.g. "GEP-5 [1-5] ENT-O [1-9,2-8,3-5]"
        line: String,
    },
    /// Build records for every row of a JSON export of the results sheet.
    Generate {
        /// JSON array of rows keyed by the sheet's column headers.
        input: PathBuf,
        /// Where to write the records file.
        #[arg(long, default_value = "records.json")]
        out: PathBuf,
        /// Also write one verification payload per candidate here.
        #[arg(long)]
        payload_dir: Option<PathBuf>,
    },
    /// Look up a record identifier in a generated records file.
    Verify {
        records: PathBuf,
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("uace v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match &cli.command {
        Command::Parse { line } => {
            let subjects = parse_subjects(line);
            let summary = score(&subjects);
            display::print_parsed_line(&subjects, &summary);
        }
        Command::Generate {
            input,
            out,
            payload_dir,
        } => {
            let settings = resolve_settings(&cli)?;
            let stats = generate::run_generate(input, out, payload_dir.as_deref(), &settings)?;
            eprintln!(
                "  Generated {} records from {} rows ({} skipped) in {:.2}s → {}",
                stats.records,
                stats.total_rows,
                stats.skipped_rows,
                stats.elapsed_secs,
                out.display()
            );
        }
        Command::Verify { records, id } => {
            let store = RecordFile::read(records)
                .and_then(RecordFile::into_store)
                .with_context(|| format!("loading records from {}", records.display()))?;
            match store.verify(id) {
                Verification::Valid(record) => display::print_record_card(id, &record),
                Verification::Invalid => println!("Invalid Certificate"),
            }
        }
    }

    Ok(())
}

/// Settings file (or defaults), then command-line overrides.
fn resolve_settings(cli: &Cli) -> anyhow::Result<SchoolSettings> {
    let mut settings = match &cli.settings {
        Some(path) => SchoolSettings::load(path)?,
        None => SchoolSettings::default(),
    };
    settings.merge(SchoolSettings {
        school_name: cli.school.clone().unwrap_or_default(),
        year: cli.year.clone().unwrap_or_default(),
        head_teacher_title: String::new(),
        ..Default::default()
    });
    Ok(settings)
}
