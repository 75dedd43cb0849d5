//! bookbits - Apple Books highlight exporter
//!
//! Pick a book and a format from a terminal menu; the book's highlights and
//! notes are written to `<title>.csv` or `<title>.md`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use bookbits::{Config, TerminalSelector};

/// bookbits - export Apple Books highlights and notes
#[derive(Parser)]
#[command(name = "bookbits")]
#[command(author = "Misha")]
#[command(version = "0.1.0")]
#[command(about = "Export Apple Books highlights to CSV or Markdown", long_about = None)]
struct Cli {
    /// Annotation database to read instead of the Apple Books default
    #[arg(long, value_name = "PATH")]
    annotation_db: Option<PathBuf>,

    /// Library database to read instead of the Apple Books default
    #[arg(long, value_name = "PATH")]
    library_db: Option<PathBuf>,

    /// Directory to write the export into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            annotation_db: cli.annotation_db,
            library_db: cli.library_db,
            output_dir: cli.output_dir,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Logging disabled: {e:#}");
    }

    let config = Config::from(cli);
    let mut selector = TerminalSelector::new();

    match bookbits::run(&config, &mut selector) {
        Ok(path) => {
            println!("Annotations exported to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("Export failed: {:?}", e);
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Compact stderr logging; quiet unless asked so the menus stay clean
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
