mod report;
mod scenario;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use ftlog::{appender::FileAppender, LevelFilter, LoggerGuard};

use report::render_summary;
use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON scenario file; a hanging net is relaxed when omitted.
    #[arg(short('s'), long)]
    scenario: Option<PathBuf>,

    /// Number of relaxation steps, overriding the scenario.
    #[arg(short('n'), long)]
    steps: Option<usize>,

    /// Print the final snapshot as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stderr.
    #[arg(short('l'), long)]
    log_file: Option<PathBuf>,
}

/// Configures the logger, writing to `log_file` or stderr.
fn configure_logger(log_file: Option<&Path>) -> Result<LoggerGuard, String> {
    let builder = ftlog::Builder::new().max_log_level(LevelFilter::Info);
    let builder = match log_file {
        Some(path) => builder.root(FileAppender::new(path)),
        None => builder,
    };
    builder.try_init().map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Route library logs to stderr or the requested file. The guard flushes
    // the background logging thread when it is dropped at the end of `main`.
    let _guard = configure_logger(args.log_file.as_deref())?;

    // Load the model to relax. Without a scenario file we fall back to a
    // square net hung from its corners, the classic setting for funicular
    // form-finding (see https://en.wikipedia.org/wiki/Catenary).
    let scenario = match &args.scenario {
        Some(path) => {
            ftlog::info!("Reading scenario from {path:?}");
            Scenario::from_path(path)?
        }
        None => Scenario::hanging_net(5),
    };

    // Run the explicit dynamic relaxation for the requested number of steps.
    // The method is described at
    // https://en.wikipedia.org/wiki/Dynamic_relaxation.
    let steps = args.steps.unwrap_or(scenario.steps);
    let snapshot = scenario.run(steps)?;

    // Either dump the full snapshot for other tools or print a short report
    // for the CLI user.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render_summary(&snapshot));
    }

    Ok(())
}
