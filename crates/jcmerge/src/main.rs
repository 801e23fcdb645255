use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{ArgAction, Parser};
use jcmerge::{
    config::Config,
    curves::Curve,
    error::is_configuration_error,
    orchestrator::{Merger, OutputTarget},
    types::LineEnding,
};
use log::{LevelFilter, debug, error};

/// Package a multi-file JavaCard library into a single `.java` file
///
/// Every class of the library becomes a static nested class of one wrapper
/// class, imports are merged, and lock handling is stripped unless
/// `--keep-locks` is given.
#[derive(Parser, Debug)]
#[command(name = "jcmerge", version, about)]
struct Cli {
    /// Root directory of the library checkout
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Keep lock/unlock calls and the object locker class
    #[arg(short, long)]
    keep_locks: bool,

    /// Strip lock handling even if a configuration file keeps it
    #[arg(long, conflicts_with = "keep_locks")]
    strip_locks: bool,

    /// Curves to include, in output order [default: SecP256k1]
    #[arg(short, long, num_args = 1.., value_enum)]
    curves: Option<Vec<Curve>>,

    /// Package declaration of the merged file [default: your_package]
    #[arg(short, long)]
    package: Option<String>,

    /// Output file [default: jcmathlib.java]
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Write the merged file to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Additional configuration file, applied after jcmerge.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Line terminator of the merged file [default: lf]
    #[arg(long, value_enum)]
    line_ending: Option<LineEnding>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Build the configuration; flags given on the command line win
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.dir, self.config.as_deref())?;
        if self.keep_locks {
            config.keep_locks = true;
        } else if self.strip_locks {
            config.keep_locks = false;
        }
        if let Some(curves) = &self.curves {
            config.curves.clone_from(curves);
        }
        if let Some(package) = &self.package {
            config.package.clone_from(package);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(line_ending) = self.line_ending {
            config.line_ending = line_ending;
        }
        Ok(config)
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    // RUST_LOG refines or overrides the -v level
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    debug!("Resolved configuration: {config:?}");

    let target = if cli.stdout {
        OutputTarget::Stdout
    } else {
        OutputTarget::File(config.output.clone())
    };

    let outcome = Merger::new(config)?.run(&target)?;
    if outcome.empty_bodies > 0 {
        debug!(
            "{} of {} files were empty after filtering",
            outcome.empty_bodies,
            outcome.files.len()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if is_configuration_error(&err) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
