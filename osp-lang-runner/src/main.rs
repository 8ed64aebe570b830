mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use osp_lang_interpreter::evaluator::EvaluatorConfig;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to run. Starts the REPL when omitted.
    path: Option<PathBuf>,
    /// Nested function calls allowed before evaluation fails
    #[arg(long, default_value_t = EvaluatorConfig::default().max_call_depth)]
    max_call_depth: usize,
    /// More log output, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = EvaluatorConfig {
        max_call_depth: cli.max_call_depth,
    };

    match cli.path {
        None => repl::start(config),
        Some(path) => runner::execute_file(&path, config),
    }
}
