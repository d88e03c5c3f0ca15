#![forbid(unsafe_code)]

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use webpify::{RunOptions, RunOutcome};

mod cli;

fn main() -> ExitCode {
    env_logger::builder()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = cli::WebpifyCli::parse();

    if let Some(completion_generator) = args.completions {
        cli::WebpifyCli::print_completions(completion_generator);
        return ExitCode::SUCCESS;
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancelled);
    let handler = move || {
        if is_repeated_interrupt(&handler_flag) {
            log::warn!("⚠️  Optimization aborted by user");
            std::process::exit(0);
        }
    };
    if let Err(error) = ctrlc::set_handler(handler) {
        log::warn!("Cannot listen for Ctrl-C, an interrupt will stop the program immediately: {}", error);
    }

    let options = RunOptions {
        directory: args.directory.into(),
        cancelled,
    };

    match webpify::run(options) {
        Ok(RunOutcome::Cancelled(_)) => log::warn!("⚠️  Optimization cancelled by user"),
        Ok(RunOutcome::MissingDirectory | RunOutcome::NothingToDo | RunOutcome::Completed(_)) => {}
        Err(error) => log::error!("❌ Error: {:#}", error),
    }

    ExitCode::SUCCESS
}

/// Marks the run as cancelled. Returns `true` if it already was, i.e. the user pressed Ctrl-C again.
fn is_repeated_interrupt(cancelled: &AtomicBool) -> bool {
    cancelled.swap(true, Ordering::SeqCst)
}
