//! `scenaria` binary: compiles a source file into a JSON system model.

use std::{process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};
use miette::GraphicalReportHandler;

use scenaria::ScenariaError;
use scenaria_cli::{Args, error_adapter::reports};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match scenaria_cli::run(&args) {
        Ok(()) => {
            info!(input = args.input.as_str(); "Compiled model");
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_reports(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
}

/// Compile errors go to stderr regardless of the log level.
fn print_reports(err: &ScenariaError) {
    let handler = GraphicalReportHandler::new();
    let reports = reports(err);
    error!(count = reports.len(); "Compilation failed");

    for report in &reports {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, report) {
            Ok(()) => eprintln!("{rendered}"),
            Err(_) => eprintln!("{report}"),
        }
    }
}
