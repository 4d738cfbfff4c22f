#![warn(missing_docs)]
#![crate_name = "jndicheck_rs"]

//! Utility to scan a directory tree for Java archives bundling the Log4j JndiLookup class.

use env_logger::{Builder, Env, Target};
use std::io::Write;
use std::process;
use structopt::StructOpt;

mod cli;
mod error;
mod extractor;
mod log4shell_scanner;
mod report;

#[macro_use]
extern crate log;

/// Get the severity level to used based on the CLI arguments.
/// By default the severity level is info.
/// If the trace argument is passed, the severity level is trace.
/// If the silent argument is passed, the severity level is warn.
fn get_log_severity_level(args: &cli::ScanArgs) -> &str {
    let mut log_level = "info";

    if args.trace {
        log_level = "trace";
    } else if args.silent {
        log_level = "warn";
    }

    log_level
}

/// Initializes log
fn init_log(severity_level: &str) {
    let env = Env::default().filter_or("LOG_LEVEL", severity_level);

    let mut builder = Builder::from_env(env);
    builder.target(Target::Stdout);

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();

        writeln!(
            buf,
            "{}\t{}\t{}",
            timestamp,
            record.level(),
            record.args()
        )
    });

    builder.init();
}

/// Validates the directory, scans it and prints the results
fn run_scan(args: &cli::ScanArgs) {
    if let Err(error) = log4shell_scanner::check_scan_root(&args.dir) {
        error!("{}", error);
        process::exit(1);
    }

    info!("jndicheck-rs scanning {}", args.dir.display());

    let report = log4shell_scanner::scan(args);

    if let Some(scratch_dir) = &report.scratch_dir {
        debug!("Archives were extracted into {}", scratch_dir.display());
    }

    if let Err(error) = report::print_report(&report) {
        error!("Results can´t be printed. Error:{}", error);
        process::exit(1);
    }
}

/// Entry point of the application
fn main() {
    let args = cli::Cli::from_args();

    match args.command {
        cli::Command::Scan(scan_args) => {
            init_log(get_log_severity_level(&scan_args));
            run_scan(&scan_args);
        }
    }
}
