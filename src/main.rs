use std::io;
use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .quiet(false)
        .verbosity(log_max_level)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
    {
        eprintln!("fastalen: cannot initialize logging: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_log(if cli.verbose { 3 } else { 1 });

    let stdout = io::stdout();
    let mut conn_out = BufWriter::new(stdout.lock());

    match fastalen::report::report_path(&cli.input_file, &mut conn_out) {
        Ok(count) => {
            debug!("reported {} records", count);
            ExitCode::SUCCESS
        },
        Err(e) if e.is_broken_pipe() => {
            debug!("stdout closed, stopping");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
