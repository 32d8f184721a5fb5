//! The main entry point for the `replacer` command-line application.
//!
//! This file parses command-line arguments, sets up logging and hands the
//! resolved configuration to the `replacer` library.

use replacer::cli;
use replacer::{logging, report_error, replacer::run_replace};
use std::io;
use std::process;

fn main() {
    let config = cli::parse_args().into_run_config();
    logging::init(config.debug);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = run_replace(&config, &mut out) {
        let code = report_error(&err, config.debug, &mut out, &mut io::stderr());
        process::exit(code);
    }
}
