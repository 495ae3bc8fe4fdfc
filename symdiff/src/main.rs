use std::io;
use std::process::ExitCode;

use clap::Parser as _;
use tracing::error;
use tracing_subscriber::EnvFilter;

use symdiff::prelude::*;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let config = Config::parse();
    let repl = Repl::new(config.clone());

    let result = match config.expression.as_deref() {
        Some(expression) => repl.run_once(expression, &mut io::stdout()),
        None => repl.run().map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "session aborted");
            eprintln!("symdiff: {}", e);
            ExitCode::FAILURE
        }
    }
}
