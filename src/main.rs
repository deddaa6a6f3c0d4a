//! microk8s - addon and status wrappers

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use microk8s_wrappers::cli::Cli;
use microk8s_wrappers::core::output;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match microk8s_wrappers::run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            output::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn",
        1 => "warn,microk8s_wrappers=info",
        2 => "info,microk8s_wrappers=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
