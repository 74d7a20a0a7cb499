//! sideload - run host binaries inside running containers

use clap::Parser;
use sideload_cli::cmd;
use sideload_cli::{Cli, Commands};
use sideload_core::{AttachMode, ToolError};
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit code for failures before the remote command ran (Docker's own
/// convention for tool-side failure).
const FAILURE_EXIT: i32 = 125;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run {
            container,
            executable,
            args,
            resolution,
            interactive,
            tty,
        } => cmd::run::run(
            &container,
            &executable,
            &args,
            &resolution,
            AttachMode {
                stdin: interactive,
                tty,
            },
        ),
        Commands::Plan {
            executable,
            resolution,
            json,
        } => cmd::plan::plan(&executable, &resolution, json).map(|()| 0),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(0)
        }
    };

    match outcome {
        Ok(status) => process::exit(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            let status = err
                .downcast_ref::<ToolError>()
                .and_then(ToolError::exit_status)
                .unwrap_or(FAILURE_EXIT);
            process::exit(status);
        }
    }
}

/// Initialize logging; `RUST_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
