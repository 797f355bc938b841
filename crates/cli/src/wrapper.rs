// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One wrapper run: resolve configuration, run the child, report its code.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::WrapperError;
use crate::logging;
use golden_capture::sink::DirectorySink;
use golden_capture::ProcessRunner;

/// Run the command named on the command line and return the exit code the
/// wrapper should finish with.
///
/// No child is spawned unless configuration succeeds.
pub async fn run(cli: Cli) -> Result<i32, WrapperError> {
    let invocation = cli.invocation()?;
    let config = Config::from_env()?;
    config.prepare()?;
    logging::init(&config.captured_dir, config.log_filter.as_deref());

    tracing::info!(invocation = %invocation, "starting child");

    let sink = DirectorySink::new(&config.captured_dir);
    let mut runner = ProcessRunner::new(config.runner.clone());
    let outcome = runner
        .run(
            &invocation,
            tokio::io::stdin(),
            tokio::io::stdout(),
            tokio::io::stderr(),
            &sink,
        )
        .await
        .inspect_err(|e| tracing::error!(invocation = %invocation, error = %e, "run failed"))?;

    tracing::info!(
        fingerprint = %outcome.fingerprint,
        exit = %outcome.exit,
        stdin_bytes = outcome.counts.stdin,
        stdout_bytes = outcome.counts.stdout,
        stderr_bytes = outcome.counts.stderr,
        capture_complete = outcome.capture_complete,
        "child finished"
    );
    if !outcome.capture_complete {
        tracing::warn!(fingerprint = %outcome.fingerprint, "capture is incomplete");
    }

    Ok(outcome.exit_code())
}
