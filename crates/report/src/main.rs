// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! golden-report entry point.

use clap::Parser;
use std::io::{IsTerminal, Write};
use tracing_subscriber::EnvFilter;

use golden_report::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("GOLDEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let mut stdout = std::io::stdout().lock();
    let code = match golden_report::run(cli, &mut stdout) {
        Ok(code) => code,
        Err(e) => {
            let _ = stdout.flush();
            eprintln!("Error: {}", e);
            2
        }
    };
    let _ = stdout.flush();
    std::process::exit(code);
}
