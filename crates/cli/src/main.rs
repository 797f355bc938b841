// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden wrapper binary entry point.

use clap::Parser;

use golden::cli::Cli;
use golden::error::exit_codes;
use golden::output_diagnostic::print_error;
use golden::wrapper;

#[tokio::main]
async fn main() {
    let code = match Cli::try_parse() {
        Ok(cli) => match wrapper::run(cli).await {
            Ok(code) => code,
            Err(e) => {
                print_error(&e);
                e.exit_code()
            }
        },
        Err(e) => {
            print_error(e.kind());
            exit_codes::CONFIG
        }
    };
    std::process::exit(code);
}
