// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The command line handed to the child.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Program name followed by its arguments.
///
/// Immutable once constructed; used both to launch the child and to seed
/// the fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Invocation(Vec<String>);

impl Invocation {
    /// Build an invocation from the program and its arguments.
    ///
    /// Returns `None` when `argv` is empty.
    pub fn new<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            None
        } else {
            Some(Self(argv))
        }
    }

    pub fn program(&self) -> &str {
        &self.0[0]
    }

    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.0
    }

    /// Space-joined form with surrounding whitespace trimmed.
    ///
    /// This is the text hashed into the fingerprint and written to the
    /// record's `cmd` file.
    pub fn text(&self) -> String {
        self.0.join(" ").trim().to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
