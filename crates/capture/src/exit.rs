// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! How the child terminated, and the exit code the wrapper reports for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::ExitStatus;

/// Exit code reported when the child's status cannot be determined.
pub const UNKNOWN_EXIT_CODE: i32 = 1;

/// Child termination outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExitDescriptor {
    /// Normal termination with an exit code.
    Exited { code: i32 },
    /// Terminated by a signal.
    Signaled { signal: i32 },
    /// No portable exit information available.
    Unknown,
}

impl ExitDescriptor {
    /// The wrapper's own exit code for this outcome.
    ///
    /// Signals map to `128 + signal`, the value a shell reports for the
    /// unwrapped command.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited { code } => *code,
            Self::Signaled { signal } => 128 + signal,
            Self::Unknown => UNKNOWN_EXIT_CODE,
        }
    }

    /// Code column of the history summary line (`?` when unknown).
    pub fn summary_code(&self) -> String {
        match self {
            Self::Unknown => "?".to_string(),
            other => other.exit_code().to_string(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Exited { code: 0 })
    }
}

impl From<ExitStatus> for ExitDescriptor {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled { signal };
            }
        }
        Self::Unknown
    }
}

impl fmt::Display for ExitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited { code } => write!(f, "exited with code {}", code),
            Self::Signaled { signal } => write!(f, "terminated by signal {}", signal),
            Self::Unknown => f.write_str("exit status unknown"),
        }
    }
}

#[cfg(test)]
#[path = "exit_tests.rs"]
mod tests;
