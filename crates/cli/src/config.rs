// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wrapper configuration, resolved once from the environment.

use crate::env;
use crate::error::ConfigError;
use golden_capture::RunnerConfig;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the capture store.
    pub captured_dir: PathBuf,
    /// Filter directive for the wrapper log, if overridden.
    pub log_filter: Option<String>,
    pub runner: RunnerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let captured_dir = env::captured_dir().ok_or(ConfigError::MissingCapturedDir)?;
        Ok(Self {
            captured_dir,
            log_filter: env::log_filter(),
            runner: RunnerConfig::default(),
        })
    }

    /// Create the capture root if it does not exist yet.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.captured_dir).map_err(|source| ConfigError::CreateDir {
            path: self.captured_dir.clone(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
