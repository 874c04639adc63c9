// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration resolved once at startup

use std::env;
use std::path::PathBuf;

/// Default location of the tesseract binary
pub const DEFAULT_TESSERACT_CMD: &str = "/usr/bin/tesseract";

/// Immutable service configuration.
///
/// Resolved from the environment once in `main` and handed to the
/// components that need it. Nothing reads the environment after
/// startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the tesseract binary used for recognition passes
    pub tesseract_cmd: PathBuf,
}

impl ServiceConfig {
    /// Resolve configuration from the environment.
    ///
    /// `TESSERACT_CMD` overrides the binary location; everything else
    /// uses defaults.
    pub fn from_env() -> Self {
        let tesseract_cmd = env::var("TESSERACT_CMD")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TESSERACT_CMD));

        Self { tesseract_cmd }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from(DEFAULT_TESSERACT_CMD),
        }
    }
}
