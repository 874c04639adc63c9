// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Recognition engine backed by the system `tesseract` binary
//!
//! Each recognition pass stages the image as a temporary PNG, invokes
//! the configured binary with the pass options and captures stdout.
//! Running out of process keeps the service independent of any
//! particular tesseract build and lets slow passes be cancelled.

use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use image::{GrayImage, ImageFormat};
use tokio::process::Command;
use tracing::debug;

use super::engine::{OcrEngine, OcrError, RecognizeOptions};

/// Upper bound on a single recognition pass
pub const OCR_TIMEOUT: Duration = Duration::from_secs(30);

/// OCR engine that shells out to a tesseract binary
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    /// Path to the tesseract binary
    command: PathBuf,
    /// Per-pass timeout
    timeout: Duration,
}

impl TesseractEngine {
    /// Create an engine around the given tesseract binary
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            timeout: OCR_TIMEOUT,
        }
    }

    /// Override the per-pass timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-pass timeout currently in effect
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Path of the binary this engine invokes
    pub fn command(&self) -> &PathBuf {
        &self.command
    }

    /// Check whether the configured binary can be executed.
    ///
    /// Runs `<command> --version` and reports success. Used at startup
    /// so a missing binary surfaces in the health report instead of on
    /// the first upload.
    pub async fn probe(&self) -> bool {
        let result = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) => status.success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        image: &GrayImage,
        options: &RecognizeOptions,
    ) -> Result<String, OcrError> {
        // Stage the image as a PNG the binary can read
        let mut encoded = Cursor::new(Vec::new());
        image.write_to(&mut encoded, ImageFormat::Png)?;

        let staged = tempfile::Builder::new()
            .prefix("careloom-ocr-")
            .suffix(".png")
            .tempfile()?;
        tokio::fs::write(staged.path(), encoded.into_inner()).await?;

        let lang = options.lang_arg();
        debug!(
            "Running OCR pass: lang={} psm={} oem={}",
            lang,
            options.segmentation.psm(),
            options.engine_mode.oem()
        );

        let invocation = Command::new(&self.command)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&lang)
            .arg("--psm")
            .arg(options.segmentation.psm().to_string())
            .arg("--oem")
            .arg(options.engine_mode.oem().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))?
            .map_err(|source| OcrError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        Ok(text)
    }
}
