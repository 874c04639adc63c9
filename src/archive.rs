// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! In-memory zip assembly for split results

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::pipeline::NamedArtifact;

/// Download filename offered for the result archive
pub const ARCHIVE_FILENAME: &str = "care_blocks.zip";

/// Custom error types for archive assembly
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to add archive entry `{name}`: {source}")]
    Entry {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to write archive entry `{name}`: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to finalize archive: {0}")]
    Finalize(#[from] zip::result::ZipError),
}

/// Assemble artifacts into a deflate-compressed zip archive.
///
/// Entries appear in the order given, which callers rely on matching
/// the reading order of the sheet. An empty artifact list yields a
/// valid empty archive.
pub fn build_archive(artifacts: &[NamedArtifact]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        writer
            .start_file(artifact.filename.as_str(), options)
            .map_err(|source| ArchiveError::Entry {
                name: artifact.filename.clone(),
                source,
            })?;
        writer
            .write_all(&artifact.bytes)
            .map_err(|source| ArchiveError::Write {
                name: artifact.filename.clone(),
                source,
            })?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
