// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docscan.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all docscan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Re-crop preconditions --
    #[error("a re-crop is already in progress for this session")]
    AlreadyInProgress,

    #[error("no original image captured for this session")]
    MissingSource,

    #[error("no document corners captured for this session")]
    MissingGeometry,

    // -- Transform service --
    #[error("perspective transform service unavailable: {0}")]
    ServiceUnavailable(Unavailable),

    #[error("perspective transform failed: {0}")]
    ServiceFailed(String),

    // -- Session --
    #[error("nothing to commit: no corrected image in this session")]
    NothingToCommit,

    // -- Image references --
    #[error("invalid image reference: {0}")]
    InvalidImage(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether this error is one of the re-crop precondition failures,
    /// reported before the transform service is ever invoked.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInProgress | Self::MissingSource | Self::MissingGeometry
        )
    }
}

/// Why the transform service could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// The backend is not registered, or refused the call.
    #[error("{0}")]
    Absent(String),
    /// The call did not finish within the configured bound.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl Unavailable {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

impl From<String> for Unavailable {
    fn from(reason: String) -> Self {
        Self::Absent(reason)
    }
}

impl From<&str> for Unavailable {
    fn from(reason: &str) -> Self {
        Self::Absent(reason.to_owned())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
