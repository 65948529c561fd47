//! Errors raised while building or running maskers.
//!
//! Configuration-time variants (`InvalidFieldName`, `InvalidMarker`, `Pattern`,
//! `InvalidThreshold`) are returned from constructors and are meant to fail loudly at startup.
//! Runtime variants (`InvalidRange`, `Panicked`) never reach the logging call
//! site: the pipeline converts them into diagnostic text.

use thiserror::Error;

/// Error type shared by every masker and the pipeline.
#[derive(Debug, Error)]
pub enum MaskError {
    /// A configured field name cannot anchor a pattern.
    #[error("invalid field name `{name}`: {reason}")]
    InvalidFieldName {
        /// The rejected name, as configured.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The masked marker would be re-read as part of a value by a later stage.
    #[error("invalid masked marker `{marker}`: {reason}")]
    InvalidMarker {
        /// The rejected marker, as configured.
        marker: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A field pattern failed to compile.
    #[error("failed to compile masking pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The oversized-blob threshold must be at least one character.
    #[error("oversized-blob threshold must be at least 1, got {0}")]
    InvalidThreshold(usize),

    /// A substitution target does not describe a valid span of the buffer.
    #[error("range {start}..={end} is not a valid span of a {len}-byte buffer")]
    InvalidRange {
        /// Inclusive start offset.
        start: usize,
        /// Inclusive end offset.
        end: usize,
        /// Buffer length at substitution time.
        len: usize,
    },

    /// A stage panicked and the panic was caught at its guard.
    #[error("masking stage panicked: {0}")]
    Panicked(String),
}

impl MaskError {
    /// Stable short name of the failure kind, used in diagnostic text.
    pub fn kind(&self) -> &'static str {
        match self {
            MaskError::InvalidFieldName { .. } => "InvalidFieldName",
            MaskError::InvalidMarker { .. } => "InvalidMarker",
            MaskError::Pattern(_) => "Pattern",
            MaskError::InvalidThreshold(_) => "InvalidThreshold",
            MaskError::InvalidRange { .. } => "InvalidRange",
            MaskError::Panicked(_) => "Panicked",
        }
    }
}
