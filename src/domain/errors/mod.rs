// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Input media file not found or inaccessible
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A required external tool could not be run
    #[error("Tool unavailable: {tool} ({message})")]
    ToolUnavailable { tool: String, message: String },

    /// Duration could not be determined
    #[error("Probe failed for {}: {message}", path.display())]
    ProbeFailed { path: PathBuf, message: String },

    /// A single sample's frame could not be produced
    #[error("Frame extraction failed at {offset:.2}s: {message}")]
    ExtractionFailed { offset: f64, message: String },

    /// Raster re-encoding failed for one or more frames
    #[error("Frame conversion failed: {0}")]
    ConversionFailed(String),

    /// Fewer (or more) candidates than samples reached the ranking stage
    #[error("Candidate count mismatch: expected {expected}, found {found}")]
    CandidateCountMismatch { expected: usize, found: usize },

    /// An external media command exited unsuccessfully
    #[error("{tool} failed ({status}): {message}")]
    CommandFailed {
        tool: String,
        status: String,
        message: String,
    },

    /// Invalid time format
    #[error("Invalid time format: {0}. Expected seconds, MM:SS(.ms) or HH:MM:SS(.ms)")]
    InvalidTimeFormat(String),

    /// Malformed concat list file
    #[error("Invalid concat list {}: line {line}: {message}", path.display())]
    InvalidConcatList {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Short stage name used in log lines
    pub fn stage(&self) -> &'static str {
        match self {
            DomainError::ProbeFailed { .. } => "probe",
            DomainError::ExtractionFailed { .. } => "extract",
            DomainError::ConversionFailed(_) => "convert",
            DomainError::CandidateCountMismatch { .. } => "rank",
            DomainError::ToolUnavailable { .. } => "toolchain",
            DomainError::CommandFailed { .. } => "command",
            DomainError::Io(_) => "io",
            _ => "input",
        }
    }
}
