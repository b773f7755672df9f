/*!
 * Error types for the resubs application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised by the timing engine
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimingError {
    /// An interval whose start lies after its end
    #[error("Malformed interval: start {start_ms}ms > end {end_ms}ms")]
    MalformedInterval {
        /// Interval start in milliseconds
        start_ms: u64,
        /// Interval end in milliseconds
        end_ms: u64,
    },

    /// A generated-track timestamp beyond the trimmed stream length
    #[error("Timestamp {timestamp_ms}ms lies beyond the trimmed stream ({trimmed_len_ms}ms)")]
    OutOfRangeTimestamp {
        /// Offending timestamp in milliseconds
        timestamp_ms: u64,
        /// Total trimmed stream length in milliseconds
        trimmed_len_ms: u64,
    },
}

/// Errors that can occur during audio extraction
#[derive(Error, Debug)]
pub enum AudioError {
    /// A required external tool is not installed or not on PATH
    #[error("{0} is not installed or not on PATH. Please retry after installing it")]
    MissingTool(String),

    /// Error when probing the media file fails
    #[error("Failed to probe media: {0}")]
    ProbeFailed(String),

    /// Error when cutting or concatenating audio fails
    #[error("Audio extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The whisper CLI is not installed or not on PATH
    #[error("{0} is not installed or not on PATH. Please retry after installing it")]
    MissingTool(String),

    /// The transcription command exited with an error
    #[error("Transcription command failed: {0}")]
    CommandFailed(String),

    /// The transcription produced no usable subtitle output
    #[error("Transcription produced no output: {0}")]
    EmptyOutput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the timing engine
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Error from audio extraction
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
