/*!
 * Error types for the subseek application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when converting an SRT time code into seconds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeCodeError {
    /// The code does not have the HH:MM:SS[,mmm] shape
    #[error("time code '{code}' is not in HH:MM:SS,mmm form")]
    Malformed {
        /// The offending time code as found in the input
        code: String,
    },

    /// A colon-separated component is not a non-negative number
    #[error("time code '{code}' has a non-numeric component '{component}'")]
    NonNumeric {
        /// The offending time code as found in the input
        code: String,
        /// The component that failed to parse
        component: String,
    },
}

/// Errors that can occur while performing an HTTP fetch
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed before the request was made
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    /// The request could not be sent or the connection was lost
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response arrived but its body could not be read as text
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Why a single acquisition attempt was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The fetch itself failed before a response arrived
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The body arrived but does not look like SubRip text
    #[error("response is not SubRip content")]
    NotSubtitle,

    /// The body looked like SubRip text but parsed to zero records
    #[error("SubRip content parsed to zero records")]
    NoRecords,
}

/// One fully-described acquisition attempt: where we fetched and why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// The candidate URL this attempt targeted
    pub url: String,
    /// The relay prefix the request went through, if any
    pub relay: Option<String>,
    /// Why the attempt did not produce a track
    pub reason: AttemptFailure,
}

impl std::fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.relay {
            Some(relay) => write!(f, "{} (via {}): {}", self.url, relay, self.reason),
            None => write!(f, "{} (direct): {}", self.url, self.reason),
        }
    }
}

/// Errors that can occur while acquiring a subtitle track
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The request was rejected before any attempt was made
    #[error("invalid acquisition request: {0}")]
    InvalidRequest(String),

    /// Every candidate URL was tried, directly and through every relay
    #[error("no usable subtitles after {} attempts", attempts.len())]
    Exhausted {
        /// Every attempt made, in order, with its failure reason
        attempts: Vec<AttemptRecord>,
    },

    /// The caller raised the cancellation flag between attempts
    #[error("acquisition cancelled after {} attempts", attempts.len())]
    Cancelled {
        /// The attempts completed before cancellation
        attempts: Vec<AttemptRecord>,
    },
}

impl AcquireError {
    /// The attempt log carried by this error, empty for invalid requests
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            AcquireError::InvalidRequest(_) => &[],
            AcquireError::Exhausted { attempts } | AcquireError::Cancelled { attempts } => attempts,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration file or CLI overrides
    #[error("Config error: {0}")]
    Config(String),

    /// Error from the fetch layer
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from subtitle acquisition
    #[error("Acquisition error: {0}")]
    Acquire(#[from] AcquireError),

    /// Error from time code handling
    #[error("Time code error: {0}")]
    TimeCode(#[from] TimeCodeError),

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
