//! Error Types
//!
//! This module defines the error type used throughout the crate.
//!
//! # Overview
//!
//! [`Error`] separates two families of failure:
//! - Data-driven conditions (an incomplete clip set, an unknown role name)
//!   that callers are expected to log and degrade from.
//! - Programmer errors (an out-of-range instance index, a negative speed at
//!   construction) that are surfaced immediately and never clamped.
//!
//! The per-frame `tick` never returns an error for data-driven conditions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use marionette::errors::{Error, Result};
//!
//! fn recolor(buffer: &mut InstancedTransformBuffer) -> Result<()> {
//!     buffer.set_color(0, Color::RED)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// One or more required roles could not be matched against the clip set.
    #[error("Incomplete clip set: missing roles {missing:?} (available clips: {available:?})")]
    IncompleteClipSet {
        /// Roles with no matching clip
        missing: Vec<String>,
        /// Names of every clip that was offered
        available: Vec<String>,
    },

    /// A role name did not parse to one of the canonical roles.
    #[error("Unknown animation role: {0}")]
    UnknownRole(String),

    // ========================================================================
    // Instance Errors
    // ========================================================================
    /// Instance index outside `[0, count)`.
    #[error("Index out of range: {context} (index: {index}, count: {count})")]
    IndexOutOfRange {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
        /// Number of valid slots
        count: usize,
    },

    /// Construction-time parameter rejected (negative speed, zero-sized grid, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The external asset loader rejected the request.
    #[error("Asset load failed for '{url}': {reason}")]
    AssetLoad {
        /// Requested location
        url: String,
        /// Loader-supplied reason
        reason: String,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn out_of_range(context: &'static str, index: usize, count: usize) -> Self {
        Self::IndexOutOfRange {
            context,
            index,
            count,
        }
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
