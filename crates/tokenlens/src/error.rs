//! Error types for the inspector runtime.
//!
//! Very little in this crate is allowed to fail loudly: per-rule,
//! per-stylesheet and per-variable problems degrade to "not found" by
//! contract. What remains fallible is the filesystem edge (loading and
//! writing stylesheet workspaces) and serialization of the session store.

use thiserror::Error;

/// Errors surfaced by the inspector's I/O edges.
#[derive(Error, Debug)]
pub enum TokenLensError {
    /// An I/O error occurred while reading or writing stylesheet files.
    #[error("I/O error on stylesheet workspace")]
    Io(#[from] std::io::Error),

    /// Session-store contents could not be serialized.
    #[error("session store serialization failed")]
    Store(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TokenLensError>;
