//! Error types for Graphedit.
//!
//! All errors in Graphedit are represented by the `GraphEditError` enum.
//! None of them is fatal to the host: every failing operation leaves the
//! graph and its history exactly as they were before the call.

use std::{io::ErrorKind, string::FromUtf8Error};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Graphedit operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum GraphEditError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON import/export, TOML).
    #[error("{0}")]
    Convert(String),

    /// Node lookup or mutation errors.
    #[error("{0}")]
    Node(String),

    /// Edge creation errors (referential violations).
    #[error("{0}")]
    Edge(String),

    /// Autosave backend errors.
    #[error("{0}")]
    Store(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),
}

impl From<GraphEditError> for String {
    fn from(val: GraphEditError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for GraphEditError {
    fn from(error: std::io::Error) -> Self {
        GraphEditError::IoError(error.to_string())
    }
}

impl From<GraphEditError> for std::io::Error {
    fn from(val: GraphEditError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<FromUtf8Error> for GraphEditError {
    fn from(_: FromUtf8Error) -> Self {
        GraphEditError::Convert("Error with utf-8 string convert".to_string())
    }
}

impl From<serde_json::Error> for GraphEditError {
    fn from(error: serde_json::Error) -> Self {
        GraphEditError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for GraphEditError {
    fn from(error: toml::de::Error) -> Self {
        GraphEditError::Config(error.to_string())
    }
}

impl From<globset::Error> for GraphEditError {
    fn from(error: globset::Error) -> Self {
        GraphEditError::Config(error.to_string())
    }
}
