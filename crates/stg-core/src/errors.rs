//! Structured error types shared across STG crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`StgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (labels, paths, attribute names, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for STG analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum StgError {
    /// Structural graph errors (unknown nodes, duplicate labels, empty graphs).
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// A node lacks an attribute required by the caller.
    #[error("missing attribute: {0}")]
    MissingAttribute(ErrorInfo),
    /// An input graph file could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(ErrorInfo),
    /// Output artefacts could not be encoded.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem failures while listing, reading or writing artefacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Figure rendering failures.
    #[error("figure error: {0}")]
    Figure(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl StgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            StgError::Graph(info)
            | StgError::MissingAttribute(info)
            | StgError::Deserialization(info)
            | StgError::Serde(info)
            | StgError::Io(info)
            | StgError::Figure(info) => info,
        }
    }

    /// Returns the error with an additional context entry, keeping its family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        match self {
            StgError::Graph(info) => StgError::Graph(info.with_context(key, value)),
            StgError::MissingAttribute(info) => {
                StgError::MissingAttribute(info.with_context(key, value))
            }
            StgError::Deserialization(info) => {
                StgError::Deserialization(info.with_context(key, value))
            }
            StgError::Serde(info) => StgError::Serde(info.with_context(key, value)),
            StgError::Io(info) => StgError::Io(info.with_context(key, value)),
            StgError::Figure(info) => StgError::Figure(info.with_context(key, value)),
        }
    }

    /// Wraps an I/O failure together with the path that triggered it.
    pub fn io(code: &str, err: &std::io::Error, path: &std::path::Path) -> Self {
        StgError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
