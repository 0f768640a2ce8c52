/// Error types for the widget compiler

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

/// A broken field on an incoming widget request.
///
/// Only the first violation found is ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Bash command cannot be empty")]
    EmptyCommand,

    #[error("Refresh frequency must be greater than 0")]
    InvalidRefreshFrequency,

    #[error("Markup content cannot be empty")]
    EmptyMarkup,

    #[error("CSS positioning cannot be empty")]
    EmptyPositioning,

    #[error("Style variable '{0}' is declared but never referenced in the markup")]
    UnreferencedStyleVariable(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Could not write widget to {}: {source}", path.display())]
    DirectWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File save operation cancelled by user")]
    FallbackCancelled,

    #[error("Error writing file {}: {source}", path.display())]
    FallbackWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination picker failed: {0}")]
    Picker(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CompileError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        CompileError::Unexpected(message.into())
    }

    /// Stable identifier for programmatic callers
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Validation(ValidationError::EmptyCommand) => "empty_command",
            CompileError::Validation(ValidationError::InvalidRefreshFrequency) => {
                "invalid_refresh_frequency"
            }
            CompileError::Validation(ValidationError::EmptyMarkup) => "empty_markup",
            CompileError::Validation(ValidationError::EmptyPositioning) => "empty_positioning",
            CompileError::Validation(ValidationError::UnreferencedStyleVariable(_)) => {
                "unreferenced_style_variable"
            }
            CompileError::Persistence(PersistenceError::DirectWriteFailed { .. }) => {
                "direct_write_failed"
            }
            CompileError::Persistence(PersistenceError::FallbackCancelled) => "fallback_cancelled",
            CompileError::Persistence(PersistenceError::FallbackWriteFailed { .. }) => {
                "fallback_write_failed"
            }
            CompileError::Persistence(PersistenceError::Picker(_)) => "picker_failed",
            CompileError::Unexpected(_) => "unexpected",
        }
    }
}

/// Failures raised by the tool registry before or while dispatching a call.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::InvalidArguments { .. } => "invalid_arguments",
            ToolError::Compile(e) => e.kind(),
        }
    }
}
