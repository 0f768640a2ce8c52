//! Line-delimited JSON messages exchanged with the calling agent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use widget_compiler::{ToolError, ToolOutput, ToolSpec};

/// A request from the agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Incoming {
    ListTools {
        #[serde(default)]
        id: Value,
    },
    CallTool {
        #[serde(default)]
        id: Value,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&ToolError> for ErrorBody {
    fn from(e: &ToolError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// A reply to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outgoing {
    Tools {
        id: Value,
        instructions: String,
        tools: Vec<ToolSpec>,
    },
    Result {
        id: Value,
        output: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorBody>,
    },
}

impl Outgoing {
    pub fn tool_result(id: Value, output: ToolOutput) -> Self {
        Outgoing::Result {
            id,
            error: output.error.as_ref().map(ErrorBody::from),
            output: output.text,
        }
    }

    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Outgoing::Result {
            id: Value::Null,
            output: format!("Malformed request: {}", reason),
            error: Some(ErrorBody {
                kind: "malformed_request".to_string(),
                message: reason.to_string(),
            }),
        }
    }

    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
