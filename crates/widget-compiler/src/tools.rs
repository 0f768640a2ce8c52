/// Named tools exposed to the calling agent
///
/// Each tool takes structured JSON arguments and answers with a single line
/// of text. The registry is assembled once at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::driver::{failure_status, WidgetCompiler};
use crate::error::ToolError;
use crate::persist::DestinationPicker;
use crate::request::WidgetRequest;

pub const WIDGET_TOOL_NAME: &str = "OutputUbersichtWidget";
pub const TOTAL_LENGTH_TOOL_NAME: &str = "TotalLengthOfStrings";

/// Description of a tool for the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

pub trait Tool: Send + Sync {
    /// Tool name (used in agent function calling)
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema for the arguments
    fn parameters_schema(&self) -> Value;

    fn call(&self, arguments: Value) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Result of dispatching a call through the registry
#[derive(Debug)]
pub struct ToolOutput {
    /// The line handed back to the agent, failures included
    pub text: String,
    pub error: Option<ToolError>,
}

impl ToolOutput {
    /// Fold a failed call into the line reported for it.
    pub fn failed(tool: &str, error: ToolError) -> Self {
        let text = match &error {
            ToolError::Compile(inner) => failure_status(inner),
            other => other.to_string(),
        };
        tracing::warn!(tool, "{}", text);
        ToolOutput {
            text,
            error: Some(error),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Compiles a widget description and saves the script.
pub struct WidgetTool {
    compiler: Arc<WidgetCompiler>,
    picker: Arc<dyn DestinationPicker>,
}

impl WidgetTool {
    pub fn new(compiler: Arc<WidgetCompiler>, picker: Arc<dyn DestinationPicker>) -> Self {
        Self { compiler, picker }
    }
}

impl Tool for WidgetTool {
    fn name(&self) -> &str {
        WIDGET_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Generates an Übersicht widget from its properties, saves it to the Übersicht widgets folder and returns a confirmation message."
    }

    fn parameters_schema(&self) -> Value {
        schemars::schema_for!(WidgetRequest).to_value()
    }

    fn call(&self, arguments: Value) -> Result<String, ToolError> {
        let request: WidgetRequest = parse_arguments(self.name(), arguments)?;
        let reply = self.compiler.run(&request, self.picker.as_ref());
        match reply.error {
            None => Ok(reply.status),
            Some(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TotalLengthArgs {
    /// An array of strings to calculate the total length of.
    pub strings: Vec<String>,
}

/// Sum of the character counts of `strings`.
pub fn total_length<I, S>(strings: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings.into_iter().map(|s| s.as_ref().chars().count()).sum()
}

pub struct TotalLengthTool;

impl Tool for TotalLengthTool {
    fn name(&self) -> &str {
        TOTAL_LENGTH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Calculates the sum of all the lengths of all the strings in the input array and returns the total."
    }

    fn parameters_schema(&self) -> Value {
        schemars::schema_for!(TotalLengthArgs).to_value()
    }

    fn call(&self, arguments: Value) -> Result<String, ToolError> {
        let args: TotalLengthArgs = parse_arguments(self.name(), arguments)?;
        let total = total_length(&args.strings);
        tracing::debug!(count = args.strings.len(), total, "total length computed");
        Ok(format!("Total length of all strings: {}", total))
    }
}

/// Static name → tool table
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry every host exposes: the widget compiler and the length sum.
    pub fn with_default_tools(
        compiler: Arc<WidgetCompiler>,
        picker: Arc<dyn DestinationPicker>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(WidgetTool::new(compiler, picker));
        registry.register(TotalLengthTool);
        registry
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Registered tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    pub fn call(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.call(arguments)
    }

    /// Call a tool and fold any failure into its text line.
    pub fn dispatch(&self, name: &str, arguments: Value) -> ToolOutput {
        match self.call(name, arguments) {
            Ok(text) => ToolOutput { text, error: None },
            Err(e) => ToolOutput::failed(name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::CompileOptions;
    use crate::error::CompileError;
    use crate::persist::NoPicker;
    use serde_json::json;

    fn registry(dir: &std::path::Path) -> ToolRegistry {
        let compiler = Arc::new(WidgetCompiler::new(CompileOptions::new().widget_dir(dir)));
        ToolRegistry::with_default_tools(compiler, Arc::new(NoPicker))
    }

    #[test]
    fn test_total_length() {
        assert_eq!(total_length(["hello", "world"]), 10);
        assert_eq!(total_length(Vec::<String>::new()), 0);
        assert_eq!(total_length(["Übersicht"]), 9);
    }

    #[test]
    fn test_tool_names_sorted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let registry = registry(tmp.path());
        assert_eq!(
            registry.tool_names(),
            vec![WIDGET_TOOL_NAME, TOTAL_LENGTH_TOOL_NAME]
        );
    }

    #[test]
    fn test_widget_schema_uses_request_fields() {
        let tmp = tempfile::TempDir::new().unwrap();
        let registry = registry(tmp.path());
        let spec = registry.get(WIDGET_TOOL_NAME).unwrap().spec();
        let properties = spec.parameters["properties"].as_object().unwrap();
        for field in ["command", "refreshIntervalMs", "positioning", "markup", "styleVariablesRaw"] {
            assert!(properties.contains_key(field), "missing {}", field);
        }
    }

    #[test]
    fn test_dispatch_total_length() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = registry(tmp.path())
            .dispatch(TOTAL_LENGTH_TOOL_NAME, json!({ "strings": ["hello", "world"] }));
        assert_eq!(output.text, "Total length of all strings: 10");
        assert!(output.error.is_none());

        let output = registry(tmp.path()).dispatch(TOTAL_LENGTH_TOOL_NAME, json!({ "strings": [] }));
        assert_eq!(output.text, "Total length of all strings: 0");
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = registry(tmp.path()).dispatch("ToolB", json!({}));
        assert_eq!(output.text, "Unknown tool: ToolB");
        assert_eq!(output.error.map(|e| e.kind()), Some("unknown_tool"));
    }

    #[test]
    fn test_dispatch_invalid_arguments() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = registry(tmp.path()).dispatch(WIDGET_TOOL_NAME, json!({ "command": "date" }));
        assert!(output.text.starts_with("Invalid arguments for OutputUbersichtWidget"));
        assert_eq!(output.error.map(|e| e.kind()), Some("invalid_arguments"));
    }

    #[test]
    fn test_failed_output_for_unexpected_error() {
        let output = ToolOutput::failed(
            TOTAL_LENGTH_TOOL_NAME,
            CompileError::unexpected("worker lost").into(),
        );
        assert_eq!(output.text, "Widget generation failed: Unexpected error: worker lost");
        assert_eq!(output.error.map(|e| e.kind()), Some("unexpected"));
    }

    #[test]
    fn test_dispatch_widget_saves_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = registry(tmp.path()).dispatch(
            WIDGET_TOOL_NAME,
            json!({
                "command": "whoami",
                "refreshIntervalMs": 1000,
                "positioning": "position: fixed; top: 50%; left: 50%;",
                "markup": "<div>{data}</div>",
                "styleVariablesRaw": "{}"
            }),
        );
        assert!(output.error.is_none(), "{}", output.text);
        assert!(output.text.starts_with("Widget JSX script generated and saved to "));
        assert!(tmp.path().join("index.jsx").exists());
    }

    #[test]
    fn test_dispatch_widget_validation_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = registry(tmp.path()).dispatch(
            WIDGET_TOOL_NAME,
            json!({
                "command": "whoami",
                "refreshIntervalMs": 0,
                "positioning": "top: 0;",
                "markup": "<div/>",
                "styleVariablesRaw": "{}"
            }),
        );
        assert_eq!(
            output.text,
            "Widget generation failed: Refresh frequency must be greater than 0"
        );
        assert!(!tmp.path().join("index.jsx").exists());
    }
}
