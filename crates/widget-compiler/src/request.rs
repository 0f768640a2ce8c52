/// Widget requests and argument validation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The structured description of a widget, as supplied by the calling agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WidgetRequest {
    /// A bash command whose output the widget displays.
    pub command: String,

    /// The widget's refresh frequency in milliseconds. Must be greater than 0.
    pub refresh_interval_ms: i64,

    /// CSS positioning declarations for the widget root, either fixed and
    /// centered or absolutely offset from a screen edge.
    pub positioning: String,

    /// JSX body of the widget with a single root element. Elements reference
    /// style variables with `className={nameStyle}` and the command output
    /// with `{data}`.
    pub markup: String,

    /// JSON object mapping style-variable names (no hyphens) to CSS bodies,
    /// e.g. `{"titleStyle": "font-weight: bold;"}`. Use "{}" when no styles
    /// are needed.
    #[serde(default)]
    pub style_variables_raw: String,
}

impl WidgetRequest {
    pub fn new(
        command: impl Into<String>,
        refresh_interval_ms: i64,
        positioning: impl Into<String>,
        markup: impl Into<String>,
        style_variables_raw: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            refresh_interval_ms,
            positioning: positioning.into(),
            markup: markup.into(),
            style_variables_raw: style_variables_raw.into(),
        }
    }

    /// Check required fields in a fixed order and report the first violation:
    /// command, refresh interval, markup, positioning.
    pub fn validate(&self) -> Result<&Self, ValidationError> {
        if self.command.is_empty() {
            return Err(ValidationError::EmptyCommand);
        }
        if self.refresh_interval_ms <= 0 {
            return Err(ValidationError::InvalidRefreshFrequency);
        }
        if self.markup.is_empty() {
            return Err(ValidationError::EmptyMarkup);
        }
        if self.positioning.is_empty() {
            return Err(ValidationError::EmptyPositioning);
        }

        tracing::debug!(
            command = %self.command,
            refresh_ms = self.refresh_interval_ms,
            "widget request validated"
        );
        Ok(self)
    }
}
