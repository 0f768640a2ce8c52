/// Code generation module
///
/// Turns a validated widget request and its style mapping into an Übersicht
/// JSX widget script. Generation is purely textual: the markup and
/// positioning are inlined verbatim and never inspected.

use std::fmt;

use crate::request::WidgetRequest;
use crate::styles::StyleMapping;

const HEADER: &str = "\
import { css } from 'uebersicht'; // Optional, use when Emotion's css functions are needed.
import { styled } from 'uebersicht'; // Optional, use when Emotion styled functions are needed.
";

const NO_STYLES_PLACEHOLDER: &str = "// No CSS classes defined";

/// A generated widget script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact(String);

impl CompiledArtifact {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CompiledArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSX widget script generator
pub struct CodeGenerator {
    /// Output buffer
    output: String,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Generate the widget script for a request.
    ///
    /// Identical inputs always produce byte-identical output.
    pub fn generate(&mut self, request: &WidgetRequest, styles: &StyleMapping) -> CompiledArtifact {
        self.output.push_str(HEADER);
        self.output.push('\n');

        self.output.push_str("/* ----- Übersicht exports ---- */\n\n");
        self.generate_exports(request);
        self.output.push('\n');

        self.output.push_str("/* ----- local stuff ---- */\n\n");
        self.generate_style_variables(styles);

        tracing::debug!(
            bytes = self.output.len(),
            styles = styles.len(),
            "generated widget script"
        );

        CompiledArtifact(std::mem::take(&mut self.output))
    }

    fn generate_exports(&mut self, request: &WidgetRequest) {
        self.output.push_str("export const command = \"");
        self.output.push_str(&escape_string_literal(&request.command));
        self.output.push_str("\"\n");

        self.output.push_str("export const refreshFrequency = ");
        self.output.push_str(&request.refresh_interval_ms.to_string());
        self.output.push_str("\n\n");

        self.output.push_str("export const render = ({ data_in }) => (\n    ");
        self.output.push_str(&request.markup);
        self.output.push_str("\n);\n\n");

        self.output.push_str("export const className = css`\n");
        self.output.push_str(&request.positioning);
        self.output.push_str("\n`;\n");
    }

    /// One `const` per style variable, in mapping order.
    fn generate_style_variables(&mut self, styles: &StyleMapping) {
        if styles.is_empty() {
            self.output.push_str(NO_STYLES_PLACEHOLDER);
            return;
        }

        let declarations: Vec<String> = styles
            .iter()
            .map(|(name, body)| format!("const {} = css`{}`;", name, body))
            .collect();
        self.output.push_str(&declarations.join("\n"));
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a widget script in one call.
pub fn generate(request: &WidgetRequest, styles: &StyleMapping) -> CompiledArtifact {
    CodeGenerator::new().generate(request, styles)
}

/// Escape text for embedding inside a double-quoted JavaScript string literal.
pub fn escape_string_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(command: &str) -> WidgetRequest {
        WidgetRequest::new(command, 1000, "top: 10px;", "<div>{data}</div>", "{}")
    }

    #[test]
    fn test_escape_string_literal() {
        assert_eq!(escape_string_literal("plain"), "plain");
        assert_eq!(escape_string_literal(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_string_literal(r"a\b"), r"a\\b");
        assert_eq!(escape_string_literal("a\nb"), r"a\nb");
    }

    #[test]
    fn test_exact_shape_without_styles() {
        let artifact = generate(&request("whoami"), &StyleMapping::default());
        let expected = "\
import { css } from 'uebersicht'; // Optional, use when Emotion's css functions are needed.
import { styled } from 'uebersicht'; // Optional, use when Emotion styled functions are needed.

/* ----- Übersicht exports ---- */

export const command = \"whoami\"
export const refreshFrequency = 1000

export const render = ({ data_in }) => (
    <div>{data}</div>
);

export const className = css`
top: 10px;
`;

/* ----- local stuff ---- */

// No CSS classes defined";
        assert_eq!(artifact.as_str(), expected);
    }

    #[test]
    fn test_style_declarations_follow_mapping_order() {
        let styles = StyleMapping::parse(r#"{"b": "color: red;", "a": "margin: 0;"}"#);
        let artifact = generate(&request("date"), &styles);
        assert!(artifact
            .as_str()
            .ends_with("const b = css`color: red;`;\nconst a = css`margin: 0;`;"));
        assert!(!artifact.as_str().contains(NO_STYLES_PLACEHOLDER));
    }

    #[test]
    fn test_generator_buffer_is_reset_between_runs() {
        let mut generator = CodeGenerator::new();
        let first = generator.generate(&request("date"), &StyleMapping::default());
        let second = generator.generate(&request("date"), &StyleMapping::default());
        assert_eq!(first, second);
    }
}
