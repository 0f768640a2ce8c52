//! Host configuration.
//!
//! Everything is optional; a missing config file means all defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use widget_compiler::CompileOptions;

const DEFAULT_INSTRUCTIONS: &str = include_str!("../assets/instructions.md");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Instructions handed to the agent alongside the tool list.
    pub instructions_path: Option<PathBuf>,
    /// Overrides the Übersicht widgets folder.
    pub widget_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub strict_styles: bool,
    /// Program and arguments used to ask the operator for a save location.
    pub picker_command: Option<Vec<String>>,
}

impl AgentConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed parsing config {}", path.display()))
    }

    pub fn instructions(&self) -> anyhow::Result<String> {
        match &self.instructions_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed reading instructions {}", path.display())),
            None => Ok(DEFAULT_INSTRUCTIONS.to_string()),
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        let mut options = CompileOptions::new().strict_styles(self.strict_styles);
        if let Some(dir) = &self.widget_dir {
            options = options.widget_dir(dir);
        }
        if let Some(name) = &self.file_name {
            options = options.file_name(name.clone());
        }
        options
    }
}
