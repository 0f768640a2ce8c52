//! Destination picker backed by an external program.
//!
//! The configured program is run with `{name}`, `{ext}` and `{dir}` replaced
//! in its arguments. It prints the chosen path on stdout; no output or a
//! non-zero exit means the operator cancelled.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use widget_compiler::{DestinationPicker, NoPicker};

#[derive(Debug, Clone)]
pub struct CommandPicker {
    program: String,
    args: Vec<String>,
}

impl CommandPicker {
    /// Build from `[program, args...]`. Returns `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn expand(&self, default_name: &str, extension: &str, dir: Option<&Path>) -> Vec<String> {
        let dir = dir.map(|d| d.display().to_string()).unwrap_or_default();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{name}", default_name)
                    .replace("{ext}", extension)
                    .replace("{dir}", &dir)
            })
            .collect()
    }
}

impl DestinationPicker for CommandPicker {
    fn prompt_for_destination(
        &self,
        default_name: &str,
        extension: &str,
        initial_directory: Option<&Path>,
    ) -> io::Result<Option<PathBuf>> {
        let args = self.expand(default_name, extension, initial_directory);
        tracing::info!("Asking operator for a destination via {}", self.program);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;

        if !output.status.success() {
            tracing::debug!("picker exited with {}", output.status);
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from))
    }
}

/// The picker for a host configuration; declines when none is configured.
pub fn from_config(picker_command: Option<&[String]>) -> Arc<dyn DestinationPicker> {
    match picker_command.and_then(CommandPicker::from_argv) {
        Some(picker) => Arc::new(picker),
        None => Arc::new(NoPicker),
    }
}
