/// Compiler driver that orchestrates the compilation pipeline

use std::path::{Path, PathBuf};

use crate::codegen::{CodeGenerator, CompiledArtifact};
use crate::error::{CompileError, PersistenceError, Result, ValidationError};
use crate::persist::{DestinationPicker, PersistenceCoordinator, PersistenceOutcome};
use crate::request::WidgetRequest;
use crate::styles::StyleMapping;

/// Default file name for a generated widget
pub const DEFAULT_FILE_NAME: &str = "index.jsx";

/// The Übersicht widgets folder under the platform's application data directory.
pub fn default_widget_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.data_dir().join("Übersicht").join("widgets"))
}

/// Options for compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory the widget is written to directly
    pub widget_dir: Option<PathBuf>,
    /// File name used for the direct write and offered to the picker
    pub file_name: String,
    /// Fail when a declared style variable is never used by the markup
    pub strict_styles: bool,
    /// Whether to print debug output
    pub verbose: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self {
            widget_dir: default_widget_dir(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            strict_styles: false,
            verbose: false,
        }
    }

    pub fn widget_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.widget_dir = Some(dir.into());
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn strict_styles(mut self, strict: bool) -> Self {
        self.strict_styles = strict;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Compilation output structure
#[derive(Debug)]
pub struct CompileOutput {
    /// The generated widget script
    pub artifact: CompiledArtifact,
    /// Where the script ended up, if anywhere
    pub saved_to: Option<PathBuf>,
}

/// The single line reported back to the calling agent, plus the structured
/// error behind it when the compile did not succeed.
#[derive(Debug)]
pub struct ToolReply {
    pub status: String,
    pub error: Option<CompileError>,
}

impl ToolReply {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The widget compiler
///
/// Holds no mutable state, so one instance can serve concurrent requests.
pub struct WidgetCompiler {
    options: CompileOptions,
}

impl WidgetCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Validate, parse styles and generate, without touching the disk.
    pub fn generate(&self, request: &WidgetRequest) -> Result<CompiledArtifact> {
        request.validate()?;

        let styles = StyleMapping::parse(&request.style_variables_raw);
        if self.options.strict_styles {
            if let Some(name) = styles.first_unreferenced(&request.markup) {
                return Err(ValidationError::UnreferencedStyleVariable(name.to_string()).into());
            }
        }

        if self.options.verbose {
            tracing::info!(
                "Compiling widget: command={:?} refresh={}ms styles={}",
                request.command,
                request.refresh_interval_ms,
                styles.len()
            );
        }

        Ok(CodeGenerator::new().generate(request, &styles))
    }

    /// Run the full pipeline: generate, then persist.
    ///
    /// Operator cancellation is not an error: the output carries the artifact
    /// with `saved_to == None`.
    pub fn compile(
        &self,
        request: &WidgetRequest,
        picker: &dyn DestinationPicker,
    ) -> Result<CompileOutput> {
        let artifact = self.generate(request)?;

        let coordinator = PersistenceCoordinator::new(
            self.options.widget_dir.as_deref(),
            &self.options.file_name,
            picker,
        );

        let saved_to = match coordinator.persist(&artifact) {
            PersistenceOutcome::Saved(path) => Some(path),
            PersistenceOutcome::CancelledByOperator => None,
            PersistenceOutcome::Failed(e) => return Err(e.into()),
        };

        Ok(CompileOutput { artifact, saved_to })
    }

    /// Run the pipeline and reduce the outcome to a single status line.
    pub fn run(&self, request: &WidgetRequest, picker: &dyn DestinationPicker) -> ToolReply {
        match self.compile(request, picker) {
            Ok(CompileOutput {
                saved_to: Some(path),
                ..
            }) => ToolReply {
                status: saved_status(&path),
                error: None,
            },
            Ok(CompileOutput { saved_to: None, .. }) => ToolReply {
                status: format!(
                    "Widget JSX script generated but not saved: {}",
                    PersistenceError::FallbackCancelled
                ),
                error: None,
            },
            Err(e) => {
                tracing::error!("Widget compilation failed: {}", e);
                ToolReply {
                    status: failure_status(&e),
                    error: Some(e),
                }
            }
        }
    }
}

fn saved_status(path: &Path) -> String {
    format!("Widget JSX script generated and saved to {}", path.display())
}

/// Status line for a failed compile
pub fn failure_status(error: &CompileError) -> String {
    format!("Widget generation failed: {}", error)
}
