/// Übersicht widget compiler
///
/// Validates a structured widget description, generates the JSX widget
/// script and saves it into the Übersicht widgets folder, asking the
/// operator for another destination when that folder cannot be written.

pub mod codegen;
pub mod driver;
pub mod error;
pub mod persist;
pub mod request;
pub mod styles;
pub mod tools;

pub use codegen::{CodeGenerator, CompiledArtifact};
pub use driver::{CompileOptions, CompileOutput, ToolReply, WidgetCompiler, default_widget_dir};
pub use error::{CompileError, PersistenceError, Result, ToolError, ValidationError};
pub use persist::{DestinationPicker, NoPicker, PersistenceCoordinator, PersistenceOutcome};
pub use request::WidgetRequest;
pub use styles::StyleMapping;
pub use tools::{Tool, ToolOutput, ToolRegistry, ToolSpec, total_length};
