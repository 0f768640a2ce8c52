/// Widget persistence
///
/// A compiled widget is first written straight into the Übersicht widgets
/// folder. If that fails for any reason the operator is asked for another
/// destination through a [`DestinationPicker`].

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::codegen::CompiledArtifact;
use crate::error::PersistenceError;

/// Asks the operator where a widget should be saved.
///
/// Implementations may block until the operator answers.
pub trait DestinationPicker: Send + Sync {
    /// Returns the chosen path, or `None` when the operator declines.
    fn prompt_for_destination(
        &self,
        default_name: &str,
        extension: &str,
        initial_directory: Option<&Path>,
    ) -> io::Result<Option<PathBuf>>;
}

/// Picker for environments without an operator. Always declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPicker;

impl DestinationPicker for NoPicker {
    fn prompt_for_destination(
        &self,
        _default_name: &str,
        _extension: &str,
        _initial_directory: Option<&Path>,
    ) -> io::Result<Option<PathBuf>> {
        tracing::warn!("No destination picker available, treating fallback as cancelled");
        Ok(None)
    }
}

#[derive(Debug)]
pub enum PersistenceOutcome {
    Saved(PathBuf),
    CancelledByOperator,
    Failed(PersistenceError),
}

/// Writes artifacts to the widgets folder, falling back to the picker.
pub struct PersistenceCoordinator<'a> {
    widget_dir: Option<&'a Path>,
    file_name: &'a str,
    picker: &'a dyn DestinationPicker,
}

impl<'a> PersistenceCoordinator<'a> {
    pub fn new(
        widget_dir: Option<&'a Path>,
        file_name: &'a str,
        picker: &'a dyn DestinationPicker,
    ) -> Self {
        Self {
            widget_dir,
            file_name,
            picker,
        }
    }

    pub fn persist(&self, artifact: &CompiledArtifact) -> PersistenceOutcome {
        match self.write_direct(artifact) {
            Ok(path) => {
                tracing::info!("Wrote widget to {}", path.display());
                PersistenceOutcome::Saved(path)
            }
            Err(e) => {
                tracing::warn!("{}; falling back to destination picker", e);
                self.write_via_picker(artifact)
            }
        }
    }

    fn write_direct(&self, artifact: &CompiledArtifact) -> Result<PathBuf, PersistenceError> {
        let Some(dir) = self.widget_dir else {
            return Err(PersistenceError::DirectWriteFailed {
                path: PathBuf::from(self.file_name),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "no application support directory available",
                ),
            });
        };

        let path = dir.join(self.file_name);
        std::fs::create_dir_all(dir)
            .and_then(|_| write_atomic(&path, artifact.as_str()))
            .map_err(|source| PersistenceError::DirectWriteFailed {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    fn write_via_picker(&self, artifact: &CompiledArtifact) -> PersistenceOutcome {
        let extension = Path::new(self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let chosen = match self
            .picker
            .prompt_for_destination(self.file_name, extension, self.widget_dir)
        {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::info!("Widget save cancelled by operator");
                return PersistenceOutcome::CancelledByOperator;
            }
            Err(e) => {
                tracing::error!("Destination picker failed: {}", e);
                return PersistenceOutcome::Failed(PersistenceError::Picker(e));
            }
        };

        match write_atomic(&chosen, artifact.as_str()) {
            Ok(()) => {
                tracing::info!("Wrote widget to {}", chosen.display());
                PersistenceOutcome::Saved(chosen)
            }
            Err(source) => {
                tracing::error!("Failed writing widget to {}: {}", chosen.display(), source);
                PersistenceOutcome::Failed(PersistenceError::FallbackWriteFailed {
                    path: chosen,
                    source,
                })
            }
        }
    }
}

/// Replace `path` with `content` without ever exposing a partial file.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over the destination.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
