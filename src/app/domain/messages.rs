use crate::app::domain::registry::{CodeTheme, Language};
use crate::app::infrastructure::error::ExportError;
use crate::app::services::export::{ExportArtifact, ExportFormat};

/// All messages that can be sent through the FLTK channel.
/// Widget callbacks send one of these; the dispatch loop in main handles them.
#[derive(Debug)]
pub enum Message {
    /// The editor buffer was edited.
    TextChanged,
    SelectLanguage(Language),
    SelectTheme(CodeTheme),

    /// Export button pressed; carries the requested format id.
    Export(String),
    /// Posted by the encode worker.
    ExportEncoded(ExportFormat, Result<ExportArtifact, ExportError>),

    Quit,
}
