//! Application layer.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, registry, settings, messages)
//! - `controllers/` - Widget owners (RenderingSurface)
//! - `services/` - Highlighting, layout, export
//! - `infrastructure/` - FLTK buffer access, file output, errors
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

pub use domain::{AppSettings, CodeTheme, Document, FontChoice, Language, Message, ViewState};
pub use infrastructure::buffer::buffer_text_no_leak;
pub use services::export::{ExportFormat, ExportPipeline};
