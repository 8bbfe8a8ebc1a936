//! Domain layer - core data structures and types.
//!
//! - Document and ViewState
//! - Language and theme registry
//! - Application settings
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod registry;
pub mod settings;

pub use document::{Document, ViewState};
pub use messages::Message;
pub use registry::{CodeTheme, Language, Palette, Rgb};
pub use settings::{AppSettings, FontChoice};
