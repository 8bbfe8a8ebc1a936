//! Services layer - operations that do not own widgets.
//!
//! - Syntax highlighting
//! - Code window geometry
//! - Image export

pub mod export;
pub mod layout;
pub mod syntax;
