//! Controllers layer - widgets bound to domain state.
//!
//! - The rendering surface (code window and capture target)

pub mod surface;
