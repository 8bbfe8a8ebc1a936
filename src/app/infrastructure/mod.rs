//! Infrastructure layer - external integrations and utilities.
//!
//! - FLTK buffer utilities
//! - Writing exported images to disk
//! - Error types

pub mod buffer;
pub mod download;
pub mod error;
