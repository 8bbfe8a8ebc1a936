use std::ops::{Deref, DerefMut};

use super::{Backdrop, ExportFormat};
use crate::app::infrastructure::error::ExportError;

/// Pixels read back from an offscreen raster surface, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterCapture {
    pub width: u32,
    pub height: u32,
    /// Drawn over black for transparent captures, over the backdrop otherwise.
    pub rgb: Vec<u8>,
    /// The same drawing over white. Only present for transparent captures;
    /// the difference to `rgb` gives each pixel's coverage.
    pub over_white: Option<Vec<u8>>,
}

impl RasterCapture {
    pub fn opaque(width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgb,
            over_white: None,
        }
    }

    pub fn matted(width: u32, height: u32, over_black: Vec<u8>, over_white: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgb: over_black,
            over_white: Some(over_white),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Raster(RasterCapture),
    /// A complete SVG document.
    Vector(Vec<u8>),
}

/// The widget subtree that gets serialized into an image.
pub trait CaptureTarget {
    /// Whatever the target needs to undo `suppress_artifacts`.
    type Saved;

    fn is_mounted(&self) -> bool;

    /// Re-sync content and layout so the capture reflects the latest edits.
    fn refresh(&mut self);

    /// Hide caret, selection and scrollbars. Returns their previous state.
    fn suppress_artifacts(&mut self) -> Self::Saved;

    fn restore_artifacts(&mut self, saved: Self::Saved);

    fn capture(&mut self, format: ExportFormat, backdrop: Backdrop) -> Result<Capture, ExportError>;
}

/// Keeps interactive artifacts suppressed for its lifetime and restores
/// them on drop, whichever way the capture exits.
pub struct ArtifactGuard<'a, T: CaptureTarget> {
    target: &'a mut T,
    saved: Option<T::Saved>,
}

impl<'a, T: CaptureTarget> ArtifactGuard<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        let saved = target.suppress_artifacts();
        Self {
            target,
            saved: Some(saved),
        }
    }
}

impl<T: CaptureTarget> Deref for ArtifactGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: CaptureTarget> DerefMut for ArtifactGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: CaptureTarget> Drop for ArtifactGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.target.restore_artifacts(saved);
        }
    }
}
