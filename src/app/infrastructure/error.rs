use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Everything that can stop an export. Each variant ends that attempt; the
/// user retries by clicking again.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Code window is not shown yet. Cannot capture image.")]
    TargetMissing,

    #[error("Invalid image format selected: {0:?}")]
    UnsupportedFormat(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Errors raised before any capture work starts.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::TargetMissing | Self::UnsupportedFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(AppError::from(json_err).to_string().starts_with("JSON error:"));

        let err = ExportError::UnsupportedFormat("gif".to_string());
        assert_eq!(err.to_string(), "Invalid image format selected: \"gif\"");

        let err = ExportError::Capture("surface returned no image".to_string());
        assert_eq!(err.to_string(), "capture failed: surface returned no image");
    }

    #[test]
    fn test_precondition_classification() {
        assert!(ExportError::TargetMissing.is_precondition());
        assert!(ExportError::UnsupportedFormat(String::new()).is_precondition());
        assert!(!ExportError::Capture("x".into()).is_precondition());
    }
}
