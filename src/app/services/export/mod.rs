//! Export pipeline: capture the code window and turn it into an image file.
//!
//! Capture happens on the UI thread through a [`CaptureTarget`]; the
//! returned [`CaptureJob`] is `Send` so raster encoding can run elsewhere.
//! Only one export runs at a time.

pub mod capture;
pub mod encode;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

pub use capture::{ArtifactGuard, Capture, CaptureTarget, RasterCapture};

use crate::app::domain::registry::Rgb;
use crate::app::infrastructure::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
}

impl ExportFormat {
    pub fn parse(id: &str) -> Result<Self, ExportError> {
        match id.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            _ => Err(ExportError::UnsupportedFormat(id.to_string())),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Png => "code-snippet.png",
            Self::Jpeg => "code-snippet.jpeg",
            Self::Svg => "code-snippet.svg",
        }
    }

    /// JPEG cannot encode transparency, so it gets an opaque white backdrop.
    pub fn backdrop(&self) -> Backdrop {
        match self {
            Self::Png | Self::Svg => Backdrop::Transparent,
            Self::Jpeg => Backdrop::Opaque(Rgb::WHITE),
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[Self::Png, Self::Jpeg, Self::Svg]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What shows through around the rounded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Transparent,
    Opaque(Rgb),
}

/// An encoded image, kept only until it has been handed to a sink.
#[derive(Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            file_name: format.file_name(),
            bytes,
        }
    }
}

impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// User-facing error reporting.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Final destination of a finished artifact.
pub trait DownloadSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError>;
}

/// A finished capture waiting to be encoded.
#[derive(Debug)]
pub struct CaptureJob {
    pub format: ExportFormat,
    capture: Capture,
    jpeg_quality: u8,
}

impl CaptureJob {
    /// Encode on a worker thread. A panic inside the encoder is turned into
    /// an error so the result always makes it back to the pipeline.
    pub fn encode_isolated(self) -> Result<ExportArtifact, ExportError> {
        catch_encode_panic(move || self.encode())
    }

    pub fn encode(self) -> Result<ExportArtifact, ExportError> {
        let bytes = match self.capture {
            Capture::Raster(raster) => encode::encode_raster(&raster, self.format, self.jpeg_quality)?,
            Capture::Vector(svg) => {
                if self.format != ExportFormat::Svg {
                    return Err(ExportError::Capture(format!(
                        "vector capture cannot be written as {}",
                        self.format
                    )));
                }
                if svg.is_empty() {
                    return Err(ExportError::Capture("surface produced an empty SVG".to_string()));
                }
                svg
            }
        };
        Ok(ExportArtifact::new(self.format, bytes))
    }
}

fn catch_encode_panic<F>(encode: F) -> Result<ExportArtifact, ExportError>
where
    F: FnOnce() -> Result<ExportArtifact, ExportError>,
{
    panic::catch_unwind(AssertUnwindSafe(encode)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ExportError::Capture(format!("encoder panicked: {}", reason)))
    })
}

pub struct ExportPipeline {
    busy: bool,
    jpeg_quality: u8,
}

impl ExportPipeline {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            busy: false,
            jpeg_quality,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate the request and capture the target.
    ///
    /// Returns `None` when nothing more should happen: the pipeline was
    /// busy, or the request failed and the user has been alerted. On `Some`
    /// the pipeline stays busy until [`finish`](Self::finish) is called.
    pub fn begin<T: CaptureTarget>(
        &mut self,
        format: &str,
        target: &mut T,
        notifier: &mut dyn Notifier,
    ) -> Option<CaptureJob> {
        if self.busy {
            log::warn!("Export to {} ignored: another export is still running", format);
            return None;
        }
        if !target.is_mounted() {
            report(&ExportError::TargetMissing, format, notifier);
            return None;
        }
        let format = match ExportFormat::parse(format) {
            Ok(f) => f,
            Err(e) => {
                report(&e, format, notifier);
                return None;
            }
        };

        target.refresh();
        let captured = {
            let mut guard = ArtifactGuard::new(target);
            guard.capture(format, format.backdrop())
        };

        match captured {
            Ok(capture) => {
                self.busy = true;
                log::debug!("Captured code window for {}", format);
                Some(CaptureJob {
                    format,
                    capture,
                    jpeg_quality: self.jpeg_quality,
                })
            }
            Err(e) => {
                report(&e, format.id(), notifier);
                None
            }
        }
    }

    /// Hand an encoded artifact to the sink, or report why there is none.
    /// Clears the busy flag.
    pub fn finish(
        &mut self,
        format: ExportFormat,
        encoded: Result<ExportArtifact, ExportError>,
        sink: &mut dyn DownloadSink,
        notifier: &mut dyn Notifier,
    ) -> Option<PathBuf> {
        self.busy = false;
        match encoded.and_then(|artifact| sink.deliver(&artifact)) {
            Ok(path) => Some(path),
            Err(e) => {
                report(&e, format.id(), notifier);
                None
            }
        }
    }

    /// Capture, encode and deliver without leaving the calling thread.
    pub fn export_now<T: CaptureTarget>(
        &mut self,
        format: &str,
        target: &mut T,
        sink: &mut dyn DownloadSink,
        notifier: &mut dyn Notifier,
    ) -> Option<PathBuf> {
        let job = self.begin(format, target, notifier)?;
        let format = job.format;
        let encoded = job.encode();
        self.finish(format, encoded, sink, notifier)
    }
}

fn report(err: &ExportError, format: &str, notifier: &mut dyn Notifier) {
    if err.is_precondition() {
        log::warn!("Export to {} rejected: {}", format, err);
        notifier.alert(&err.to_string());
    } else {
        log::error!("Failed to export image as {}: {}", format, err);
        notifier.alert(&format!("Failed to export image as {}: {}", format, err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::document::ViewState;
    use crate::app::domain::registry::{CodeTheme, Language};

    /// Stand-in for the FLTK surface: paints the theme background inside a
    /// 2px padding and serializes the text into the SVG body.
    struct FakeSurface {
        view: ViewState,
        mounted: bool,
        caret_visible: bool,
        scrollbars_visible: bool,
        fail_with: Option<String>,
        refreshed_text: Option<String>,
        captures: usize,
    }

    impl FakeSurface {
        fn new(view: ViewState) -> Self {
            Self {
                view,
                mounted: true,
                caret_visible: true,
                scrollbars_visible: true,
                fail_with: None,
                refreshed_text: None,
                captures: 0,
            }
        }
    }

    impl CaptureTarget for FakeSurface {
        type Saved = (bool, bool);

        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn refresh(&mut self) {
            self.refreshed_text = Some(self.view.document.text().to_string());
        }

        fn suppress_artifacts(&mut self) -> (bool, bool) {
            let saved = (self.caret_visible, self.scrollbars_visible);
            self.caret_visible = false;
            self.scrollbars_visible = false;
            saved
        }

        fn restore_artifacts(&mut self, saved: (bool, bool)) {
            (self.caret_visible, self.scrollbars_visible) = saved;
        }

        fn capture(&mut self, format: ExportFormat, backdrop: Backdrop) -> Result<Capture, ExportError> {
            assert!(!self.caret_visible && !self.scrollbars_visible);
            self.captures += 1;
            if let Some(msg) = &self.fail_with {
                return Err(ExportError::Capture(msg.clone()));
            }
            let bg = self.view.theme.background();
            if format == ExportFormat::Svg {
                let svg = format!(
                    "<svg><rect fill=\"{}\"/><text>{}</text></svg>",
                    bg.to_hex_string(),
                    self.refreshed_text.clone().unwrap_or_default()
                );
                return Ok(Capture::Vector(svg.into_bytes()));
            }
            let (w, h) = (12u32, 12u32);
            let paint = |fill: Rgb| {
                let mut rgb = Vec::new();
                for y in 0..h {
                    for x in 0..w {
                        let inside = (2..w - 2).contains(&x) && (2..h - 2).contains(&y);
                        let px = if inside { bg } else { fill };
                        rgb.extend_from_slice(&[px.0, px.1, px.2]);
                    }
                }
                rgb
            };
            let raster = match backdrop {
                Backdrop::Transparent => {
                    RasterCapture::matted(w, h, paint(Rgb::BLACK), paint(Rgb::WHITE))
                }
                Backdrop::Opaque(c) => RasterCapture::opaque(w, h, paint(c)),
            };
            Ok(Capture::Raster(raster))
        }
    }

    #[derive(Default)]
    struct Alerts(Vec<String>);

    impl Notifier for Alerts {
        fn alert(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct MemorySink(Vec<ExportArtifact>);

    impl DownloadSink for MemorySink {
        fn deliver(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
            self.0.push(artifact.clone());
            Ok(PathBuf::from(artifact.file_name))
        }
    }

    struct FailingSink;

    impl DownloadSink for FailingSink {
        fn deliver(&mut self, _: &ExportArtifact) -> Result<PathBuf, ExportError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn decode(artifact: &ExportArtifact) -> image::RgbaImage {
        image::load_from_memory(&artifact.bytes).unwrap().to_rgba8()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(ExportFormat::parse("png").unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::parse("JPG").unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::parse("svg").unwrap(), ExportFormat::Svg);
        assert!(matches!(
            ExportFormat::parse("gif"),
            Err(ExportError::UnsupportedFormat(f)) if f == "gif"
        ));
    }

    #[test]
    fn test_file_names_and_backdrops() {
        assert_eq!(ExportFormat::Png.file_name(), "code-snippet.png");
        assert_eq!(ExportFormat::Jpeg.file_name(), "code-snippet.jpeg");
        assert_eq!(ExportFormat::Svg.file_name(), "code-snippet.svg");
        assert_eq!(ExportFormat::Png.backdrop(), Backdrop::Transparent);
        assert_eq!(ExportFormat::Svg.backdrop(), Backdrop::Transparent);
        assert_eq!(ExportFormat::Jpeg.backdrop(), Backdrop::Opaque(Rgb::WHITE));
    }

    #[test]
    fn test_every_combination_downloads_once_with_theme_background() {
        for lang in Language::all() {
            for theme in CodeTheme::all() {
                for format in ExportFormat::all() {
                    let mut view = ViewState::default();
                    view.select_language(*lang);
                    view.select_theme(*theme);
                    let mut surface = FakeSurface::new(view);
                    let mut sink = MemorySink::default();
                    let mut alerts = Alerts::default();
                    let mut pipeline = ExportPipeline::new(95);

                    let path = pipeline.export_now(format.id(), &mut surface, &mut sink, &mut alerts);
                    assert_eq!(path, Some(PathBuf::from(format.file_name())));
                    assert_eq!(sink.0.len(), 1);
                    assert!(alerts.0.is_empty());

                    let artifact = &sink.0[0];
                    let bg = theme.background();
                    match format {
                        ExportFormat::Png => {
                            let img = decode(artifact);
                            assert_eq!(img.get_pixel(0, 0)[3], 0);
                            assert_eq!(*img.get_pixel(6, 6), image::Rgba([bg.0, bg.1, bg.2, 0xff]));
                        }
                        ExportFormat::Jpeg => {
                            let img = decode(artifact);
                            assert_eq!(img.get_pixel(0, 0)[3], 0xff);
                        }
                        ExportFormat::Svg => {
                            let svg = String::from_utf8(artifact.bytes.clone()).unwrap();
                            assert!(svg.contains(&bg.to_hex_string()));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_edit_is_reflected_in_next_capture() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        pipeline.export_now("svg", &mut surface, &mut sink, &mut alerts);
        surface.view.document.set_text("print('edited')".to_string());
        pipeline.export_now("svg", &mut surface, &mut sink, &mut alerts);

        let first = String::from_utf8(sink.0[0].bytes.clone()).unwrap();
        let second = String::from_utf8(sink.0[1].bytes.clone()).unwrap();
        assert!(!first.contains("edited"));
        assert!(second.contains("print('edited')"));
        assert_eq!(surface.captures, 2);
    }

    #[test]
    fn test_theme_switch_shows_in_next_export() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        pipeline.export_now("png", &mut surface, &mut sink, &mut alerts);
        pipeline.export_now("svg", &mut surface, &mut sink, &mut alerts);
        assert!(surface.view.select_theme(CodeTheme::Monokai));
        pipeline.export_now("png", &mut surface, &mut sink, &mut alerts);
        pipeline.export_now("svg", &mut surface, &mut sink, &mut alerts);
        assert_eq!(sink.0.len(), 4);

        let dracula = CodeTheme::Dracula.background();
        assert_eq!(*decode(&sink.0[0]).get_pixel(6, 6), image::Rgba([dracula.0, dracula.1, dracula.2, 0xff]));
        assert_eq!(*decode(&sink.0[2]).get_pixel(6, 6), image::Rgba([0x27, 0x28, 0x22, 0xff]));

        let svg = String::from_utf8(sink.0[3].bytes.clone()).unwrap();
        assert!(svg.contains("#272822"));
        assert!(!svg.contains(&dracula.to_hex_string()));
    }

    #[test]
    fn test_unmounted_target_alerts_once() {
        let mut surface = FakeSurface::new(ViewState::default());
        surface.mounted = false;
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        assert!(pipeline.export_now("png", &mut surface, &mut sink, &mut alerts).is_none());
        assert!(sink.0.is_empty());
        assert_eq!(alerts.0.len(), 1);
        assert_eq!(surface.captures, 0);
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn test_unsupported_format_alerts_once() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        assert!(pipeline.export_now("bmp", &mut surface, &mut sink, &mut alerts).is_none());
        assert!(sink.0.is_empty());
        assert_eq!(alerts.0.len(), 1);
        assert!(alerts.0[0].contains("Invalid image format"));
        assert_eq!(surface.captures, 0);
    }

    #[test]
    fn test_capture_failure_alerts_and_restores() {
        let mut surface = FakeSurface::new(ViewState::default());
        surface.fail_with = Some("tainted resource".to_string());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        assert!(pipeline.export_now("jpeg", &mut surface, &mut sink, &mut alerts).is_none());
        assert!(sink.0.is_empty());
        assert_eq!(alerts.0.len(), 1);
        assert!(alerts.0[0].contains("tainted resource"));
        assert!(alerts.0[0].contains("jpeg"));
        assert!(surface.caret_visible);
        assert!(surface.scrollbars_visible);
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn test_success_restores_previous_artifact_state() {
        let mut surface = FakeSurface::new(ViewState::default());
        surface.scrollbars_visible = false;
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        ExportPipeline::new(90).export_now("png", &mut surface, &mut sink, &mut alerts);
        assert!(surface.caret_visible);
        assert!(!surface.scrollbars_visible);
    }

    #[test]
    fn test_second_request_while_busy_is_ignored() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        let job = pipeline.begin("png", &mut surface, &mut alerts).unwrap();
        assert!(pipeline.is_busy());
        assert!(pipeline.begin("svg", &mut surface, &mut alerts).is_none());
        assert_eq!(surface.captures, 1);
        assert!(alerts.0.is_empty());

        let format = job.format;
        pipeline.finish(format, job.encode(), &mut sink, &mut alerts);
        assert!(!pipeline.is_busy());
        assert_eq!(sink.0.len(), 1);
        assert!(pipeline.begin("svg", &mut surface, &mut alerts).is_some());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        assert!(pipeline.export_now("png", &mut surface, &mut FailingSink, &mut alerts).is_none());
        assert_eq!(alerts.0.len(), 1);
        assert!(alerts.0[0].contains("read-only"));
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn test_encoder_panic_becomes_error() {
        let result = catch_encode_panic(|| panic!("bad pixel data"));
        match result {
            Err(ExportError::Capture(msg)) => assert!(msg.contains("bad pixel data")),
            other => panic!("expected capture error, got {:?}", other),
        }
    }

    #[test]
    fn test_encoder_panic_releases_busy_flag() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut sink = MemorySink::default();
        let mut alerts = Alerts::default();
        let mut pipeline = ExportPipeline::new(90);

        let job = pipeline.begin("png", &mut surface, &mut alerts).unwrap();
        let format = job.format;
        let encoded = catch_encode_panic(move || {
            drop(job);
            panic!("encoder blew up")
        });
        assert!(pipeline.finish(format, encoded, &mut sink, &mut alerts).is_none());
        assert!(!pipeline.is_busy());
        assert_eq!(alerts.0.len(), 1);
        assert!(pipeline.begin("svg", &mut surface, &mut alerts).is_some());
    }

    #[test]
    fn test_isolated_encode_matches_direct_encode() {
        let mut surface = FakeSurface::new(ViewState::default());
        let mut alerts = Alerts::default();
        let job = ExportPipeline::new(90).begin("svg", &mut surface, &mut alerts).unwrap();
        let artifact = job.encode_isolated().unwrap();
        assert_eq!(artifact.file_name, "code-snippet.svg");
    }

    #[test]
    fn test_vector_capture_requires_svg_format() {
        let job = CaptureJob {
            format: ExportFormat::Png,
            capture: Capture::Vector(b"<svg/>".to_vec()),
            jpeg_quality: 90,
        };
        assert!(job.encode().is_err());
    }
}
