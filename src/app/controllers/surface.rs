//! The code window: the widgets the user edits in and the subtree that gets
//! captured on export.

use std::fs;

use fltk::{
    draw,
    enums::{Align, CallbackTrigger, Color, Font, FrameType},
    frame::Frame,
    group::Group,
    prelude::*,
    surface::{ImageSurface, SvgFileSurface},
    text::{TextBuffer, TextEditor, WrapMode},
};

use crate::app::domain::document::ViewState;
use crate::app::domain::registry::{CodeTheme, Language, Rgb};
use crate::app::domain::settings::{AppSettings, FontChoice};
use crate::app::infrastructure::buffer::buffer_text_no_leak;
use crate::app::infrastructure::error::ExportError;
use crate::app::services::export::{Backdrop, Capture, CaptureTarget, ExportFormat, RasterCapture};
use crate::app::services::layout::{LayoutInput, SurfaceLayout, TextMetrics, DOT_COLORS};
use crate::app::services::syntax::SyntaxHighlighter;

/// Without a left/right/top/bottom bit the display lays out no scrollbars.
const SCROLLBARS_HIDDEN: Align = Align::Center;

pub fn fltk_font(choice: FontChoice) -> Font {
    match choice {
        FontChoice::ScreenBold => Font::ScreenBold,
        FontChoice::Courier => Font::Courier,
        FontChoice::HelveticaMono => Font::Screen,
    }
}

fn fltk_color(rgb: Rgb) -> Color {
    Color::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Display options taken from the settings file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    pub font: Font,
    pub font_size: i32,
    pub tab_size: i32,
    pub wrap: bool,
    pub line_numbers: bool,
    pub width: i32,
}

impl SurfaceOptions {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            font: fltk_font(settings.font),
            font_size: settings.font_size as i32,
            tab_size: settings.tab_size as i32,
            wrap: settings.word_wrap_enabled,
            line_numbers: settings.line_numbers_enabled,
            width: settings.surface_width,
        }
    }
}

/// What the surface last rendered; a sync with the same key is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncKey {
    revision: u64,
    language: Language,
    theme: CodeTheme,
}

/// Interactive state hidden while capturing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedArtifacts {
    cursor_shown: bool,
    selection: Option<(i32, i32)>,
    insert_position: i32,
    scrollbar_align: Align,
}

pub struct RenderingSurface {
    group: Group,
    window_frame: Frame,
    dots: Vec<Frame>,
    editor: TextEditor,
    buffer: TextBuffer,
    style_buffer: TextBuffer,
    highlighter: SyntaxHighlighter,
    options: SurfaceOptions,
    language: Language,
    synced: Option<SyncKey>,
    cursor_shown: bool,
}

impl RenderingSurface {
    /// Build the widgets at (x, y) inside the currently open group.
    pub fn new<F>(x: i32, y: i32, options: SurfaceOptions, view: &ViewState, on_edit: F) -> Self
    where
        F: FnMut(&mut TextEditor) + 'static,
    {
        let mut group = Group::new(x, y, options.width, 200, None);
        group.set_frame(FrameType::NoBox);
        group.make_resizable(false);

        let mut window_frame = Frame::default();
        window_frame.set_frame(FrameType::RShadowBox);

        let dots = DOT_COLORS
            .iter()
            .map(|&(fill, border)| {
                let mut dot = Frame::default();
                dot.set_frame(FrameType::NoBox);
                dot.draw(move |f| {
                    draw::set_draw_color(Color::from_hex(fill));
                    draw::draw_pie(f.x(), f.y(), f.w(), f.h(), 0.0, 360.0);
                    draw::set_draw_color(Color::from_hex(border));
                    draw::draw_arc(f.x(), f.y(), f.w(), f.h(), 0.0, 360.0);
                });
                dot
            })
            .collect();

        let mut buffer = TextBuffer::default();
        buffer.set_tab_distance(options.tab_size);
        buffer.set_text(view.document.text());
        let style_buffer = TextBuffer::default();

        let mut editor = TextEditor::new(0, 0, 0, 0, "");
        editor.set_buffer(buffer.clone());
        editor.set_frame(FrameType::FlatBox);
        editor.set_text_font(options.font);
        editor.set_text_size(options.font_size);
        editor.set_linenumber_font(options.font);
        editor.set_linenumber_size(options.font_size);
        editor.set_trigger(CallbackTrigger::Changed);
        editor.set_callback(on_edit);

        group.end();

        let highlighter = SyntaxHighlighter::new(view.theme, options.font, options.font_size);

        let mut surface = Self {
            group,
            window_frame,
            dots,
            editor,
            buffer,
            style_buffer,
            highlighter,
            options,
            language: view.language(),
            synced: None,
            cursor_shown: true,
        };
        surface.apply_options();
        surface.apply_palette(view.theme);
        surface.sync(view);
        surface
    }

    /// Current editor text.
    pub fn text(&self) -> String {
        buffer_text_no_leak(&self.buffer)
    }

    /// Bring the widgets in line with the view state. Re-highlights and
    /// re-lays out only when text, language or theme changed.
    pub fn sync(&mut self, view: &ViewState) {
        let key = SyncKey {
            revision: view.document.revision(),
            language: view.language(),
            theme: view.theme,
        };
        if self.synced == Some(key) {
            return;
        }

        if self.highlighter.code_theme() != view.theme {
            self.highlighter.set_theme(view.theme);
            self.apply_palette(view.theme);
        }
        self.language = view.language();

        // Edits arrive through the buffer already; only external changes are pushed in.
        if self.text() != view.document.text() {
            self.buffer.set_text(view.document.text());
        }

        self.rehighlight();
        self.relayout();
        self.synced = Some(key);
    }

    /// Sync even if nothing changed, e.g. once real font metrics are available.
    pub fn refresh_layout(&mut self, view: &ViewState) {
        self.synced = None;
        self.sync(view);
    }

    fn apply_options(&mut self) {
        let o = self.options;
        self.buffer.set_tab_distance(o.tab_size);
        self.editor.set_text_font(o.font);
        self.editor.set_text_size(o.font_size);
        self.editor.set_linenumber_font(o.font);
        self.editor.set_linenumber_size(o.font_size);
        if o.wrap {
            self.editor.wrap_mode(WrapMode::AtBounds, 0);
        } else {
            self.editor.wrap_mode(WrapMode::None, 0);
        }
    }

    /// Paint the window and editor in the theme's palette. Takes effect
    /// immediately, before any later export.
    fn apply_palette(&mut self, theme: CodeTheme) {
        let p = theme.palette();
        let bg = fltk_color(p.background);
        self.window_frame.set_color(bg);
        self.editor.set_color(bg);
        self.editor.set_text_color(fltk_color(p.foreground));
        self.editor.set_cursor_color(fltk_color(p.caret));
        self.editor.set_selection_color(fltk_color(p.selection));
        self.editor.set_linenumber_bgcolor(bg);
        self.editor.set_linenumber_fgcolor(fltk_color(p.gutter_foreground));
        log::debug!("Surface background set to {}", p.background.to_hex_string());
        self.group.redraw();
    }

    fn rehighlight(&mut self) {
        let text = self.text();
        let styles = self.highlighter.highlight(&text, self.language);
        self.style_buffer.set_text(&styles);
        if self.highlighter.style_table_changed() {
            self.editor
                .set_highlight_data(self.style_buffer.clone(), self.highlighter.style_table());
            self.highlighter.reset_style_table_changed();
        }
        self.editor.redraw();
    }

    fn metrics(&self) -> TextMetrics {
        if self.group.visible_r() {
            draw::set_font(self.options.font, self.options.font_size);
            TextMetrics {
                char_width: draw::width("M"),
                line_height: draw::height(),
            }
        } else {
            // Not on screen yet: estimate from the point size.
            let size = self.options.font_size as f64;
            TextMetrics {
                char_width: size * 0.6,
                line_height: (size * 1.2).ceil() as i32,
            }
        }
    }

    fn layout_for(&self, text: &str, measured_rows: Option<usize>) -> SurfaceLayout {
        SurfaceLayout::compute(&LayoutInput {
            origin: (self.group.x(), self.group.y()),
            surface_width: self.options.width,
            text,
            tab_size: self.options.tab_size.max(1) as usize,
            wrap: self.options.wrap,
            line_numbers: self.options.line_numbers,
            metrics: self.metrics(),
            measured_rows,
        })
    }

    /// Resize every widget so the editor shows all rows without scrolling.
    ///
    /// The editor cannot infer its content height from the buffer, so this
    /// runs after every change. When shown, the estimate is corrected with the
    /// row count the editor itself reports for the new width.
    fn relayout(&mut self) {
        let text = self.text();
        let estimate = self.layout_for(&text, None);
        self.apply_layout(&estimate);

        if self.group.visible_r() {
            let rows = self.editor.count_lines(0, self.buffer.length(), true).max(0) as usize + 1;
            if rows != estimate.rows {
                let measured = self.layout_for(&text, Some(rows));
                self.apply_layout(&measured);
            }
        }

        if let Some(mut parent) = self.group.parent() {
            parent.redraw();
        }
    }

    fn apply_layout(&mut self, layout: &SurfaceLayout) {
        let c = layout.capture;
        self.group.resize(c.x, c.y, c.w, c.h);
        let w = layout.window;
        self.window_frame.resize(w.x, w.y, w.w, w.h);
        for (dot, rect) in self.dots.iter_mut().zip(layout.dots.iter()) {
            dot.resize(rect.x, rect.y, rect.w, rect.h);
        }
        let e = layout.editor;
        self.editor.resize(e.x, e.y, e.w, e.h);
        self.editor.set_linenumber_width(layout.line_number_width);
        self.group.redraw();
    }

    /// Draw the group offscreen on top of a solid fill and read it back as RGB.
    fn render_over(&self, fill: Rgb) -> Result<(u32, u32, Vec<u8>), ExportError> {
        let (w, h) = (self.group.w(), self.group.h());
        let surface = ImageSurface::new(w, h, false);
        ImageSurface::push_current(&surface);
        draw::set_draw_color(fltk_color(fill));
        draw::draw_rectf(0, 0, w, h);
        surface.draw(&self.group, 0, 0);
        let image = surface.image();
        ImageSurface::pop_current();

        let image =
            image.ok_or_else(|| ExportError::Capture("offscreen surface returned no image".to_string()))?;
        let depth = image.depth() as usize;
        let rgb = to_rgb_bytes(image.to_rgb_data(), depth);
        Ok((image.data_w() as u32, image.data_h() as u32, rgb))
    }

    fn capture_raster(&self, backdrop: Backdrop) -> Result<Capture, ExportError> {
        let raster = match backdrop {
            Backdrop::Opaque(color) => {
                let (w, h, rgb) = self.render_over(color)?;
                RasterCapture::opaque(w, h, rgb)
            }
            Backdrop::Transparent => {
                let (w, h, over_black) = self.render_over(Rgb::BLACK)?;
                let (ww, wh, over_white) = self.render_over(Rgb::WHITE)?;
                if (w, h) != (ww, wh) {
                    return Err(ExportError::Capture(format!(
                        "matte passes differ in size: {}x{} and {}x{}",
                        w, h, ww, wh
                    )));
                }
                RasterCapture::matted(w, h, over_black, over_white)
            }
        };
        Ok(Capture::Raster(raster))
    }

    /// Scrollbar visibility is only recomputed when the display is resized.
    fn reflow_scrollbars(&mut self) {
        let (x, y, w, h) = (self.editor.x(), self.editor.y(), self.editor.w(), self.editor.h());
        self.editor.resize(x, y, w, h);
        self.editor.redraw();
    }

    fn capture_svg(&self, backdrop: Backdrop) -> Result<Capture, ExportError> {
        let (w, h) = (self.group.w(), self.group.h());
        let file = tempfile::Builder::new()
            .prefix("codeshot-")
            .suffix(".svg")
            .tempfile()?;

        {
            let surface = SvgFileSurface::new(w, h, file.path());
            SvgFileSurface::push_current(&surface);
            if let Backdrop::Opaque(color) = backdrop {
                draw::set_draw_color(fltk_color(color));
                draw::draw_rectf(0, 0, w, h);
            }
            surface.draw(&self.group, 0, 0);
            SvgFileSurface::pop_current();
            // Dropping the surface finishes and closes the SVG file.
        }

        let bytes = fs::read(file.path())?;
        Ok(Capture::Vector(bytes))
    }
}

impl CaptureTarget for RenderingSurface {
    type Saved = SavedArtifacts;

    fn is_mounted(&self) -> bool {
        self.group.visible_r() && self.group.w() > 0 && self.group.h() > 0
    }

    fn refresh(&mut self) {
        self.synced = None;
        self.rehighlight();
        self.relayout();
    }

    fn suppress_artifacts(&mut self) -> SavedArtifacts {
        let saved = SavedArtifacts {
            cursor_shown: self.cursor_shown,
            selection: self.buffer.selection_position(),
            insert_position: self.editor.insert_position(),
            scrollbar_align: self.editor.scrollbar_align(),
        };
        self.editor.show_cursor(false);
        self.cursor_shown = false;
        self.buffer.unselect();
        self.editor.set_scrollbar_align(SCROLLBARS_HIDDEN);
        self.reflow_scrollbars();
        saved
    }

    fn restore_artifacts(&mut self, saved: SavedArtifacts) {
        self.editor.set_scrollbar_align(saved.scrollbar_align);
        self.reflow_scrollbars();
        if let Some((start, end)) = saved.selection {
            self.buffer.select(start, end);
        }
        self.editor.set_insert_position(saved.insert_position);
        self.editor.show_cursor(saved.cursor_shown);
        self.cursor_shown = saved.cursor_shown;
        self.editor.redraw();
    }

    fn capture(&mut self, format: ExportFormat, backdrop: Backdrop) -> Result<Capture, ExportError> {
        match format {
            ExportFormat::Svg => self.capture_svg(backdrop),
            ExportFormat::Png | ExportFormat::Jpeg => self.capture_raster(backdrop),
        }
    }
}

/// Normalize pixel data of any depth to tightly packed RGB.
fn to_rgb_bytes(data: Vec<u8>, depth: usize) -> Vec<u8> {
    match depth {
        3 => data,
        4 => data.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect(),
        2 => data.chunks_exact(2).flat_map(|px| [px[0], px[0], px[0]]).collect(),
        1 => data.iter().flat_map(|&l| [l, l, l]).collect(),
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgb_bytes_drops_alpha() {
        assert_eq!(to_rgb_bytes(vec![1, 2, 3, 255, 4, 5, 6, 0], 4), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(to_rgb_bytes(vec![1, 2, 3], 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_to_rgb_bytes_expands_gray() {
        assert_eq!(to_rgb_bytes(vec![7, 9], 1), vec![7, 7, 7, 9, 9, 9]);
        assert_eq!(to_rgb_bytes(vec![7, 255], 2), vec![7, 7, 7]);
    }

    #[test]
    fn test_options_from_settings() {
        let settings = AppSettings {
            font: FontChoice::HelveticaMono,
            word_wrap_enabled: false,
            ..Default::default()
        };
        let options = SurfaceOptions::from_settings(&settings);
        assert_eq!(options.font, Font::Screen);
        assert!(!options.wrap);
        assert_eq!(options.font_size, 13);
        assert_eq!(options.width, settings.surface_width);
    }

    #[test]
    fn test_hidden_scrollbar_align_has_no_side() {
        for side in [Align::Left, Align::Right, Align::Top, Align::Bottom] {
            assert!(!SCROLLBARS_HIDDEN.contains(side));
        }
    }
}
