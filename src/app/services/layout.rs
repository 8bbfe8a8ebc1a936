//! Geometry of the code window.
//!
//! The editor never scrolls internally: it is sized so every visual row is
//! visible, and the window and capture group grow with it. Everything here is
//! pure so it can be recomputed after each text, language or theme change.

/// Transparent margin around the window inside the captured area.
pub const CAPTURE_PADDING: i32 = 40;
/// Inner padding between the window edge and its content.
pub const WINDOW_PADDING: i32 = 20;
pub const DOT_SIZE: i32 = 12;
pub const DOT_GAP: i32 = 8;
pub const DOT_MARGIN_BOTTOM: i32 = 15;
/// Extra horizontal inset of the editor inside the window.
pub const EDITOR_SIDE_PADDING: i32 = 20;
/// FLTK's text display keeps a few pixels above/below and left of the text.
const TEXT_VERTICAL_MARGINS: i32 = 6;
const TEXT_LEFT_MARGIN: i32 = 6;

/// Traffic-light decoration: (fill, border) per dot, left to right.
pub const DOT_COLORS: [(u32, u32); 3] = [
    (0xff5f56, 0xe0443e),
    (0xffbd2e, 0xe0a22a),
    (0x27c93f, 0x22b53b),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Font metrics measured from the toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInput<'a> {
    pub origin: (i32, i32),
    pub surface_width: i32,
    pub text: &'a str,
    pub tab_size: usize,
    pub wrap: bool,
    pub line_numbers: bool,
    pub metrics: TextMetrics,
    /// Row count reported by the editor itself, preferred over the estimate.
    pub measured_rows: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    /// The capture target, padding included.
    pub capture: Rect,
    pub window: Rect,
    pub dots: [Rect; 3],
    pub editor: Rect,
    pub line_number_width: i32,
    pub rows: usize,
}

impl SurfaceLayout {
    pub fn compute(input: &LayoutInput) -> Self {
        let (x0, y0) = input.origin;
        let line_count = input.text.split('\n').count();
        let line_number_width = if input.line_numbers {
            line_number_width(line_count)
        } else {
            0
        };

        let inset = 2 * (WINDOW_PADDING + EDITOR_SIDE_PADDING);
        let mut editor_w = (input.surface_width - 2 * CAPTURE_PADDING - inset).max(1);
        if !input.wrap {
            // Unwrapped lines never scroll: widen everything to the longest one.
            let cols = input
                .text
                .split('\n')
                .map(|line| display_columns(line.trim_end_matches('\r'), input.tab_size))
                .max()
                .unwrap_or(0);
            let needed = (cols as f64 * input.metrics.char_width).ceil() as i32
                + line_number_width
                + 2 * TEXT_LEFT_MARGIN;
            editor_w = editor_w.max(needed);
        }
        let window_w = editor_w + inset;
        let window_x = x0 + CAPTURE_PADDING;
        let window_y = y0 + CAPTURE_PADDING;

        let dots_y = window_y + WINDOW_PADDING;
        let dots = [0, 1, 2].map(|i| {
            Rect::new(
                window_x + WINDOW_PADDING + i * (DOT_SIZE + DOT_GAP),
                dots_y,
                DOT_SIZE,
                DOT_SIZE,
            )
        });

        let editor_x = window_x + WINDOW_PADDING + EDITOR_SIDE_PADDING;
        let editor_y = dots_y + DOT_SIZE + DOT_MARGIN_BOTTOM;

        let rows = if let Some(rows) = input.measured_rows {
            rows.max(1)
        } else if input.wrap {
            let text_w = (editor_w - line_number_width - TEXT_LEFT_MARGIN).max(1) as f64;
            let cols = (text_w / input.metrics.char_width.max(1.0)).floor().max(1.0) as usize;
            visual_rows(input.text, input.tab_size, cols)
        } else {
            line_count
        };
        let editor_h = rows as i32 * input.metrics.line_height + TEXT_VERTICAL_MARGINS;

        let window_h = editor_y - window_y + editor_h + WINDOW_PADDING;
        let capture_h = window_h + 2 * CAPTURE_PADDING;

        Self {
            capture: Rect::new(x0, y0, window_w + 2 * CAPTURE_PADDING, capture_h),
            window: Rect::new(window_x, window_y, window_w, window_h),
            dots,
            editor: Rect::new(editor_x, editor_y, editor_w, editor_h),
            line_number_width,
            rows,
        }
    }
}

/// Gutter width that fits the largest line number.
pub fn line_number_width(line_count: usize) -> i32 {
    let digits = ((line_count + 1) as f64).log10().floor() as i32 + 1;
    (digits * 8 + 16).max(40)
}

/// Display width of one line in columns, tabs expanded to the next stop.
pub fn display_columns(line: &str, tab_size: usize) -> usize {
    let tab = tab_size.max(1);
    line.chars().fold(0, |col, ch| {
        if ch == '\t' {
            (col / tab + 1) * tab
        } else {
            col + 1
        }
    })
}

/// Number of rows the text occupies when wrapped at `cols` columns.
pub fn visual_rows(text: &str, tab_size: usize, cols: usize) -> usize {
    let cols = cols.max(1);
    text.split('\n')
        .map(|line| {
            let width = display_columns(line.trim_end_matches('\r'), tab_size);
            width.div_ceil(cols).max(1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str, wrap: bool) -> LayoutInput<'_> {
        LayoutInput {
            origin: (0, 0),
            surface_width: 840,
            text,
            tab_size: 4,
            wrap,
            line_numbers: true,
            metrics: TextMetrics { char_width: 8.0, line_height: 16 },
            measured_rows: None,
        }
    }

    #[test]
    fn test_display_columns_expands_tabs() {
        assert_eq!(display_columns("abc", 4), 3);
        assert_eq!(display_columns("\tx", 4), 5);
        assert_eq!(display_columns("ab\tx", 4), 5);
        assert_eq!(display_columns("abcd\tx", 4), 9);
    }

    #[test]
    fn test_visual_rows_wraps_long_lines() {
        assert_eq!(visual_rows("", 4, 10), 1);
        assert_eq!(visual_rows("0123456789", 4, 10), 1);
        assert_eq!(visual_rows("0123456789a", 4, 10), 2);
        assert_eq!(visual_rows("a\n\nb", 4, 10), 3);
    }

    #[test]
    fn test_line_number_width_grows_with_digits() {
        assert_eq!(line_number_width(9), 40);
        assert_eq!(line_number_width(99_999), 64);
    }

    #[test]
    fn test_window_sits_inside_capture_padding() {
        let layout = SurfaceLayout::compute(&input("a\nb\nc", true));
        assert_eq!(layout.window.x, CAPTURE_PADDING);
        assert_eq!(layout.window.y, CAPTURE_PADDING);
        assert_eq!(layout.window.w, 840 - 2 * CAPTURE_PADDING);
        assert_eq!(layout.capture.h, layout.window.h + 2 * CAPTURE_PADDING);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.editor.h, 3 * 16 + TEXT_VERTICAL_MARGINS);
    }

    #[test]
    fn test_dots_are_spaced_evenly() {
        let layout = SurfaceLayout::compute(&input("x", true));
        assert_eq!(layout.dots[1].x - layout.dots[0].x, DOT_SIZE + DOT_GAP);
        assert_eq!(layout.dots[2].x - layout.dots[1].x, DOT_SIZE + DOT_GAP);
        assert_eq!(layout.editor.y, layout.dots[0].y + DOT_SIZE + DOT_MARGIN_BOTTOM);
    }

    #[test]
    fn test_editor_grows_with_content() {
        let short = SurfaceLayout::compute(&input("x", true));
        let long_line = "x".repeat(400);
        let wrapped = SurfaceLayout::compute(&input(&long_line, true));
        let unwrapped = SurfaceLayout::compute(&input(&long_line, false));
        assert!(wrapped.rows > 1);
        assert!(wrapped.editor.h > short.editor.h);
        assert_eq!(unwrapped.rows, 1);
        assert!(wrapped.capture.h > unwrapped.capture.h);
    }

    #[test]
    fn test_unwrapped_long_line_widens_surface() {
        let short = SurfaceLayout::compute(&input("x", false));
        assert_eq!(short.capture.w, 840);

        let long_line = "x".repeat(400);
        let wide = SurfaceLayout::compute(&input(&long_line, false));
        let text_w = wide.editor.w - wide.line_number_width - TEXT_LEFT_MARGIN;
        assert!(text_w as f64 >= 400.0 * 8.0);
        assert_eq!(wide.capture.w, wide.window.w + 2 * CAPTURE_PADDING);
        assert!(wide.capture.w > 840);

        // Wrapping keeps the configured width.
        let wrapped = SurfaceLayout::compute(&input(&long_line, true));
        assert_eq!(wrapped.capture.w, 840);
    }

    #[test]
    fn test_measured_rows_override_estimate() {
        let mut inp = input("one line", true);
        inp.measured_rows = Some(4);
        let layout = SurfaceLayout::compute(&inp);
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.editor.h, 4 * 16 + TEXT_VERTICAL_MARGINS);
    }

    #[test]
    fn test_layout_follows_origin() {
        let mut inp = input("x", true);
        inp.origin = (10, 50);
        let layout = SurfaceLayout::compute(&inp);
        assert_eq!(layout.capture.x, 10);
        assert_eq!(layout.window.y, 50 + CAPTURE_PADDING);
    }
}
