use std::collections::HashMap;

use fltk::enums::{Color, Font};
use fltk::text::StyleTableEntry;
use syntect::highlighting::Color as SyntectColor;

use crate::app::domain::registry::Rgb;

/// Highest style char handed to FLTK ('A' + 25).
const MAX_STYLES: usize = 26;

/// Monospace italic face for a base font. The screen fonts have none, so
/// they borrow Courier's.
pub fn italic_font(font: Font) -> Font {
    match font {
        Font::Courier | Font::Screen => Font::CourierItalic,
        Font::CourierBold | Font::ScreenBold => Font::CourierBoldItalic,
        Font::Helvetica => Font::HelveticaItalic,
        Font::HelveticaBold => Font::HelveticaBoldItalic,
        Font::Times => Font::TimesItalic,
        Font::TimesBold => Font::TimesBoldItalic,
        other => other,
    }
}

/// Maps syntect (color, italic) pairs to FLTK style characters ('A', 'B', ...).
/// 'A' is always the upright palette foreground.
pub struct StyleMap {
    color_to_char: HashMap<(u8, u8, u8, bool), char>,
    entries: Vec<StyleTableEntry>,
    font: Font,
    font_size: i32,
    foreground: Rgb,
    changed: bool,
}

impl StyleMap {
    pub fn new(font: Font, font_size: i32, foreground: Rgb) -> Self {
        let mut map = Self {
            color_to_char: HashMap::new(),
            entries: Vec::new(),
            font,
            font_size,
            foreground,
            changed: true,
        };
        map.insert_default();
        map
    }

    fn insert_default(&mut self) {
        let Rgb(r, g, b) = self.foreground;
        self.entries.push(StyleTableEntry {
            color: Color::from_rgb(r, g, b),
            font: self.font,
            size: self.font_size,
        });
        self.color_to_char.insert((r, g, b, false), 'A');
    }

    pub fn get_or_insert(&mut self, color: SyntectColor, italic: bool) -> char {
        let key = (color.r, color.g, color.b, italic);
        if let Some(&ch) = self.color_to_char.get(&key) {
            return ch;
        }

        let idx = self.entries.len();
        if idx >= MAX_STYLES {
            return 'A';
        }
        let ch = (b'A' + idx as u8) as char;
        self.entries.push(StyleTableEntry {
            color: Color::from_rgb(color.r, color.g, color.b),
            font: if italic { italic_font(self.font) } else { self.font },
            size: self.font_size,
        });
        self.color_to_char.insert(key, ch);
        self.changed = true;
        ch
    }

    pub fn entries(&self) -> &[StyleTableEntry] {
        &self.entries
    }

    /// Drop all mappings and restart from a new foreground (theme change).
    pub fn reset(&mut self, foreground: Rgb) {
        self.color_to_char.clear();
        self.entries.clear();
        self.foreground = foreground;
        self.insert_default();
        self.changed = true;
    }

    pub fn has_new_entries(&self) -> bool {
        self.changed
    }

    pub fn reset_changed(&mut self) {
        self.changed = false;
    }
}
