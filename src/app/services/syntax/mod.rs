mod highlighter;
mod palette_theme;
mod style_map;

use fltk::enums::Font;
use fltk::text::StyleTableEntry;
use syntect::highlighting::Theme;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use style_map::StyleMap;

pub use palette_theme::build_theme;

use crate::app::domain::registry::{CodeTheme, Language};

pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    code_theme: CodeTheme,
    style_map: StyleMap,
}

impl SyntaxHighlighter {
    pub fn new(theme: CodeTheme, font: Font, font_size: i32) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: build_theme(theme),
            code_theme: theme,
            style_map: StyleMap::new(font, font_size, theme.palette().foreground),
        }
    }

    /// Grammar for a language. Missing grammars fall back to JavaScript, then plain text.
    pub fn grammar(&self, language: Language) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_name(language.grammar_name())
            .or_else(|| {
                log::debug!("No grammar named {}, using JavaScript", language.grammar_name());
                self.syntax_set
                    .find_syntax_by_name(Language::JavaScript.grammar_name())
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Style string for `text`, one char per byte.
    pub fn highlight(&mut self, text: &str, language: Language) -> String {
        let syntax = self.grammar(language).clone();
        highlighter::highlight_full(
            text,
            &syntax,
            &self.syntax_set,
            &self.theme,
            &mut self.style_map,
        )
    }

    pub fn code_theme(&self) -> CodeTheme {
        self.code_theme
    }

    /// Switch palette. Clears the style map.
    pub fn set_theme(&mut self, theme: CodeTheme) {
        if theme == self.code_theme {
            return;
        }
        self.theme = build_theme(theme);
        self.code_theme = theme;
        self.style_map.reset(theme.palette().foreground);
    }

    /// Get the style table for FLTK's set_highlight_data.
    pub fn style_table(&self) -> Vec<StyleTableEntry> {
        self.style_map.entries().to_vec()
    }

    pub fn style_table_changed(&self) -> bool {
        self.style_map.has_new_entries()
    }

    pub fn reset_style_table_changed(&mut self) {
        self.style_map.reset_changed();
    }
}
