use syntect::highlighting::{FontStyle, HighlightIterator, HighlightState, Highlighter, Theme};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::style_map::StyleMap;

/// Highlight the whole text into an FLTK style string.
///
/// One style char is emitted per byte (not per char) because FLTK's style
/// buffer is indexed by byte offset.
pub fn highlight_full(
    text: &str,
    syntax: &SyntaxReference,
    syntax_set: &SyntaxSet,
    theme: &Theme,
    style_map: &mut StyleMap,
) -> String {
    let highlighter = Highlighter::new(theme);
    let mut parse_state = ParseState::new(syntax);
    let mut highlight_state = HighlightState::new(&highlighter, ScopeStack::new());
    let mut style_string = String::with_capacity(text.len());

    for line in LinesWithEndings::from(text) {
        let ops = match parse_state.parse_line(line, syntax_set) {
            Ok(ops) => ops,
            Err(e) => {
                log::debug!("Parse error, rest of snippet left unstyled: {}", e);
                style_string.extend(std::iter::repeat_n('A', text.len() - style_string.len()));
                break;
            }
        };
        let iter = HighlightIterator::new(&mut highlight_state, &ops, line, &highlighter);
        for (style, piece) in iter {
            let italic = style.font_style.contains(FontStyle::ITALIC);
            let ch = style_map.get_or_insert(style.foreground, italic);
            style_string.extend(std::iter::repeat_n(ch, piece.len()));
        }
    }

    style_string
}
