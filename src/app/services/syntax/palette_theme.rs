use std::str::FromStr;

use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem, ThemeSettings,
};

use crate::app::domain::registry::{CodeTheme, Palette, Rgb};

fn color(rgb: Rgb) -> Color {
    Color { r: rgb.0, g: rgb.1, b: rgb.2, a: 0xff }
}

/// Scope selectors for each palette category. More specific selectors win in
/// syntect's matching, so `keyword.operator` overrides `keyword`.
fn scope_rules(p: &Palette) -> [(&'static str, Rgb, Option<FontStyle>); 10] {
    [
        ("comment, punctuation.definition.comment", p.comment, Some(FontStyle::ITALIC)),
        ("string, punctuation.definition.string", p.string, None),
        ("constant.numeric, constant.language, constant.character", p.number, None),
        ("keyword, storage", p.keyword, None),
        ("keyword.operator", p.operator, None),
        (
            "entity.name.function, support.function, variable.function",
            p.function,
            None,
        ),
        (
            "entity.name.type, entity.name.class, support.type, support.class, storage.type, meta.mapping.key string",
            p.type_name,
            None,
        ),
        ("entity.name.tag", p.tag, None),
        (
            "entity.other.attribute-name, support.type.property-name",
            p.attribute,
            None,
        ),
        ("variable.parameter, variable.language", p.variable, None),
    ]
}

/// Build a syntect theme from one of the registry palettes.
pub fn build_theme(theme: CodeTheme) -> Theme {
    let p = theme.palette();
    let settings = ThemeSettings {
        foreground: Some(color(p.foreground)),
        background: Some(color(p.background)),
        caret: Some(color(p.caret)),
        selection: Some(color(p.selection)),
        gutter: Some(color(p.background)),
        gutter_foreground: Some(color(p.gutter_foreground)),
        ..ThemeSettings::default()
    };

    let scopes = scope_rules(p)
        .into_iter()
        .filter_map(|(selector, rgb, font_style)| match ScopeSelectors::from_str(selector) {
            Ok(scope) => Some(ThemeItem {
                scope,
                style: StyleModifier {
                    foreground: Some(color(rgb)),
                    background: None,
                    font_style,
                },
            }),
            Err(e) => {
                log::warn!("Skipping scope selector {:?}: {:?}", selector, e);
                None
            }
        })
        .collect();

    Theme {
        name: Some(theme.display_name().to_string()),
        author: None,
        settings,
        scopes,
    }
}
