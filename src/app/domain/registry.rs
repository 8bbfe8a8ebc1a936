//! Static language and theme tables.
//!
//! Both option sets are closed enums, so "no selection" cannot be expressed.
//! Lookups by identifier never fail: unknown ids resolve to the default.

use serde::{Deserialize, Serialize};

/// An sRGB color as stored in the palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// `#rrggbb` form, as written into SVG and logs.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Languages offered in the language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Css,
    Html,
    Json,
}

impl Language {
    pub fn id(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Css => "css",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Css => "CSS",
            Self::Html => "HTML/XML",
            Self::Json => "JSON",
        }
    }

    /// Name of the syntect grammar used to tokenize this language.
    pub fn grammar_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Css => "CSS",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Self::JavaScript,
            Self::Python,
            Self::Css,
            Self::Html,
            Self::Json,
        ]
    }

    pub fn from_id(id: &str) -> Option<Language> {
        Self::all().iter().copied().find(|l| l.id() == id)
    }

    /// Like `from_id`, but unknown ids resolve to the default language.
    pub fn lookup(id: &str) -> Language {
        Self::from_id(id).unwrap_or_default()
    }

    /// Position in `all()`, used as the selector index.
    pub fn index(&self) -> usize {
        Self::all().iter().position(|l| l == self).unwrap_or(0)
    }
}

/// Per token category colors plus the window background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub caret: Rgb,
    pub selection: Rgb,
    pub gutter_foreground: Rgb,
    pub comment: Rgb,
    pub keyword: Rgb,
    pub string: Rgb,
    pub number: Rgb,
    pub function: Rgb,
    pub type_name: Rgb,
    pub tag: Rgb,
    pub attribute: Rgb,
    pub variable: Rgb,
    pub operator: Rgb,
}

const DRACULA: Palette = Palette {
    background: Rgb::from_hex(0x282a36),
    foreground: Rgb::from_hex(0xf8f8f2),
    caret: Rgb::from_hex(0xf8f8f0),
    selection: Rgb::from_hex(0x44475a),
    gutter_foreground: Rgb::from_hex(0x6d8a88),
    comment: Rgb::from_hex(0x6272a4),
    keyword: Rgb::from_hex(0xff79c6),
    string: Rgb::from_hex(0xf1fa8c),
    number: Rgb::from_hex(0xbd93f9),
    function: Rgb::from_hex(0x50fa7b),
    type_name: Rgb::from_hex(0x8be9fd),
    tag: Rgb::from_hex(0xff79c6),
    attribute: Rgb::from_hex(0x50fa7b),
    variable: Rgb::from_hex(0xffb86c),
    operator: Rgb::from_hex(0xff79c6),
};

const MATERIAL: Palette = Palette {
    background: Rgb::from_hex(0x263238),
    foreground: Rgb::from_hex(0xeeffff),
    caret: Rgb::from_hex(0xffcc00),
    selection: Rgb::from_hex(0x314549),
    gutter_foreground: Rgb::from_hex(0x546e7a),
    comment: Rgb::from_hex(0x546e7a),
    keyword: Rgb::from_hex(0xc792ea),
    string: Rgb::from_hex(0xc3e88d),
    number: Rgb::from_hex(0xff5370),
    function: Rgb::from_hex(0x82aaff),
    type_name: Rgb::from_hex(0xdecb6b),
    tag: Rgb::from_hex(0xff5370),
    attribute: Rgb::from_hex(0xc792ea),
    variable: Rgb::from_hex(0xf07178),
    operator: Rgb::from_hex(0x89ddff),
};

const MONOKAI: Palette = Palette {
    background: Rgb::from_hex(0x272822),
    foreground: Rgb::from_hex(0xf8f8f2),
    caret: Rgb::from_hex(0xf8f8f0),
    selection: Rgb::from_hex(0x49483e),
    gutter_foreground: Rgb::from_hex(0xd0d0d0),
    comment: Rgb::from_hex(0x75715e),
    keyword: Rgb::from_hex(0xf92672),
    string: Rgb::from_hex(0xe6db74),
    number: Rgb::from_hex(0xae81ff),
    function: Rgb::from_hex(0xa6e22e),
    type_name: Rgb::from_hex(0x66d9ef),
    tag: Rgb::from_hex(0xf92672),
    attribute: Rgb::from_hex(0xa6e22e),
    variable: Rgb::from_hex(0xfd971f),
    operator: Rgb::from_hex(0xf92672),
};

const ONE_DARK: Palette = Palette {
    background: Rgb::from_hex(0x282c34),
    foreground: Rgb::from_hex(0xabb2bf),
    caret: Rgb::from_hex(0x528bff),
    selection: Rgb::from_hex(0x3e4451),
    gutter_foreground: Rgb::from_hex(0x636d83),
    comment: Rgb::from_hex(0x5c6370),
    keyword: Rgb::from_hex(0xc678dd),
    string: Rgb::from_hex(0x98c379),
    number: Rgb::from_hex(0xd19a66),
    function: Rgb::from_hex(0x61afef),
    type_name: Rgb::from_hex(0xe5c07b),
    tag: Rgb::from_hex(0xe06c75),
    attribute: Rgb::from_hex(0xd19a66),
    variable: Rgb::from_hex(0xe06c75),
    operator: Rgb::from_hex(0x56b6c2),
};

const NORD: Palette = Palette {
    background: Rgb::from_hex(0x2e3440),
    foreground: Rgb::from_hex(0xd8dee9),
    caret: Rgb::from_hex(0xd8dee9),
    selection: Rgb::from_hex(0x434c5e),
    gutter_foreground: Rgb::from_hex(0x4c566a),
    comment: Rgb::from_hex(0x616e88),
    keyword: Rgb::from_hex(0x81a1c1),
    string: Rgb::from_hex(0xa3be8c),
    number: Rgb::from_hex(0xb48ead),
    function: Rgb::from_hex(0x88c0d0),
    type_name: Rgb::from_hex(0x8fbcbb),
    tag: Rgb::from_hex(0x81a1c1),
    attribute: Rgb::from_hex(0x8fbcbb),
    variable: Rgb::from_hex(0xd8dee9),
    operator: Rgb::from_hex(0x81a1c1),
};

const SOLARIZED_DARK: Palette = Palette {
    background: Rgb::from_hex(0x002b36),
    foreground: Rgb::from_hex(0x839496),
    caret: Rgb::from_hex(0x93a1a1),
    selection: Rgb::from_hex(0x073642),
    gutter_foreground: Rgb::from_hex(0x586e75),
    comment: Rgb::from_hex(0x586e75),
    keyword: Rgb::from_hex(0x859900),
    string: Rgb::from_hex(0x2aa198),
    number: Rgb::from_hex(0xd33682),
    function: Rgb::from_hex(0x268bd2),
    type_name: Rgb::from_hex(0xb58900),
    tag: Rgb::from_hex(0x268bd2),
    attribute: Rgb::from_hex(0x93a1a1),
    variable: Rgb::from_hex(0xcb4b16),
    operator: Rgb::from_hex(0x859900),
};

const GITHUB_LIGHT: Palette = Palette {
    background: Rgb::from_hex(0xffffff),
    foreground: Rgb::from_hex(0x24292e),
    caret: Rgb::from_hex(0x24292e),
    selection: Rgb::from_hex(0xc8e1ff),
    gutter_foreground: Rgb::from_hex(0x959da5),
    comment: Rgb::from_hex(0x6a737d),
    keyword: Rgb::from_hex(0xd73a49),
    string: Rgb::from_hex(0x032f62),
    number: Rgb::from_hex(0x005cc5),
    function: Rgb::from_hex(0x6f42c1),
    type_name: Rgb::from_hex(0xe36209),
    tag: Rgb::from_hex(0x22863a),
    attribute: Rgb::from_hex(0x6f42c1),
    variable: Rgb::from_hex(0xe36209),
    operator: Rgb::from_hex(0xd73a49),
};

/// Themes offered in the theme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CodeTheme {
    #[default]
    Dracula,
    Material,
    Monokai,
    OneDark,
    Nord,
    SolarizedDark,
    GitHubLight,
}

impl CodeTheme {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Dracula => "dracula",
            Self::Material => "material",
            Self::Monokai => "monokai",
            Self::OneDark => "one-dark",
            Self::Nord => "nord",
            Self::SolarizedDark => "solarized-dark",
            Self::GitHubLight => "github-light",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dracula => "Dracula",
            Self::Material => "Material",
            Self::Monokai => "Monokai",
            Self::OneDark => "One Dark",
            Self::Nord => "Nord",
            Self::SolarizedDark => "Solarized Dark",
            Self::GitHubLight => "GitHub Light",
        }
    }

    pub fn palette(&self) -> &'static Palette {
        match self {
            Self::Dracula => &DRACULA,
            Self::Material => &MATERIAL,
            Self::Monokai => &MONOKAI,
            Self::OneDark => &ONE_DARK,
            Self::Nord => &NORD,
            Self::SolarizedDark => &SOLARIZED_DARK,
            Self::GitHubLight => &GITHUB_LIGHT,
        }
    }

    /// Window background, used on screen and in exported images.
    pub fn background(&self) -> Rgb {
        self.palette().background
    }

    pub fn all() -> &'static [CodeTheme] {
        &[
            Self::Dracula,
            Self::Material,
            Self::Monokai,
            Self::OneDark,
            Self::Nord,
            Self::SolarizedDark,
            Self::GitHubLight,
        ]
    }

    pub fn from_id(id: &str) -> Option<CodeTheme> {
        Self::all().iter().copied().find(|t| t.id() == id)
    }

    /// Unknown ids fall back to Dracula so the surface always has a
    /// usable background.
    pub fn lookup(id: &str) -> CodeTheme {
        Self::from_id(id).unwrap_or_default()
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }
}
