use super::registry::{CodeTheme, Language};

/// Snippet shown when the application starts.
pub const SAMPLE_SNIPPET: &str = "const pluckDeep = key => obj => key.split('.').reduce((accum, key) => accum[key], obj)

const compose = (...fns) => res => fns.reduce((accum, next) => next(accum), res)

const unfold = (f, seed) => {
  const go = (f, seed, acc) => {
    const res = f(seed)
    return res ? go(f, res[1], acc.concat([res[0]])) : acc
  }
  return go(f, seed, [])
}
";

/// The code being edited and the language it is highlighted as.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    text: String,
    pub language: Language,
    /// Bumped on every text change; lets the surface skip redundant re-syncs.
    revision: u64,
}

impl Document {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text. Returns false (and keeps the revision) when nothing changed.
    pub fn set_text(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        self.text = text;
        self.revision += 1;
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SAMPLE_SNIPPET, Language::default())
    }
}

/// What the rendering surface shows: the document plus the theme choice.
///
/// Owned by `AppState`, which is its only writer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub document: Document,
    pub theme: CodeTheme,
}

impl ViewState {
    pub fn new(document: Document, theme: CodeTheme) -> Self {
        Self { document, theme }
    }

    pub fn language(&self) -> Language {
        self.document.language
    }

    /// Returns true when the selection actually changed.
    pub fn select_language(&mut self, language: Language) -> bool {
        if self.document.language == language {
            return false;
        }
        self.document.language = language;
        true
    }

    pub fn select_theme(&mut self, theme: CodeTheme) -> bool {
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        true
    }
}
