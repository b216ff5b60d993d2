//! Line-numbered code highlighting with syntect
//!
//! [`highlight_code`] never fails. A language syntect does not know, or a
//! line it chokes on, yields the same numbered lines as plain text in the
//! theme's foreground color. Either way the line texts joined with `\n`
//! equal the input.
//!
//! ```
//! use slidemark::markdown::syntax::highlight_code;
//!
//! let code = highlight_code("fn main() {}", "rust", "base16-ocean.dark", true);
//! assert_eq!(code.lines[0].number, 1);
//! assert_eq!(code.text_content(), "fn main() {}");
//! ```

use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

/// Foreground for themes that do not define one
const NEUTRAL_FOREGROUND: Rgba = Rgba::new(0xc0, 0xc5, 0xce, 0xff);

/// Fence tags that differ from the file extension syntect indexes by.
const LANGUAGE_ALIASES: &[(&[&str], &str)] = &[
    (&["rust"], "rs"),
    (&["python"], "py"),
    (&["javascript"], "js"),
    (&["typescript"], "ts"),
    (&["c++", "cxx"], "cpp"),
    (&["csharp", "c#"], "cs"),
    (&["fsharp"], "fs"),
    (&["golang"], "go"),
    (&["ruby"], "rb"),
    (&["htm"], "html"),
    (&["yml"], "yaml"),
    (&["markdown"], "md"),
    (&["shell", "bash", "zsh"], "sh"),
    (&["makefile", "make"], "Makefile"),
    (&["perl"], "pl"),
    (&["haskell"], "hs"),
    (&["erlang"], "erl"),
    (&["clojure"], "clj"),
    (&["patch"], "diff"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Output types
// ─────────────────────────────────────────────────────────────────────────────

/// Why a block came out unstyled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// No syntax matched the fence tag
    UnknownLanguage(String),
    /// syntect failed partway; `number` is 1-based
    Line { number: usize, message: String },
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::UnknownLanguage(tag) => write!(f, "no syntax for language '{tag}'"),
            HighlightError::Line { number, message } => {
                write!(f, "line {number} could not be highlighted: {message}")
            }
        }
    }
}

impl std::error::Error for HighlightError {}

/// 8-bit color as syntect reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `rgb(r, g, b)`; alpha is dropped.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgba {
    fn from(c: Color) -> Self {
        Rgba::new(c.r, c.g, c.b, c.a)
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedSegment {
    /// Never contains a newline
    pub text: String,
    pub foreground: Rgba,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl HighlightedSegment {
    fn styled(style: Style, text: &str) -> Self {
        let font = style.font_style;
        Self {
            text: text.to_owned(),
            foreground: style.foreground.into(),
            bold: font.contains(FontStyle::BOLD),
            italic: font.contains(FontStyle::ITALIC),
            underline: font.contains(FontStyle::UNDERLINE),
        }
    }

    fn unstyled(text: &str, foreground: Rgba) -> Self {
        Self {
            text: text.to_owned(),
            foreground,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedLine {
    /// Starts at 1
    pub number: usize,
    /// Without the trailing newline
    pub segments: Vec<HighlightedSegment>,
}

impl HighlightedLine {
    pub fn text(&self) -> String {
        self.segments.iter().map(|seg| seg.text.as_str()).collect()
    }
}

/// Output of one highlight call.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedCode {
    /// Fence tag as written
    pub language: String,
    /// syntect syntax that styled the block; `None` for plain output
    pub syntax_name: Option<String>,
    /// One entry per `\n`-separated line of the input, numbered from 1
    pub lines: Vec<HighlightedLine>,
    /// Theme background, when the theme sets one
    pub background: Option<Rgba>,
    /// Theme foreground; also the color of unstyled segments
    pub foreground: Rgba,
}

impl HighlightedCode {
    pub fn is_styled(&self) -> bool {
        self.syntax_name.is_some()
    }

    /// The original source.
    pub fn text_content(&self) -> String {
        let texts: Vec<String> = self.lines.iter().map(HighlightedLine::text).collect();
        texts.join("\n")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Loaded syntect syntaxes and themes.
///
/// Loading takes long enough that one shared instance is kept in
/// [`get_highlighter`].
pub struct SyntaxHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();
        debug!(
            "syntect ready: {} syntaxes, {} themes",
            syntaxes.syntaxes().len(),
            themes.themes.len()
        );
        Self { syntaxes, themes }
    }

    pub fn available_themes(&self) -> Vec<&str> {
        self.themes.themes.keys().map(String::as_str).collect()
    }

    /// `name` if it exists, else the default for the mode, else any theme.
    pub fn resolve_theme(&self, name: &str, dark_mode: bool) -> Option<&Theme> {
        let fallback = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        let themes = &self.themes.themes;
        themes
            .get(name)
            .or_else(|| themes.get(fallback))
            .or_else(|| themes.values().next())
    }

    /// Resolve a fence tag to a syntax.
    ///
    /// Aliases map to extensions first; then the tag is tried as an
    /// extension, as an exact syntax name, and as a case-insensitive name.
    pub fn syntax_for(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let tag = language.to_lowercase();
        let extension = LANGUAGE_ALIASES
            .iter()
            .find(|(names, _)| names.contains(&tag.as_str()))
            .map_or(tag.as_str(), |(_, ext)| *ext);

        self.syntaxes
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntaxes.find_syntax_by_name(language))
            .or_else(|| {
                self.syntaxes
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.eq_ignore_ascii_case(&tag))
            })
    }

    /// Styled lines for `code`, or the reason styling was not possible.
    pub fn try_highlight(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<HighlightedLine>, HighlightError> {
        let mut state = HighlightLines::new(syntax, theme);
        let mut line_buf = String::new();

        code.split('\n')
            .zip(1..)
            .map(|(line, number)| {
                line_buf.clear();
                line_buf.push_str(line);
                line_buf.push('\n');
                let ranges = state
                    .highlight_line(&line_buf, &self.syntaxes)
                    .map_err(|err| HighlightError::Line {
                        number,
                        message: err.to_string(),
                    })?;
                let segments = ranges
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(style, text)| HighlightedSegment::styled(style, text))
                    .collect();
                Ok(HighlightedLine { number, segments })
            })
            .collect()
    }

    /// Highlight `code`, degrading to plain lines on any failure.
    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        theme_name: &str,
        dark_mode: bool,
    ) -> HighlightedCode {
        let Some(theme) = self.resolve_theme(theme_name, dark_mode) else {
            warn!("No syntect themes loaded; code stays plain");
            return plain(code, language, None, NEUTRAL_FOREGROUND);
        };
        let foreground = theme.settings.foreground.map_or(NEUTRAL_FOREGROUND, Rgba::from);
        let background = theme.settings.background.map(Rgba::from);

        let outcome = self
            .syntax_for(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_owned()))
            .and_then(|syntax| {
                let lines = self.try_highlight(code, syntax, theme)?;
                Ok((syntax.name.clone(), lines))
            });

        match outcome {
            Ok((syntax_name, lines)) => HighlightedCode {
                language: language.to_owned(),
                syntax_name: Some(syntax_name),
                lines,
                background,
                foreground,
            },
            Err(err) => {
                if matches!(err, HighlightError::UnknownLanguage(_)) {
                    debug!("{err}");
                } else {
                    warn!("{err}");
                }
                plain(code, language, background, foreground)
            }
        }
    }
}

fn plain(code: &str, language: &str, background: Option<Rgba>, foreground: Rgba) -> HighlightedCode {
    let lines = code
        .split('\n')
        .zip(1..)
        .map(|(text, number)| HighlightedLine {
            number,
            segments: vec![HighlightedSegment::unstyled(text, foreground)],
        })
        .collect();
    HighlightedCode {
        language: language.to_owned(),
        syntax_name: None,
        lines,
        background,
        foreground,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Process-wide highlighter, loaded on first call.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

/// Highlight with the shared highlighter.
///
/// `dark_mode` only matters when `theme_name` is not a known theme.
pub fn highlight_code(
    code: &str,
    language: &str,
    theme_name: &str,
    dark_mode: bool,
) -> HighlightedCode {
    get_highlighter().highlight(code, language, theme_name, dark_mode)
}
