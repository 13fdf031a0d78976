//! Statusline Data Model
//!
//! A statusline arrives from the host's template evaluator as one line of
//! text plus styled spans. Each span only records where it starts; it runs
//! until the next span starts or the text ends. Producers are free to hand
//! spans back in any order, the renderer sorts them.
//!
//! The types are serde-enabled so a host in another process can send them as
//! JSON:
//!
//! ```json
//! {"text": "NORMAL main.rs", "spans": [{"start": 0, "fg": 16711680, "bold": true}, {"start": 6}]}
//! ```

use serde::{Deserialize, Serialize};

/// 24-bit colour packed as `0xRRGGBB`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Build from individual channels
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Red channel
    #[must_use]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel
    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// A run of text sharing one style
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    /// Byte offset into [`RenderedLine::text`] where the style begins
    #[serde(rename = "start")]
    pub start_offset: usize,
    /// Foreground colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Rgb>,
    /// Background colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Rgb>,
    /// Bold weight
    #[serde(default)]
    pub bold: bool,
    /// Italic
    #[serde(default)]
    pub italic: bool,
    /// Underline
    #[serde(default)]
    pub underline: bool,
}

impl StyledSpan {
    /// Unstyled span starting at `start_offset`
    #[must_use]
    pub fn at(start_offset: usize) -> Self {
        Self {
            start_offset,
            ..Self::default()
        }
    }

    /// Set the foreground colour
    #[must_use]
    pub fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background colour
    #[must_use]
    pub fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    /// Enable bold
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Enable italic
    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Enable underline
    #[must_use]
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Whether the span carries any attribute at all
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.italic && !self.underline
    }
}

/// Evaluated statusline: text plus its style runs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLine {
    /// The statusline text
    pub text: String,
    /// Style runs, in any order
    #[serde(default)]
    pub spans: Vec<StyledSpan>,
}

impl RenderedLine {
    /// Line with the given text and no spans
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Line with text and spans
    pub fn new(text: impl Into<String>, spans: Vec<StyledSpan>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    /// Parse a line from its JSON form
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is not a valid line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
