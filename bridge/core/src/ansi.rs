//! ANSI Style Renderer
//!
//! Turns a [`RenderedLine`] into one string of text interleaved with SGR
//! escapes (`ESC [ <params> m`). The result always ends with a reset so the
//! multiplexer can splice it anywhere without the style bleeding into what
//! follows.
//!
//! # Layout
//!
//! ```text
//! text:   "NORMAL  main.rs"
//! spans:  @0 red+bold, @6 plain, @8 blue
//!
//! out:    ESC[38;2;255;0;0;1m NORMAL  ESC[0m "  "  ESC[38;2;0;0;255m main.rs  ESC[0m
//!         |---- span @0 ----------|  |- @6 --|  |------- span @8 -------|  final
//! ```
//!
//! Gaps before the first span are emitted after a reset. A span runs until the
//! next span's start, so a highlight group cannot contain an unstyled hole.

use std::fmt::Write as _;

use crate::statusline::{RenderedLine, StyledSpan};

/// SGR reset (`ESC[0m`)
pub const RESET: &str = "\x1b[0m";

/// SGR parameters for a span, in the fixed order fg, bg, bold, italic, underline
///
/// Empty when the span carries no attribute.
#[must_use]
pub fn sgr_params(span: &StyledSpan) -> Vec<String> {
    let mut params = Vec::with_capacity(5);
    if let Some(fg) = span.fg {
        params.push(format!("38;2;{};{};{}", fg.r(), fg.g(), fg.b()));
    }
    if let Some(bg) = span.bg {
        params.push(format!("48;2;{};{};{}", bg.r(), bg.g(), bg.b()));
    }
    if span.bold {
        params.push("1".to_string());
    }
    if span.italic {
        params.push("3".to_string());
    }
    if span.underline {
        params.push("4".to_string());
    }
    params
}

/// Render a statusline to an ANSI escaped string
#[must_use]
pub fn render(line: &RenderedLine) -> String {
    let text = line.text.as_str();
    let len = text.len();
    if text.is_empty() {
        return RESET.repeat(2);
    }

    let mut spans: Vec<&StyledSpan> = line.spans.iter().collect();
    // Stable: spans sharing a start keep the producer's order
    spans.sort_by_key(|span| span.start_offset);

    let mut out = String::with_capacity(len + spans.len() * 24 + RESET.len() * 2);
    let mut pos = 0;

    for (idx, span) in spans.iter().enumerate() {
        let start = char_floor(text, span.start_offset).max(pos);
        let end = spans
            .get(idx + 1)
            .map_or(len, |next| char_floor(text, next.start_offset))
            .max(start);

        if start > pos {
            out.push_str(RESET);
            out.push_str(&text[pos..start]);
        }

        let params = sgr_params(span);
        if params.is_empty() {
            out.push_str(RESET);
        } else {
            // Writing into a String cannot fail
            let _ = write!(out, "\x1b[{}m", params.join(";"));
        }
        out.push_str(&text[start..end]);
        pos = end;
    }

    if pos < len {
        out.push_str(RESET);
        out.push_str(&text[pos..]);
    }

    out.push_str(RESET);
    out
}

/// Clamp `offset` into `text` and move it back onto a char boundary
fn char_floor(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
