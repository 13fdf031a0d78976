//! Frame Protocol
//!
//! Wire format for editor-to-multiplexer commands, carried as OSC 51 escape
//! sequences in the terminal output stream.
//!
//! # Frame Format
//!
//! ```text
//! ESC ] 51 ; <command> ; <payload> BEL
//!
//!   ESC      0x1B
//!   BEL      0x07 (the only terminator; ST `ESC \` is never produced)
//!   command  "navigate" | "statusline"
//!   payload  navigate:          up | down | left | right
//!            statusline set:    b64:<base64 of the ANSI string>
//!            statusline clear:  (empty)
//! ```
//!
//! The multiplexer rejects any other terminator form, so BEL is fixed.

use crate::codec;
use crate::direction::Direction;

/// Escape byte that opens the OSC introducer
pub const ESC: u8 = 0x1B;

/// Bell byte terminating every frame
pub const BEL: u8 = 0x07;

/// OSC introducer including the command number and its separator
pub const OSC_PREFIX: &[u8] = b"\x1b]51;";

/// Marker that prefixes a base64 encoded payload
pub const BASE64_MARKER: &str = "b64:";

/// Which command a frame carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Ask the multiplexer to move pane focus
    Navigate,
    /// Replace the mirrored statusline
    StatuslineSet,
    /// Remove the mirrored statusline
    StatuslineClear,
}

impl FrameKind {
    /// Command name written into the frame
    #[must_use]
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::StatuslineSet | Self::StatuslineClear => "statusline",
        }
    }
}

/// How the payload bytes are written into the frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Verbatim; only safe for payloads without control bytes or `;`
    Raw,
    /// `b64:` followed by standard base64
    Base64,
}

/// A single command, built and serialised in one go
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolFrame {
    /// Command carried by this frame
    pub kind: FrameKind,
    /// Payload bytes before encoding
    pub payload: Option<Vec<u8>>,
    /// Payload encoding
    pub encoding: PayloadEncoding,
}

impl ProtocolFrame {
    /// Navigation request carrying the direction name
    #[must_use]
    pub fn navigate(direction: Direction) -> Self {
        Self {
            kind: FrameKind::Navigate,
            payload: Some(direction.as_str().as_bytes().to_vec()),
            encoding: PayloadEncoding::Raw,
        }
    }

    /// Statusline update; the content is base64 encoded on the wire
    #[must_use]
    pub fn statusline(content: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FrameKind::StatuslineSet,
            payload: Some(content.into()),
            encoding: PayloadEncoding::Base64,
        }
    }

    /// Statusline clear (empty payload)
    #[must_use]
    pub fn statusline_clear() -> Self {
        Self {
            kind: FrameKind::StatuslineClear,
            payload: None,
            encoding: PayloadEncoding::Raw,
        }
    }

    /// Serialise to the exact wire bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let command = self.kind.command_name();
        let payload = self.payload.as_deref().unwrap_or_default();

        let body_len = match self.encoding {
            PayloadEncoding::Raw => payload.len(),
            PayloadEncoding::Base64 => BASE64_MARKER.len() + codec::encoded_len(payload.len()),
        };
        let mut buf = Vec::with_capacity(OSC_PREFIX.len() + command.len() + 2 + body_len);

        buf.extend_from_slice(OSC_PREFIX);
        buf.extend_from_slice(command.as_bytes());
        buf.push(b';');
        if self.kind != FrameKind::StatuslineClear {
            match self.encoding {
                PayloadEncoding::Raw => buf.extend_from_slice(payload),
                PayloadEncoding::Base64 => {
                    buf.extend_from_slice(BASE64_MARKER.as_bytes());
                    buf.extend_from_slice(codec::encode(payload).as_bytes());
                }
            }
        }
        buf.push(BEL);
        buf
    }
}

/// A frame as seen on the wire, before payload decoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireFrame {
    /// Command name (`navigate`, `statusline`, or anything else found)
    pub command: String,
    /// Payload text exactly as written, including any `b64:` marker
    pub payload: String,
}

impl WireFrame {
    /// Base64 text of the payload when it carries the `b64:` marker
    #[must_use]
    pub fn base64_payload(&self) -> Option<&str> {
        self.payload.strip_prefix(BASE64_MARKER)
    }
}

/// Split a captured output stream into the OSC 51 frames it contains
///
/// Bytes outside frames are skipped. A trailing frame without its BEL is
/// incomplete and ignored, as is anything terminated by ST instead of BEL.
#[must_use]
pub fn decode_stream(bytes: &[u8]) -> Vec<WireFrame> {
    let mut frames = Vec::new();
    let mut rest = bytes;

    while let Some(start) = find(rest, OSC_PREFIX) {
        let body = &rest[start + OSC_PREFIX.len()..];
        let Some(end) = body.iter().position(|b| *b == BEL || *b == ESC) else {
            break;
        };
        if body[end] == BEL {
            let text = String::from_utf8_lossy(&body[..end]);
            if let Some((command, payload)) = text.split_once(';') {
                frames.push(WireFrame {
                    command: command.to_string(),
                    payload: payload.to_string(),
                });
            }
        }
        rest = if body[end] == ESC && body.get(end + 1) != Some(&b'\\') {
            // Unterminated frame cut off by the next escape sequence
            &body[end..]
        } else {
            &body[end + 1..]
        };
    }

    frames
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_navigate_frame_bytes() {
        assert_eq!(
            ProtocolFrame::navigate(Direction::Left).encode(),
            b"\x1b]51;navigate;left\x07".to_vec()
        );
        assert_eq!(
            ProtocolFrame::navigate(Direction::Up).encode(),
            b"\x1b]51;navigate;up\x07".to_vec()
        );
    }

    #[test]
    fn test_statusline_frame_is_base64_encoded() {
        let frame = ProtocolFrame::statusline("foobar");
        assert_eq!(frame.encode(), b"\x1b]51;statusline;b64:Zm9vYmFy\x07".to_vec());
    }

    #[test]
    fn test_statusline_frame_hides_escape_bytes() {
        let encoded = ProtocolFrame::statusline("\x1b[1mX\x1b[0m\x07").encode();
        // Only the introducer ESC and the terminating BEL remain
        assert_eq!(encoded.iter().filter(|b| **b == ESC).count(), 1);
        assert_eq!(encoded.iter().filter(|b| **b == BEL).count(), 1);
        assert_eq!(encoded.last(), Some(&BEL));
    }

    #[test]
    fn test_clear_frame_has_empty_payload() {
        assert_eq!(
            ProtocolFrame::statusline_clear().encode(),
            b"\x1b]51;statusline;\x07".to_vec()
        );
    }

    #[test]
    fn test_raw_statusline_payload_is_verbatim() {
        let frame = ProtocolFrame {
            kind: FrameKind::StatuslineSet,
            payload: Some(b"plain".to_vec()),
            encoding: PayloadEncoding::Raw,
        };
        assert_eq!(frame.encode(), b"\x1b]51;statusline;plain\x07".to_vec());
    }

    #[test]
    fn test_never_uses_string_terminator() {
        for frame in [
            ProtocolFrame::navigate(Direction::Right),
            ProtocolFrame::statusline("x"),
            ProtocolFrame::statusline_clear(),
        ] {
            let bytes = frame.encode();
            assert!(!bytes.ends_with(b"\x1b\\"));
            assert_eq!(bytes.last(), Some(&BEL));
        }
    }

    #[test]
    fn test_decode_stream_finds_frames_between_other_output() {
        let mut stream = b"hello".to_vec();
        stream.extend(ProtocolFrame::navigate(Direction::Down).encode());
        stream.extend(b"\x1b[2J");
        stream.extend(ProtocolFrame::statusline("hi").encode());
        stream.extend(ProtocolFrame::statusline_clear().encode());

        let frames = decode_stream(&stream);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].command, "navigate");
        assert_eq!(frames[0].payload, "down");
        assert_eq!(frames[1].base64_payload(), Some("aGk="));
        assert_eq!(frames[2].payload, "");
        assert_eq!(frames[2].base64_payload(), None);
    }

    #[test]
    fn test_decode_stream_keeps_frame_after_unterminated_one() {
        let mut stream = b"\x1b]51;navigate;do".to_vec();
        stream.extend(ProtocolFrame::navigate(Direction::Up).encode());
        stream.extend(b"\x1b]51;statusline;b64:eA==\x1b[0m");
        stream.extend(ProtocolFrame::statusline_clear().encode());

        let frames = decode_stream(&stream);
        assert_eq!(
            frames,
            vec![
                WireFrame {
                    command: "navigate".to_string(),
                    payload: "up".to_string(),
                },
                WireFrame {
                    command: "statusline".to_string(),
                    payload: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_decode_stream_ignores_st_terminated_and_partial_frames() {
        let mut stream = b"\x1b]51;navigate;up\x1b\\".to_vec();
        stream.extend(b"\x1b]51;navigate;do");

        assert!(decode_stream(&stream).is_empty());
    }
}
