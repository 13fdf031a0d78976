//! Base64 Transport Codec
//!
//! Statusline payloads are ANSI strings full of ESC bytes. Embedded raw inside
//! an OSC frame they would terminate or corrupt the frame, so they travel as
//! standard RFC 4648 base64 (`A-Z a-z 0-9 + /`, `=` padding). Only the encode
//! direction lives here; the multiplexer decodes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode bytes as padded standard base64
#[must_use]
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Length of the encoded form of `n` input bytes: `ceil(n / 3) * 4`
#[must_use]
pub const fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // RFC 4648 section 10
    const VECTORS: &[(&str, &str)] = &[
        ("", ""),
        ("f", "Zg=="),
        ("fo", "Zm8="),
        ("foo", "Zm9v"),
        ("foob", "Zm9vYg=="),
        ("fooba", "Zm9vYmE="),
        ("foobar", "Zm9vYmFy"),
    ];

    #[test]
    fn test_rfc4648_vectors() {
        for (input, expected) in VECTORS {
            assert_eq!(encode(input.as_bytes()), *expected, "input {input:?}");
        }
    }

    #[test]
    fn test_length_and_padding_follow_input_length() {
        let data: Vec<u8> = (0..=255u8).collect();
        for n in 0..data.len() {
            let out = encode(&data[..n]);
            assert_eq!(out.len(), encoded_len(n), "n = {n}");

            let padding = out.chars().rev().take_while(|c| *c == '=').count();
            let expected = match n % 3 {
                0 => 0,
                1 => 2,
                _ => 1,
            };
            assert_eq!(padding, expected, "n = {n}");
        }
    }

    #[test]
    fn test_alphabet_is_standard() {
        let data: Vec<u8> = (0..=255u8).collect();
        let out = encode(&data);
        assert!(out
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
        // 0xFB 0xFF maps onto the two non-alphanumeric symbols
        assert_eq!(encode(&[0xFB, 0xFF]), "+/8=");
    }

    #[test]
    fn test_roundtrip_through_conforming_decoder() {
        let samples: [&[u8]; 4] = [
            b"",
            b"\x1b[38;2;255;0;0mNORMAL\x1b[0m",
            "main.rs \u{e0b0} 42:7".as_bytes(),
            &[0, 1, 2, 253, 254, 255, 0x07, 0x1b],
        ];
        for sample in samples {
            let decoded = STANDARD.decode(encode(sample)).unwrap();
            assert_eq!(decoded, sample);
        }
    }

    #[test]
    fn test_output_never_contains_frame_control_bytes() {
        let out = encode(b"\x1b]51;statusline;\x07");
        assert!(!out.contains('\x1b'));
        assert!(!out.contains('\x07'));
        assert!(!out.contains(';'));
    }
}
