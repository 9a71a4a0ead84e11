//! Byte-level input and output.
//!
//! Files are split into lines on `\n`, remembering whether each line ended
//! in `\n`, `\r\n` or nothing, and each line is decoded with the declared
//! [`Encoding`]. Encoding reverses this exactly, so a file that passes
//! through unchanged comes back byte for byte.

use crate::config::Encoding;
use crate::error::{RewriteError, RewriteResult};
use crate::models::{LineTerminator, SourceLine};

/// Splits and decodes a file's bytes.
///
/// # Errors
///
/// Returns [`RewriteError::Decode`] for the first line that is not valid
/// UTF-8 when `encoding` is [`Encoding::Utf8`]. Latin-1 decoding cannot
/// fail.
///
/// # Example
///
/// ```
/// use contribution_rewriter::config::Encoding;
/// use contribution_rewriter::encoding::decode_lines;
/// use contribution_rewriter::models::LineTerminator;
///
/// let lines = decode_lines(b"one\r\ntw\xf3", Encoding::Latin1, "input.txt")?;
/// assert_eq!(lines[0].text, "one");
/// assert_eq!(lines[0].terminator, LineTerminator::CrLf);
/// assert_eq!(lines[1].text, "twó");
/// assert_eq!(lines[1].terminator, LineTerminator::None);
/// # Ok::<(), contribution_rewriter::error::RewriteError>(())
/// ```
pub fn decode_lines(
    bytes: &[u8],
    encoding: Encoding,
    file: &str,
) -> RewriteResult<Vec<SourceLine>> {
    let mut lines = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let (raw, terminator, remaining) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let line = &rest[..end];
                match line.strip_suffix(b"\r") {
                    Some(stripped) => (stripped, LineTerminator::CrLf, &rest[end + 1..]),
                    None => (line, LineTerminator::Lf, &rest[end + 1..]),
                }
            }
            None => (rest, LineTerminator::None, &rest[rest.len()..]),
        };

        let text = decode(raw, encoding).ok_or_else(|| RewriteError::Decode {
            file: file.to_string(),
            line_number: lines.len() + 1,
            encoding: encoding.name().to_string(),
        })?;
        lines.push(SourceLine::new(text, terminator));
        rest = remaining;
    }

    Ok(lines)
}

fn decode(raw: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(raw).ok().map(str::to_string),
        Encoding::Latin1 => Some(raw.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Encodes lines and their terminators back into bytes.
///
/// Characters outside Latin-1 are written as `?` when encoding Latin-1;
/// this cannot happen for lines that were decoded as Latin-1.
///
/// # Example
///
/// ```
/// use contribution_rewriter::config::Encoding;
/// use contribution_rewriter::encoding::encode_lines;
/// use contribution_rewriter::models::{LineTerminator, SourceLine};
///
/// let lines = vec![
///     SourceLine::new("a", LineTerminator::Lf),
///     SourceLine::new("ñ", LineTerminator::None),
/// ];
/// assert_eq!(encode_lines(&lines, Encoding::Latin1), b"a\n\xf1");
/// assert_eq!(encode_lines(&lines, Encoding::Utf8), "a\nñ".as_bytes());
/// ```
pub fn encode_lines(lines: &[SourceLine], encoding: Encoding) -> Vec<u8> {
    let capacity = lines.iter().map(|line| line.text.len() + 2).sum();
    let mut out = Vec::with_capacity(capacity);

    for line in lines {
        match encoding {
            Encoding::Utf8 => out.extend_from_slice(line.text.as_bytes()),
            Encoding::Latin1 => out.extend(
                line.text
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
            ),
        }
        out.extend_from_slice(line.terminator.as_str().as_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminators_are_detected_per_line() {
        let lines = decode_lines(b"a\nb\r\nc", Encoding::Utf8, "f").unwrap();
        let terminators: Vec<LineTerminator> = lines.iter().map(|l| l.terminator).collect();
        assert_eq!(
            terminators,
            vec![LineTerminator::Lf, LineTerminator::CrLf, LineTerminator::None]
        );
    }

    #[test]
    fn test_trailing_newline_does_not_add_a_line() {
        let lines = decode_lines(b"a\nb\n", Encoding::Utf8, "f").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].terminator, LineTerminator::Lf);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let lines = decode_lines(b"\n\n", Encoding::Utf8, "f").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.text.is_empty()));
        assert!(decode_lines(b"", Encoding::Utf8, "f").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let err = decode_lines(b"ok\nbad \xff\n", Encoding::Utf8, "input.txt").unwrap_err();
        match err {
            RewriteError::Decode {
                file,
                line_number,
                encoding,
            } => {
                assert_eq!(file, "input.txt");
                assert_eq!(line_number, 2);
                assert_eq!(encoding, "utf-8");
            }
            other => panic!("expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_latin1_is_one_char_per_byte() {
        let bytes: Vec<u8> = (0u8..=255).filter(|&b| b != b'\n').collect();
        let lines = decode_lines(&bytes, Encoding::Latin1, "f").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text.chars().count(), bytes.len());
        assert_eq!(encode_lines(&lines, Encoding::Latin1), bytes);
    }

    #[test]
    fn test_bytes_survive_a_round_trip() {
        let input = b"first\r\nsecond\n\nlast".to_vec();
        for encoding in [Encoding::Utf8, Encoding::Latin1] {
            let lines = decode_lines(&input, encoding, "f").unwrap();
            assert_eq!(encode_lines(&lines, encoding), input);
        }
    }

    #[test]
    fn test_latin1_unencodable_becomes_question_mark() {
        let lines = vec![SourceLine::from("€")];
        assert_eq!(encode_lines(&lines, Encoding::Latin1), b"?");
    }
}
