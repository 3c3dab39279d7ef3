//! Line-oriented SPDX tag-value reader.
//!
//! Emits `(tag, value)` pairs to a callback and knows nothing about SPDX
//! semantics; the import builder interprets the tags.

use std::io::BufRead;

use crate::error::FormatError;

/// Reads `Tag: value` pairs from the stream, invoking `callback` per pair.
///
/// Blank lines and `#` comment lines are skipped. A value starting with
/// `<text>` spans lines until `</text>`; the enclosed text is passed
/// verbatim, joined with `\n`. Line numbers in errors are 1-based. The
/// callback aborts the parse by returning a problem description, which is
/// reported against the line that completed the value.
pub fn parse<R, F>(reader: R, mut callback: F) -> Result<(), FormatError>
where
    R: BufRead,
    F: FnMut(&str, &str) -> Result<(), String>,
{
    // (line that opened the span, tag, text accumulated so far)
    let mut span: Option<(usize, String, String)> = None;

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line?;

        if let Some((opened, tag, mut text)) = span.take() {
            match line.find("</text>") {
                Some(pos) => {
                    text.push('\n');
                    text.push_str(&line[..pos]);
                    callback(&tag, &text)
                        .map_err(|detail| FormatError::Value { line: number, detail })?;
                }
                None => {
                    text.push('\n');
                    text.push_str(&line);
                    span = Some((opened, tag, text));
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((tag, value)) = line.split_once(':') else {
            return Err(FormatError::Syntax { line: number });
        };
        let tag = tag.trim();
        if tag.is_empty() || tag.contains(char::is_whitespace) {
            return Err(FormatError::Syntax { line: number });
        }

        let value = value.trim_start();
        let emit = |value: &str, callback: &mut F| {
            callback(tag, value).map_err(|detail| FormatError::Value { line: number, detail })
        };
        match value.strip_prefix("<text>") {
            Some(rest) => match rest.find("</text>") {
                Some(pos) => emit(&rest[..pos], &mut callback)?,
                None => span = Some((number, tag.to_owned(), rest.to_owned())),
            },
            None => emit(value.trim_end(), &mut callback)?,
        }
    }

    match span {
        Some((opened, _, _)) => Err(FormatError::UnterminatedText { line: opened }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        parse(input.as_bytes(), |tag, value| {
            pairs.push((tag.to_owned(), value.to_owned()));
            Ok(())
        })
        .unwrap();
        pairs
    }

    fn pair(tag: &str, value: &str) -> (String, String) {
        (tag.to_owned(), value.to_owned())
    }

    #[test]
    fn parses_tag_value_lines() {
        let pairs = parse_all("Tag: Value\nOther:Indented value");

        assert_eq!(
            pairs,
            vec![pair("Tag", "Value"), pair("Other", "Indented value")]
        );
    }

    #[test]
    fn trims_around_tag_and_value() {
        let pairs = parse_all("  Tag  :   Value   ");

        assert_eq!(pairs, vec![pair("Tag", "Value")]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let pairs = parse_all("\n   \n# Comment\nTag: Value\n");

        assert_eq!(pairs, vec![pair("Tag", "Value")]);
    }

    #[test]
    fn rejects_line_without_separator() {
        let err = parse("Tag: Value\nGarbage".as_bytes(), |_, _| Ok(())).unwrap_err();

        assert_eq!(err.to_string(), "Line 2: not in tag-value format");
    }

    #[test]
    fn rejects_tag_containing_whitespace() {
        let err = parse("Not a tag: Value".as_bytes(), |_, _| Ok(())).unwrap_err();

        assert!(err.to_string().contains("Line 1"), "{}", err);
    }

    #[test]
    fn parses_single_line_text_value() {
        let pairs = parse_all("Tag: <text>Value</text>");

        assert_eq!(pairs, vec![pair("Tag", "Value")]);
    }

    #[test]
    fn merges_multi_line_text_value() {
        let pairs = parse_all("Tag: <text>First \nSecond\n \n Third</text>\nNext: Value");

        assert_eq!(
            pairs,
            vec![pair("Tag", "First \nSecond\n \n Third"), pair("Next", "Value")]
        );
    }

    #[test]
    fn text_span_keeps_lines_verbatim() {
        let pairs = parse_all("Tag: <text>\n# not a comment\nTag: not a tag\n</text>");

        assert_eq!(pairs, vec![pair("Tag", "\n# not a comment\nTag: not a tag\n")]);
    }

    #[test]
    fn unterminated_text_names_the_opening_line() {
        let err = parse("First: Value\nTag: <text>Oops".as_bytes(), |_, _| Ok(())).unwrap_err();

        assert_eq!(err.to_string(), "Line 2: <text> value is never closed");
    }

    #[test]
    fn callback_error_aborts_with_the_current_line() {
        let mut seen = 0;
        let err = parse("A: 1\nB: 2\nC: 3".as_bytes(), |tag, _| {
            seen += 1;
            if tag == "B" {
                return Err("rejected".to_owned());
            }
            Ok(())
        })
        .unwrap_err();

        assert_eq!(seen, 2);
        assert_eq!(err.to_string(), "Line 2: rejected");
    }
}
