use super::breaker::break_long_word;
use crate::measure::Measure;
use crate::units::Pt;

/// Splits `text` into paragraphs at every line boundary: `\n`, `\r\n`, a lone `\r`,
/// vertical tab, form feed, the file/group/record separators, NEL and the Unicode line
/// and paragraph separators. A trailing boundary does not start another paragraph.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        paragraphs.push(&text[start..i]);
        start = i + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        paragraphs.push(&text[start..]);
    }

    paragraphs
}

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Greedily wraps `text` so that no line is wider than `max_width` at `size`.
///
/// Each of the [paragraphs] of `text` is wrapped on its own. Words inside a paragraph are re-flowed
/// with single spaces between them, so the original spacing is not kept. A blank
/// paragraph becomes exactly one empty output line. Words wider than `max_width` are
/// broken with [break_long_word] first, which is also the only way a line can end up
/// wider than `max_width` (a lone character that doesn't fit).
pub fn wrap_lines<M: Measure + ?Sized>(
    text: &str,
    font: &M,
    size: Pt,
    max_width: Pt,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for paragraph in paragraphs(text) {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in break_long_word(word, font, size, max_width) {
                let candidate = if current.is_empty() {
                    piece.clone()
                } else {
                    format!("{current} {piece}")
                };

                if font.measure(&candidate, size) <= max_width {
                    current = candidate;
                } else {
                    if !current.is_empty() {
                        lines.push(current);
                    }
                    current = piece;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Same as [wrap_lines], with the lines joined by `\n`
pub fn wrap_text<M: Measure + ?Sized>(text: &str, font: &M, size: Pt, max_width: Pt) -> String {
    wrap_lines(text, font, size, max_width).join("\n")
}
