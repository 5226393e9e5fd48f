use crate::measure::Measure;
use crate::units::Pt;

/// Splits a word that is too wide for `max_width` into pieces that each fit.
///
/// Concatenating the pieces gives back `word` exactly. Characters are never split, so
/// if a single character is wider than `max_width` it is still emitted as its own
/// piece and will overflow.
pub fn break_long_word<M: Measure + ?Sized>(
    word: &str,
    font: &M,
    size: Pt,
    max_width: Pt,
) -> Vec<String> {
    if word.is_empty() {
        return Vec::new();
    }
    if font.measure(word, size) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);

        // an empty piece always takes the character, even if it doesn't fit on its own
        if !current.is_empty() && font.measure(&candidate, size) > max_width {
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
