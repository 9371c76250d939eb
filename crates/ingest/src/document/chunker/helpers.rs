//! Boundary search used by the chunking strategy.

/// Pick the end (exclusive) of a window over `chars`.
///
/// Candidates lie in `floor..=hard_end`. A paragraph break wins over a
/// sentence end, which wins over whitespace; with none of those the window is
/// cut at `hard_end`. The latest candidate of the winning kind is used.
pub(crate) fn find_break(chars: &[char], floor: usize, hard_end: usize) -> usize {
    let floor = floor.max(1);
    if floor > hard_end {
        return hard_end;
    }

    if let Some(b) = rfind(floor, hard_end, |b| is_paragraph_end(chars, b)) {
        return b;
    }
    if let Some(b) = rfind(floor, hard_end, |b| is_sentence_end(chars, b)) {
        return b;
    }
    if let Some(b) = rfind(floor, hard_end, |b| is_word_end(chars, b)) {
        return b;
    }
    hard_end
}

fn rfind(floor: usize, hard_end: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
    (floor..=hard_end).rev().find(|&b| pred(b))
}

/// `b` sits right after a blank line (`\n\n`).
fn is_paragraph_end(chars: &[char], b: usize) -> bool {
    b >= 2 && chars[b - 1] == '\n' && chars[b - 2] == '\n'
}

/// `b` sits right after `.`, `!` or `?` that is followed by whitespace.
fn is_sentence_end(chars: &[char], b: usize) -> bool {
    matches!(chars[b - 1], '.' | '!' | '?') && chars.get(b).map_or(true, |c| c.is_whitespace())
}

/// `b` sits on whitespace, so the window ends on a whole word.
fn is_word_end(chars: &[char], b: usize) -> bool {
    chars.get(b).map_or(true, |c| c.is_whitespace())
}

/// Collect `chars[start..end]` into a `String`.
pub(crate) fn slice(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}
