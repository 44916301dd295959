//! Word-preserving text wrapping.
//!
//! Two independent policies: a character budget per line and a word count per
//! line. Neither ever splits a word — a single word longer than the character
//! budget stands alone on its own line, over budget. Both are pure functions;
//! the empty (or whitespace-only) input yields exactly one empty line so that
//! downstream height math always sees at least one line.

/// Wraps `text` into lines of at most `max_chars` characters.
///
/// Greedy fill: the next word joins the current line while
/// `line.len() + 1 + word.len() <= max_chars`, otherwise it opens a new line.
pub fn wrap_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for word in words {
        if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

/// Wraps `text` into lines of at most `max_words` words.
pub fn wrap_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    words
        .chunks(max_words.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}
