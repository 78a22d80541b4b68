/// Marks that close a fragment. The mark stays at the tail of the fragment it closes.
pub const TERMINATORS: [char; 8] = ['。', '！', '？', '；', '：', '，', '、', '\n'];

/// Latin marks that close a fragment only when followed by whitespace or the end of the text,
/// so `3.5` and `a,b` stay intact.
pub const LATIN_TERMINATORS: [char; 6] = ['.', '!', '?', ';', ':', ','];

// Non-terminal punctuation that still carries no reading weight.
const QUIET_MARKS: [char; 22] = [
    '「', '」', '『', '』', '《', '》', '〈', '〉', '（', '）', '【', '】', '“', '”', '‘', '’',
    '…', '—', '·', '～', '．', '　',
];

pub fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || is_terminator(c) || QUIET_MARKS.contains(&c)
}

/// Split `text` into caption fragments.
///
/// A fragment ends after each terminator, and after a Latin mark followed by whitespace. A run of
/// more than `max_chars` characters without a terminator is cut into `max_chars`-sized chunks.
/// Fragments are trimmed; empty ones are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut run = 0usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let latin_end = LATIN_TERMINATORS.contains(&c)
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if is_terminator(c) || latin_end {
            current.push(c);
            flush(&mut out, &mut current);
            run = 0;
            continue;
        }
        if run == max_chars {
            flush(&mut out, &mut current);
            run = 0;
        }
        current.push(c);
        // Leading whitespace is trimmed on flush, so it does not count toward the cap.
        if run > 0 || !c.is_whitespace() {
            run += 1;
        }
    }
    flush(&mut out, &mut current);
    out
}

fn flush(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Reading weight of a fragment: its characters minus whitespace and punctuation.
pub fn fragment_weight(fragment: &str) -> usize {
    fragment
        .chars()
        .filter(|c| !c.is_whitespace() && !is_punctuation(*c))
        .count()
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/split.rs"]
mod tests;
