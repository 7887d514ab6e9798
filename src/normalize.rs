//! OCR text normalization.
//!
//! Screenshot OCR output is noisy: emoji, box-drawing artifacts, stray
//! unicode punctuation. Everything downstream (scope gate, lexicon,
//! text features) operates on the normalized form produced here.

/// Punctuation allowed to survive normalization.
fn is_permitted_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | '-')
}

/// Normalize raw OCR text: keep ASCII letters, digits, whitespace and
/// `. , ! ? -`; collapse whitespace runs to a single space; trim.
/// Empty input yields an empty string, never an error.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if !c.is_ascii() {
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || is_permitted_punct(c)) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Join recognized word texts in reading order before normalization.
pub fn join_words<'a, I: IntoIterator<Item = &'a str>>(texts: I) -> String {
    let mut s = String::new();
    for t in texts {
        if !s.is_empty() {
            s.push(' ');
        }
        s.push_str(t);
    }
    s
}
