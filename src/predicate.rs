//! Single-byte predicates and zero-width anchors.
//!
//! Two process-wide constant tables back the pattern syntax: one for the
//! backslash escapes (`\s`, `\d`, `\b`, ...) and one for the unescaped
//! metacharacters (`^`, `$`, `.`). Tokens reference an entry by table
//! index; the tables are the only place that knows what each predicate
//! means.

pub(crate) type MatchFn = fn(&[u8], usize) -> Option<usize>;

/// One table entry: the pattern byte that names the predicate and the
/// function that tests it. On success the function returns the number of
/// bytes consumed: 0 for zero-width predicates, 2 for a CRLF newline,
/// otherwise 1.
pub(crate) struct Predicate {
    pub pattern: u8,
    pub matches: MatchFn,
}

/// Predicates reachable through a backslash escape, in table order.
pub(crate) const ESCAPES: [Predicate; 9] = [
    Predicate { pattern: b's', matches: whitespace },
    Predicate { pattern: b'S', matches: not_whitespace },
    Predicate { pattern: b'd', matches: digit },
    Predicate { pattern: b'D', matches: not_digit },
    Predicate { pattern: b'w', matches: word },
    Predicate { pattern: b'W', matches: not_word },
    Predicate { pattern: b'R', matches: newline },
    Predicate { pattern: b'b', matches: word_boundary },
    Predicate { pattern: b'B', matches: not_word_boundary },
];

/// Unescaped metacharacter predicates, in table order.
pub(crate) const METACHARS: [Predicate; 3] = [
    Predicate { pattern: b'^', matches: start_of_input },
    Predicate { pattern: b'$', matches: end_of_input },
    Predicate { pattern: b'.', matches: any_byte },
];

/// Table index of the escape predicate named by `b`, if any.
pub(crate) fn escape_index(b: u8) -> Option<usize> {
    ESCAPES.iter().position(|p| p.pattern == b)
}

/// Table index of the metacharacter predicate named by `b`, if any.
pub(crate) fn metachar_index(b: u8) -> Option<usize> {
    METACHARS.iter().position(|p| p.pattern == b)
}

/// Alphanumeric or underscore.
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The C-locale whitespace set: space, `\t`, `\n`, `\v`, `\f`, `\r`.
/// Note `\v` (0x0B), which `u8::is_ascii_whitespace` leaves out.
pub(crate) fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn whitespace(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && is_space_byte(text[i])).then_some(1)
}

fn not_whitespace(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && !is_space_byte(text[i])).then_some(1)
}

fn digit(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && text[i].is_ascii_digit()).then_some(1)
}

fn not_digit(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && !text[i].is_ascii_digit()).then_some(1)
}

fn word(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && is_word_byte(text[i])).then_some(1)
}

fn not_word(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len() && !is_word_byte(text[i])).then_some(1)
}

/// CRLF counts as a single two-byte newline; a bare LF as one byte.
fn newline(text: &[u8], i: usize) -> Option<usize> {
    match text.get(i) {
        Some(b'\r') if text.get(i + 1) == Some(&b'\n') => Some(2),
        Some(b'\n') => Some(1),
        _ => None,
    }
}

/// Word-ness of the byte before position `i`; start of input is non-word.
fn word_before(text: &[u8], i: usize) -> bool {
    i > 0 && is_word_byte(text[i - 1])
}

/// Word-ness of the byte at position `i`; end of input is non-word.
fn word_after(text: &[u8], i: usize) -> bool {
    i < text.len() && is_word_byte(text[i])
}

fn word_boundary(text: &[u8], i: usize) -> Option<usize> {
    (word_before(text, i) != word_after(text, i)).then_some(0)
}

fn not_word_boundary(text: &[u8], i: usize) -> Option<usize> {
    (word_before(text, i) == word_after(text, i)).then_some(0)
}

fn start_of_input(_text: &[u8], i: usize) -> Option<usize> {
    (i == 0).then_some(0)
}

fn end_of_input(text: &[u8], i: usize) -> Option<usize> {
    (i == text.len()).then_some(0)
}

fn any_byte(text: &[u8], i: usize) -> Option<usize> {
    (i < text.len()).then_some(1)
}
