//! Recursive descent compiler for pattern strings.
//!
//! The pattern is consumed left to right, one token slot per iteration.
//! Each slot is filled in four steps: the atom, the quantifier, the
//! laziness marker (`?` after a quantifier), and the atomic marker (`+`
//! after a quantifier).

use std::iter::{Copied, Peekable};
use std::slice;

use itertools::Itertools;

use crate::predicate::{escape_index, metachar_index};
use crate::token::{
    ClassChar, ClassRef, MAX_CLASS_CHARS, MAX_REPS, MAX_TOKENS, Regex, Token, TokenKind,
};

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern ends on a lone backslash.
    TrailingEscape,
    /// A `[` class is never closed.
    UnclosedClass,
    /// A predicate (`\w`, ...) used as a range endpoint inside a class.
    PredicateInRange,
    /// A `{m,n}` quantifier with `m > n`.
    InvalidQuantifierRange,
    /// The program would exceed [`MAX_TOKENS`].
    TooManyTokens,
    /// The program's classes would exceed [`MAX_CLASS_CHARS`] members.
    ClassBufferFull,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrailingEscape => write!(f, "Pattern ends on a lone backslash"),
            Self::UnclosedClass => write!(f, "Unclosed character class"),
            Self::PredicateInRange => {
                write!(f, "Predicate cannot be an endpoint of a class range")
            }
            Self::InvalidQuantifierRange => write!(f, "Invalid quantifier range {{m,n}}"),
            Self::TooManyTokens => write!(f, "Pattern needs more than {MAX_TOKENS} tokens"),
            Self::ClassBufferFull => {
                write!(f, "Character classes need more than {MAX_CLASS_CHARS} members")
            }
        }
    }
}

impl std::error::Error for PatternError {}

type Bytes<'a> = Peekable<Copied<slice::Iter<'a, u8>>>;

/// Compile `pattern` into a [`Regex`].
pub fn compile(pattern: &str) -> Result<Regex, PatternError> {
    let mut compiler = Compiler {
        bytes: pattern.as_bytes().iter().copied().peekable(),
        tokens: Vec::new(),
        classes: Vec::new(),
    };
    while let Some(first) = compiler.bytes.next() {
        if compiler.tokens.len() == MAX_TOKENS {
            return Err(PatternError::TooManyTokens);
        }
        let mut token = Token::new(compiler.compile_atom(first)?);
        compiler.compile_quantifier(&mut token)?;
        compiler.compile_lazy(&mut token);
        compiler.compile_atomic(&mut token);
        compiler.tokens.push(token);
    }
    Ok(Regex { tokens: compiler.tokens, classes: compiler.classes })
}

struct Compiler<'a> {
    bytes: Bytes<'a>,
    tokens: Vec<Token>,
    classes: Vec<ClassChar>,
}

impl Compiler<'_> {
    /// Compile one atom. `first` has already been consumed.
    fn compile_atom(&mut self, first: u8) -> Result<TokenKind, PatternError> {
        match first {
            b'\\' => match self.bytes.next() {
                None => Err(PatternError::TrailingEscape),
                Some(esc) => Ok(match escape_index(esc) {
                    Some(idx) => TokenKind::Predicate(idx),
                    None => TokenKind::Literal(esc),
                }),
            },
            b'[' => self.compile_class(),
            other => Ok(match metachar_index(other) {
                Some(idx) => TokenKind::Metachar(idx),
                None => TokenKind::Literal(other),
            }),
        }
    }

    /// Compile a `[...]` class. The `[` has already been consumed.
    ///
    /// An immediate `]` closes the class: `[]` is an empty class that
    /// matches nothing, `[^]` one that matches any byte before end of
    /// input.
    fn compile_class(&mut self) -> Result<TokenKind, PatternError> {
        let inverted = self.bytes.peek() == Some(&b'^');
        if inverted {
            self.bytes.next();
        }
        let start = self.classes.len();
        loop {
            match self.bytes.peek() {
                None => return Err(PatternError::UnclosedClass),
                Some(&b']') => {
                    self.bytes.next();
                    break;
                }
                Some(_) => {
                    if self.classes.len() == MAX_CLASS_CHARS {
                        return Err(PatternError::ClassBufferFull);
                    }
                    let mut member = self.compile_class_char()?;
                    self.compile_range(&mut member)?;
                    self.classes.push(member);
                }
            }
        }
        let class = ClassRef { start, len: self.classes.len() - start };
        Ok(if inverted { TokenKind::InvClass(class) } else { TokenKind::Class(class) })
    }

    /// Compile one class member: a predicate, or the first byte of a
    /// (possible) range.
    fn compile_class_char(&mut self) -> Result<ClassChar, PatternError> {
        // The caller peeked, so only an escape can run off the end here.
        let first = self.bytes.next().ok_or(PatternError::UnclosedClass)?;
        if first != b'\\' {
            return Ok(ClassChar::Range { first, last: first });
        }
        match self.bytes.next() {
            None => Err(PatternError::UnclosedClass),
            Some(esc) => Ok(match escape_index(esc) {
                Some(idx) => ClassChar::Predicate(idx),
                None => ClassChar::Range { first: esc, last: esc },
            }),
        }
    }

    /// Extend `member` into a range if a dash follows.
    ///
    /// A dash immediately before the closing `]` is a literal and is left
    /// for the next member. A reversed range compiles but matches nothing.
    fn compile_range(&mut self, member: &mut ClassChar) -> Result<(), PatternError> {
        if self.bytes.peek() != Some(&b'-') {
            return Ok(());
        }
        // A predicate cannot be a range endpoint, even when the dash would
        // otherwise have been literal.
        let ClassChar::Range { last, .. } = member else {
            return Err(PatternError::PredicateInRange);
        };
        let mut probe = self.bytes.clone();
        probe.next(); // the dash
        match probe.peek() {
            Some(&b']') => return Ok(()),
            None => return Err(PatternError::UnclosedClass),
            Some(_) => {}
        }
        self.bytes = probe;
        match self.bytes.next() {
            Some(b'\\') => match self.bytes.next() {
                None => Err(PatternError::UnclosedClass),
                Some(esc) if escape_index(esc).is_some() => Err(PatternError::PredicateInRange),
                Some(esc) => {
                    *last = esc;
                    Ok(())
                }
            },
            Some(end) => {
                *last = end;
                Ok(())
            }
            None => Err(PatternError::UnclosedClass),
        }
    }

    /// Parse the quantifier after an atom into `token.min`/`token.max`.
    fn compile_quantifier(&mut self, token: &mut Token) -> Result<(), PatternError> {
        match self.bytes.peek() {
            Some(&b'?') => {
                self.bytes.next();
                (token.min, token.max) = (0, 1);
            }
            Some(&b'*') => {
                self.bytes.next();
                (token.min, token.max) = (0, MAX_REPS);
            }
            Some(&b'+') => {
                self.bytes.next();
                (token.min, token.max) = (1, MAX_REPS);
            }
            Some(&b'{') => return self.compile_counted(token),
            _ => {}
        }
        Ok(())
    }

    /// Parse a `{m}`, `{m,}`, `{m,n}` (or `{,n}`) quantifier.
    ///
    /// A malformed or unclosed form consumes nothing; the `{` then stands
    /// as a literal atom for the next token slot.
    fn compile_counted(&mut self, token: &mut Token) -> Result<(), PatternError> {
        let mut probe = self.bytes.clone();
        probe.next(); // the brace
        let min = take_number(&mut probe).unwrap_or(0);
        let max = match probe.next() {
            Some(b'}') => min,
            Some(b',') => {
                if probe.peek() == Some(&b'}') {
                    probe.next();
                    MAX_REPS
                } else {
                    let Some(n) = take_number(&mut probe) else {
                        return Ok(());
                    };
                    match probe.next() {
                        Some(b'}') => n,
                        _ => return Ok(()),
                    }
                }
            }
            _ => return Ok(()),
        };
        if min > max {
            return Err(PatternError::InvalidQuantifierRange);
        }
        self.bytes = probe;
        (token.min, token.max) = (min, max);
        Ok(())
    }

    /// A `?` after the quantifier makes the token lazy.
    fn compile_lazy(&mut self, token: &mut Token) {
        if self.bytes.peek() == Some(&b'?') {
            self.bytes.next();
            token.greedy = false;
        }
    }

    /// A `+` after the quantifier (and laziness marker) makes it atomic.
    fn compile_atomic(&mut self, token: &mut Token) {
        if self.bytes.peek() == Some(&b'+') {
            self.bytes.next();
            token.atomic = true;
        }
    }
}

/// Accumulate a run of ASCII digits, saturating at [`MAX_REPS`].
/// Returns `None` when no digit is present.
fn take_number(bytes: &mut Bytes<'_>) -> Option<u8> {
    let mut value: Option<u16> = None;
    for digit in bytes.peeking_take_while(u8::is_ascii_digit) {
        let next = value.unwrap_or(0).saturating_mul(10) + u16::from(digit - b'0');
        value = Some(next.min(u16::from(MAX_REPS)));
    }
    value.map(|v| v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_ok(pattern: &str) -> Regex {
        compile(pattern).expect("pattern should compile")
    }

    fn compile_err(pattern: &str) -> PatternError {
        compile(pattern).expect_err("pattern should not compile")
    }

    fn kinds(regex: &Regex) -> Vec<TokenKind> {
        regex.tokens.iter().map(|t| t.kind).collect()
    }

    // --- Atoms ---

    #[test]
    fn literal_bytes() {
        let re = compile_ok("ab");
        assert_eq!(kinds(&re), vec![TokenKind::Literal(b'a'), TokenKind::Literal(b'b')]);
    }

    #[test]
    fn escape_names_a_predicate() {
        let re = compile_ok(r"\d");
        assert_eq!(kinds(&re), vec![TokenKind::Predicate(escape_index(b'd').unwrap())]);
    }

    #[test]
    fn escape_of_plain_byte_is_literal() {
        // `n` names no predicate, so `\n` is a literal `n`.
        let re = compile_ok(r"\n");
        assert_eq!(kinds(&re), vec![TokenKind::Literal(b'n')]);
    }

    #[test]
    fn escape_disarms_metacharacters() {
        let re = compile_ok(r"\*\.");
        assert_eq!(kinds(&re), vec![TokenKind::Literal(b'*'), TokenKind::Literal(b'.')]);
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        assert_eq!(compile_err("ab\\"), PatternError::TrailingEscape);
    }

    #[test]
    fn metachar_atoms() {
        let re = compile_ok("^.$");
        assert_eq!(
            kinds(&re),
            vec![
                TokenKind::Metachar(metachar_index(b'^').unwrap()),
                TokenKind::Metachar(metachar_index(b'.').unwrap()),
                TokenKind::Metachar(metachar_index(b'$').unwrap()),
            ]
        );
    }

    #[test]
    fn empty_pattern_compiles_to_empty_program() {
        assert!(compile_ok("").tokens.is_empty());
    }

    // --- Classes ---

    #[test]
    fn class_members_are_single_byte_ranges() {
        let re = compile_ok("[abc]");
        assert_eq!(
            re.classes,
            vec![
                ClassChar::Range { first: b'a', last: b'a' },
                ClassChar::Range { first: b'b', last: b'b' },
                ClassChar::Range { first: b'c', last: b'c' },
            ]
        );
        assert_eq!(kinds(&re), vec![TokenKind::Class(ClassRef { start: 0, len: 3 })]);
    }

    #[test]
    fn caret_inverts_a_class() {
        let re = compile_ok("[^ab]");
        assert_eq!(kinds(&re), vec![TokenKind::InvClass(ClassRef { start: 0, len: 2 })]);
    }

    #[test]
    fn class_range() {
        let re = compile_ok("[a-z0-9]");
        assert_eq!(
            re.classes,
            vec![
                ClassChar::Range { first: b'a', last: b'z' },
                ClassChar::Range { first: b'0', last: b'9' },
            ]
        );
    }

    #[test]
    fn class_range_with_escaped_endpoint() {
        let re = compile_ok(r"[a-\]]");
        assert_eq!(re.classes, vec![ClassChar::Range { first: b'a', last: b']' }]);
    }

    #[test]
    fn trailing_dash_is_a_literal_member() {
        let re = compile_ok("[ab-]");
        assert_eq!(
            re.classes,
            vec![
                ClassChar::Range { first: b'a', last: b'a' },
                ClassChar::Range { first: b'b', last: b'b' },
                ClassChar::Range { first: b'-', last: b'-' },
            ]
        );
    }

    #[test]
    fn predicate_as_class_member() {
        let re = compile_ok(r"[\d]");
        assert_eq!(re.classes, vec![ClassChar::Predicate(escape_index(b'd').unwrap())]);
    }

    #[test]
    fn empty_class_is_allowed() {
        let re = compile_ok("[]");
        assert_eq!(kinds(&re), vec![TokenKind::Class(ClassRef { start: 0, len: 0 })]);
    }

    #[test]
    fn reversed_class_range_compiles() {
        let re = compile_ok("[z-a]");
        assert_eq!(re.classes, vec![ClassChar::Range { first: b'z', last: b'a' }]);
    }

    #[test]
    fn two_classes_share_the_buffer() {
        let re = compile_ok("[ab][cd]");
        assert_eq!(
            kinds(&re),
            vec![
                TokenKind::Class(ClassRef { start: 0, len: 2 }),
                TokenKind::Class(ClassRef { start: 2, len: 2 }),
            ]
        );
    }

    #[test]
    fn unclosed_class_is_rejected() {
        assert_eq!(compile_err("[ab"), PatternError::UnclosedClass);
        assert_eq!(compile_err("[^"), PatternError::UnclosedClass);
        assert_eq!(compile_err("[a-"), PatternError::UnclosedClass);
        assert_eq!(compile_err(r"[a\"), PatternError::UnclosedClass);
    }

    #[test]
    fn predicate_cannot_start_a_range() {
        assert_eq!(compile_err(r"[\w-b]"), PatternError::PredicateInRange);
        // Even a dash that would have been literal is rejected after a
        // predicate member.
        assert_eq!(compile_err(r"[\w-]"), PatternError::PredicateInRange);
    }

    #[test]
    fn predicate_cannot_end_a_range() {
        assert_eq!(compile_err(r"[b-\w]"), PatternError::PredicateInRange);
    }

    // --- Quantifiers ---

    fn bounds(pattern: &str) -> (u8, u8) {
        let re = compile_ok(pattern);
        assert_eq!(re.tokens.len(), 1, "expected a single token for {pattern:?}");
        (re.tokens[0].min, re.tokens[0].max)
    }

    #[test]
    fn default_quantifier_is_one() {
        assert_eq!(bounds("a"), (1, 1));
    }

    #[test]
    fn question_star_plus() {
        assert_eq!(bounds("a?"), (0, 1));
        assert_eq!(bounds("a*"), (0, MAX_REPS));
        assert_eq!(bounds("a+"), (1, MAX_REPS));
    }

    #[test]
    fn counted_quantifiers() {
        assert_eq!(bounds("a{3}"), (3, 3));
        assert_eq!(bounds("a{2,}"), (2, MAX_REPS));
        assert_eq!(bounds("a{2,5}"), (2, 5));
        assert_eq!(bounds("a{,4}"), (0, 4));
        assert_eq!(bounds("a{,}"), (0, MAX_REPS));
        assert_eq!(bounds("a{}"), (0, 0));
    }

    #[test]
    fn counted_quantifier_saturates() {
        assert_eq!(bounds("a{999}"), (MAX_REPS, MAX_REPS));
        assert_eq!(bounds("a{4,1000}"), (4, MAX_REPS));
    }

    #[test]
    fn reversed_counted_quantifier_is_rejected() {
        assert_eq!(compile_err("a{5,2}"), PatternError::InvalidQuantifierRange);
    }

    #[test]
    fn malformed_braces_fall_back_to_literals() {
        // `{2x}` is no quantifier, so the brace compiles as a literal atom.
        let re = compile_ok("a{2x}");
        assert_eq!(
            kinds(&re),
            vec![
                TokenKind::Literal(b'a'),
                TokenKind::Literal(b'{'),
                TokenKind::Literal(b'2'),
                TokenKind::Literal(b'x'),
                TokenKind::Literal(b'}'),
            ]
        );
        assert_eq!(re.tokens[0].max, 1);
    }

    #[test]
    fn unclosed_brace_falls_back_to_literals() {
        let re = compile_ok("a{2");
        assert_eq!(
            kinds(&re),
            vec![TokenKind::Literal(b'a'), TokenKind::Literal(b'{'), TokenKind::Literal(b'2')]
        );
    }

    #[test]
    fn brace_quantifier_on_class() {
        let re = compile_ok("[ab]{2,3}");
        assert_eq!(re.tokens[0].min, 2);
        assert_eq!(re.tokens[0].max, 3);
    }

    // --- Lazy and atomic markers ---

    #[test]
    fn tokens_are_greedy_by_default() {
        let re = compile_ok("a+");
        assert!(re.tokens[0].greedy);
        assert!(!re.tokens[0].atomic);
    }

    #[test]
    fn question_after_quantifier_is_lazy() {
        let re = compile_ok("a+?");
        assert!(!re.tokens[0].greedy);
        assert_eq!((re.tokens[0].min, re.tokens[0].max), (1, MAX_REPS));
    }

    #[test]
    fn plus_after_quantifier_is_atomic() {
        let re = compile_ok("a++");
        assert!(re.tokens[0].atomic);
        assert!(re.tokens[0].greedy);
    }

    #[test]
    fn lazy_then_atomic() {
        let re = compile_ok("a*?+");
        assert!(!re.tokens[0].greedy);
        assert!(re.tokens[0].atomic);
    }

    #[test]
    fn double_question_is_lazy_optional() {
        let re = compile_ok("a??");
        assert_eq!((re.tokens[0].min, re.tokens[0].max), (0, 1));
        assert!(!re.tokens[0].greedy);
    }

    // --- Capacity limits ---

    #[test]
    fn token_capacity() {
        assert_eq!(compile_ok(&"a".repeat(MAX_TOKENS)).tokens.len(), MAX_TOKENS);
        assert_eq!(compile_err(&"a".repeat(MAX_TOKENS + 1)), PatternError::TooManyTokens);
    }

    #[test]
    fn class_member_capacity() {
        let full = format!("[{}]", "abcdefghij".repeat(2));
        assert_eq!(compile_ok(&full).classes.len(), MAX_CLASS_CHARS);
        let over = format!("[{}k]", "abcdefghij".repeat(2));
        assert_eq!(compile_err(&over), PatternError::ClassBufferFull);
    }

    #[test]
    fn class_member_capacity_is_shared() {
        let over = format!("[{}][{}]", "abcdefghij".repeat(2), "x");
        assert_eq!(compile_err(&over), PatternError::ClassBufferFull);
    }

    // --- Error display ---

    #[test]
    fn errors_render_a_message() {
        assert!(PatternError::UnclosedClass.to_string().contains("class"));
        assert!(PatternError::TooManyTokens.to_string().contains("30"));
    }
}
