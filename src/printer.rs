//! Render a compiled program back into pattern syntax.
//!
//! The output compiles back to an equivalent program: literal bytes that
//! would read as syntax are escaped on the way out. Non-ASCII literal
//! bytes render through `char` and are only display-faithful.

use std::fmt;

use crate::predicate::{ESCAPES, METACHARS};
use crate::token::{ClassChar, MAX_REPS, Regex, Token, TokenKind};

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            self.fmt_token(token, f)?;
        }
        Ok(())
    }
}

impl Regex {
    fn fmt_token(&self, token: &Token, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match token.kind {
            TokenKind::Literal(ch) => fmt_literal(ch, f)?,
            TokenKind::Predicate(idx) => write!(f, "\\{}", ESCAPES[idx].pattern as char)?,
            TokenKind::Metachar(idx) => write!(f, "{}", METACHARS[idx].pattern as char)?,
            TokenKind::Class(class) | TokenKind::InvClass(class) => {
                f.write_str("[")?;
                if matches!(token.kind, TokenKind::InvClass(_)) {
                    f.write_str("^")?;
                }
                for &member in self.class_members(class) {
                    fmt_class_char(member, f)?;
                }
                f.write_str("]")?;
            }
        }
        match (token.min, token.max) {
            (1, 1) => {}
            (0, 1) => f.write_str("?")?,
            (0, MAX_REPS) => f.write_str("*")?,
            (1, MAX_REPS) => f.write_str("+")?,
            (min, max) if min == max => write!(f, "{{{min}}}")?,
            (min, MAX_REPS) => write!(f, "{{{min},}}")?,
            (min, max) => write!(f, "{{{min},{max}}}")?,
        }
        if !token.greedy {
            f.write_str("?")?;
        }
        if token.atomic {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// Top-level literals: anything that would read as syntax gets escaped.
fn fmt_literal(ch: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if b"\\^$.[]?*+{}".contains(&ch) {
        write!(f, "\\{}", ch as char)
    } else {
        write!(f, "{}", ch as char)
    }
}

fn fmt_class_char(member: ClassChar, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match member {
        ClassChar::Predicate(idx) => write!(f, "\\{}", ESCAPES[idx].pattern as char),
        ClassChar::Range { first, last } if first == last => fmt_class_byte(first, f),
        ClassChar::Range { first, last } => {
            fmt_class_byte(first, f)?;
            f.write_str("-")?;
            fmt_class_byte(last, f)
        }
    }
}

/// Class members: `\`, `]`, `^` and `-` are escaped so membership survives
/// reparsing.
fn fmt_class_byte(ch: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if b"\\]^-".contains(&ch) {
        write!(f, "\\{}", ch as char)
    } else {
        write!(f, "{}", ch as char)
    }
}
