//! Backtracking matcher: interpret a compiled program against a text.
//!
//! Matching is two-phase. Tokens with a fixed repetition count and atomic
//! tokens are consumed iteratively and never revisited. The first flexible
//! non-atomic token collects one candidate end position per achievable
//! repetition count and recurses on the rest of the program for each:
//! most repetitions first when greedy, fewest first when lazy.
//!
//! Recursion depth is bounded by the number of flexible non-atomic tokens,
//! so stack use is `O(program length)`.

use crate::predicate::{ESCAPES, METACHARS};
use crate::token::{ClassChar, Regex, Token, TokenKind};

impl Regex {
    /// Length in bytes of a match anchored at byte offset `at`, if any.
    ///
    /// A zero-length match is a success; `None` means the program does not
    /// match at `at`.
    pub fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        self.match_bytes(text.as_bytes(), at)
    }

    pub(crate) fn match_bytes(&self, text: &[u8], at: usize) -> Option<usize> {
        if at > text.len() {
            return None;
        }
        self.run(&self.tokens, text, at).map(|end| end - at)
    }

    /// Match `tokens` at `start`, returning the end position of the match.
    fn run(&self, tokens: &[Token], text: &[u8], start: usize) -> Option<usize> {
        let mut i = start;
        let mut idx = 0;

        // Fixed-count and atomic runs commit without backtracking.
        loop {
            let Some(token) = tokens.get(idx) else {
                return Some(i);
            };
            if token.min != token.max && !token.atomic {
                break;
            }
            i = self.consume_run(token, text, i)?;
            idx += 1;
        }

        let token = &tokens[idx];
        let rest = &tokens[idx + 1..];
        let candidates = self.repetition_ends(token, text, i);
        if token.greedy {
            for &end in candidates.iter().rev() {
                if let Some(matched) = self.run(rest, text, end) {
                    return Some(matched);
                }
            }
        } else {
            for &end in &candidates {
                if let Some(matched) = self.run(rest, text, end) {
                    return Some(matched);
                }
            }
        }
        None
    }

    /// Consume a fixed or atomic token in place: up to `max` repetitions
    /// when greedy, exactly `min` when lazy. Fewer than `min` repetitions
    /// fails the match.
    fn consume_run(&self, token: &Token, text: &[u8], start: usize) -> Option<usize> {
        let want = u32::from(if token.greedy { token.max } else { token.min });
        let mut i = start;
        let mut count = 0u32;
        while count < want {
            match self.match_one(token, text, i) {
                // A zero-width token repeats in place; the remaining count
                // is satisfied where it stands.
                Some(0) => count = want,
                Some(n) => {
                    i += n;
                    count += 1;
                }
                None => break,
            }
        }
        (count >= u32::from(token.min)).then_some(i)
    }

    /// End positions after `min..=k` achievable repetitions of `token`,
    /// fewest repetitions first. Empty when not even `min` repetitions fit.
    fn repetition_ends(&self, token: &Token, text: &[u8], start: usize) -> Vec<usize> {
        let mut ends = vec![start];
        let mut cur = start;
        while ends.len() <= token.max as usize {
            match self.match_one(token, text, cur) {
                // A zero-width token satisfies every count without moving.
                Some(0) => return vec![cur],
                Some(n) => {
                    cur += n;
                    ends.push(cur);
                }
                None => break,
            }
        }
        if ends.len() <= token.min as usize {
            return Vec::new();
        }
        ends.drain(..token.min as usize);
        ends
    }

    /// Match a single repetition of `token` at `i`, returning the bytes
    /// consumed.
    fn match_one(&self, token: &Token, text: &[u8], i: usize) -> Option<usize> {
        match token.kind {
            TokenKind::Literal(ch) => (text.get(i) == Some(&ch)).then_some(1),
            TokenKind::Predicate(idx) => (ESCAPES[idx].matches)(text, i),
            TokenKind::Metachar(idx) => (METACHARS[idx].matches)(text, i),
            TokenKind::Class(class) => (i < text.len()
                && self
                    .class_members(class)
                    .iter()
                    .any(|&member| class_char_matches(member, text, i)))
            .then_some(1),
            // There is no byte to consume at end of input, so an inverted
            // class fails there like everything else.
            TokenKind::InvClass(class) => (i < text.len()
                && !self
                    .class_members(class)
                    .iter()
                    .any(|&member| class_char_matches(member, text, i)))
            .then_some(1),
        }
    }
}

/// Membership test for one class member at `text[i]`. Callers guarantee
/// `i` is in bounds.
fn class_char_matches(member: ClassChar, text: &[u8], i: usize) -> bool {
    match member {
        ClassChar::Predicate(idx) => (ESCAPES[idx].matches)(text, i).is_some(),
        ClassChar::Range { first, last } => (first..=last).contains(&text[i]),
    }
}
