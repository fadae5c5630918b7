//! A small self-contained backtracking regular-expression engine.
//!
//! Compiles a pattern into a fixed-capacity token program, then searches a
//! text for it. The dialect is deliberately restricted and consistent:
//! there are no groups, no alternation, no lookaround and no
//! backreferences. Text is treated as a sequence of 8-bit code units and
//! all offsets are byte offsets.
//!
//! # Pattern syntax
//!
//! | Syntax               | Meaning                                        |
//! |----------------------|------------------------------------------------|
//! | `x`                  | Literal byte (anything not listed below)       |
//! | `\x`                 | Escaped literal byte                           |
//! | `.`                  | Any byte before end of input                   |
//! | `^`                  | Start of input                                 |
//! | `$`                  | End of input                                   |
//! | `\s` `\S`            | Whitespace / non-whitespace                    |
//! | `\d` `\D`            | ASCII digit / non-digit                        |
//! | `\w` `\W`            | Word byte (alphanumeric or `_`) / non-word     |
//! | `\R`                 | Newline: CRLF (two bytes) or LF (one)          |
//! | `\b` `\B`            | Word boundary / non-boundary (zero-width)      |
//! | `[...]` `[^...]`     | Character class, inverted character class      |
//! | `a-z`                | Byte range in a class; trailing `-` is literal |
//! | `?` `*` `+`          | 0–1, 0–[`MAX_REPS`], 1–[`MAX_REPS`] repeats    |
//! | `{m}` `{m,}` `{m,n}` | Counted repetitions                            |
//! | `…?`                 | Lazy quantifier: fewest repetitions first      |
//! | `…+`                 | Atomic quantifier: never gives repetitions back |
//!
//! # Example
//!
//! ```rust
//! use tinyre::compile;
//!
//! let re = compile(r"\d{2,3}").unwrap();
//! let m = re.find("order 12345").unwrap();
//! assert_eq!((m.start, m.len()), (6, 3));
//! assert_eq!(re.count_matches("12 345 6789"), 3);
//! ```

mod compiler;
mod matcher;
mod predicate;
mod printer;
mod search;
mod token;


pub use compiler::{PatternError, compile};
pub use search::Match;
pub use token::{MAX_CLASS_CHARS, MAX_REPS, MAX_TOKENS, Regex};
