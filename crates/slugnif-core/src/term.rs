//! Runtime term representation.
//!
//! A [`Term`] is the boxed value the managed runtime hands to a native
//! function and expects back. Strings travel as charlists: proper lists
//! whose elements are integer code points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value crossing the native boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Interned symbol (e.g., `badarg`, `ok`).
    Atom(String),
    /// Arbitrary signed integer (code points, counters).
    Integer(i64),
    /// Proper list. An empty list is also the empty string.
    List(Vec<Term>),
    /// List whose final tail is not `[]`.
    ImproperList(Vec<Term>, Box<Term>),
    /// Raw byte sequence.
    Binary(Vec<u8>),
    /// Fixed-size tuple.
    Tuple(Vec<Term>),
    /// Returned by a native function after it has raised an exception.
    /// Never a valid value on the runtime side.
    NonValue,
}

impl Term {
    /// Create an atom term.
    pub fn atom(name: &str) -> Self {
        Term::Atom(name.to_string())
    }

    /// The empty list, `[]`.
    pub fn nil() -> Self {
        Term::List(Vec::new())
    }

    /// Build a charlist from raw single-byte code points.
    pub fn charlist(bytes: &[u8]) -> Self {
        Term::List(bytes.iter().map(|&b| Term::Integer(i64::from(b))).collect())
    }

    /// Build a charlist from a Rust string, one element per Unicode scalar.
    ///
    /// Scalars above 255 are kept as-is; they are rejected later by the
    /// Latin-1 decoder, not here.
    pub fn from_str_chars(s: &str) -> Self {
        Term::List(s.chars().map(|c| Term::Integer(i64::from(u32::from(c)))).collect())
    }

    /// Whether this is the exception sentinel.
    pub fn is_non_value(&self) -> bool {
        matches!(self, Term::NonValue)
    }

    /// Interpret a charlist of code points `0..=255` as Latin-1 text.
    ///
    /// Returns `None` for anything that is not such a list.
    pub fn to_latin1_string(&self) -> Option<String> {
        let Term::List(items) = self else {
            return None;
        };
        items
            .iter()
            .map(|item| match item {
                Term::Integer(cp) => u8::try_from(*cp).ok().map(char::from),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Integer(n) => write!(f, "{n}"),
            Term::List(items) => {
                if !items.is_empty() {
                    if let Some(text) = self.to_latin1_string() {
                        if text.chars().all(|c| !c.is_control()) {
                            return write!(f, "{text:?}");
                        }
                    }
                }
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Term::ImproperList(items, tail) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, " | {tail}]")
            }
            Term::Binary(bytes) => {
                write!(f, "<<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{b}")?;
                }
                write!(f, ">>")
            }
            Term::Tuple(items) => {
                write!(f, "{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
            Term::NonValue => write!(f, "<non-value>"),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charlist_from_bytes() {
        let t = Term::charlist(b"ab");
        assert_eq!(t, Term::List(vec![Term::Integer(97), Term::Integer(98)]));
    }

    #[test]
    fn from_str_keeps_wide_scalars() {
        let t = Term::from_str_chars("a\u{263A}");
        assert_eq!(t, Term::List(vec![Term::Integer(97), Term::Integer(0x263A)]));
        assert_eq!(t.to_latin1_string(), None);
    }

    #[test]
    fn latin1_text_round_trip() {
        let t = Term::charlist(&[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(t.to_latin1_string().as_deref(), Some("caf\u{e9}"));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Term::atom("badarg").to_string(), "badarg");
        assert_eq!(Term::charlist(b"hello-world").to_string(), "\"hello-world\"");
        assert_eq!(Term::nil().to_string(), "[]");
        assert_eq!(
            Term::Tuple(vec![Term::atom("error"), Term::Integer(1)]).to_string(),
            "{error,1}"
        );
        assert_eq!(Term::Binary(vec![1, 2]).to_string(), "<<1,2>>");
        assert_eq!(
            Term::ImproperList(vec![Term::Integer(1)], Box::new(Term::Integer(2))).to_string(),
            "[1 | 2]"
        );
    }

    #[test]
    fn non_value_sentinel() {
        assert!(Term::NonValue.is_non_value());
        assert!(!Term::nil().is_non_value());
    }
}
