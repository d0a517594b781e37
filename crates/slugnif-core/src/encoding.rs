//! Single-byte string marshaling between terms and bounded buffers.
//!
//! Only Latin-1 is supported: every character occupies exactly one byte
//! with code points `0..=255`. Multi-byte encodings are rejected when a
//! registration is declared, never truncated at call time.

use serde::{Deserialize, Serialize};

use crate::buffer::BoundedBuffer;
use crate::error::{DecodeError, EncodeError};
use crate::term::Term;

/// Text encoding used on both sides of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// ISO-8859-1, one byte per character.
    #[default]
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latin1 => write!(f, "latin1"),
        }
    }
}

/// Decode a charlist term into a buffer of the given capacity.
///
/// The list length is checked against the capacity before any element is
/// copied.
pub fn decode_latin1(term: &Term, capacity: usize) -> Result<BoundedBuffer, DecodeError> {
    let items = match term {
        Term::List(items) => items,
        other => {
            return Err(DecodeError::NotAString {
                found: describe(other).to_string(),
            })
        }
    };

    let mut buf = BoundedBuffer::new(capacity);
    if items.len() > buf.max_len() {
        return Err(DecodeError::TooLong {
            len: items.len(),
            capacity: buf.capacity(),
        });
    }
    buf.reserve(items.len());

    for item in items {
        let value = match item {
            Term::Integer(v) => *v,
            other => {
                return Err(DecodeError::NotAString {
                    found: format!("list containing {}", describe(other)),
                })
            }
        };
        let byte = u8::try_from(value).map_err(|_| DecodeError::OutOfRange { value })?;
        buf.push(byte)?;
    }

    Ok(buf)
}

/// Encode a byte string as a Latin-1 charlist term.
pub fn encode_latin1(bytes: &[u8]) -> Result<Term, EncodeError> {
    if let Some(index) = bytes.iter().position(|&b| b == 0) {
        return Err(EncodeError::InteriorNul { index });
    }
    Ok(Term::charlist(bytes))
}

fn describe(term: &Term) -> &'static str {
    match term {
        Term::Atom(_) => "atom",
        Term::Integer(_) => "integer",
        Term::List(_) => "list",
        Term::ImproperList(..) => "improper list",
        Term::Binary(_) => "binary",
        Term::Tuple(_) => "tuple",
        Term::NonValue => "non-value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_string() {
        let buf = decode_latin1(&Term::charlist(b"Hello World"), 100).unwrap();
        assert_eq!(buf.as_bytes(), b"Hello World");
        assert_eq!(buf.capacity(), 100);
    }

    #[test]
    fn decode_empty_list_is_empty_string() {
        let buf = decode_latin1(&Term::nil(), 100).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_high_latin1() {
        let buf = decode_latin1(&Term::from_str_chars("na\u{ef}ve"), 100).unwrap();
        assert_eq!(buf.as_bytes(), &[b'n', b'a', 0xEF, b'v', b'e']);
    }

    #[test]
    fn decode_rejects_non_list_terms() {
        for term in [
            Term::atom("hello"),
            Term::Integer(5),
            Term::Binary(b"hello".to_vec()),
            Term::Tuple(vec![]),
            Term::ImproperList(vec![Term::Integer(97)], Box::new(Term::Integer(98))),
            Term::NonValue,
        ] {
            assert!(
                matches!(decode_latin1(&term, 100), Err(DecodeError::NotAString { .. })),
                "expected NotAString for {term:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_nested_lists() {
        let term = Term::List(vec![Term::Integer(97), Term::nil()]);
        assert!(matches!(decode_latin1(&term, 100), Err(DecodeError::NotAString { .. })));
    }

    #[test]
    fn decode_rejects_wide_characters() {
        let term = Term::from_str_chars("smile \u{263A}");
        assert_eq!(
            decode_latin1(&term, 100).unwrap_err(),
            DecodeError::OutOfRange { value: 0x263A }
        );
        let negative = Term::List(vec![Term::Integer(-1)]);
        assert_eq!(
            decode_latin1(&negative, 100).unwrap_err(),
            DecodeError::OutOfRange { value: -1 }
        );
    }

    #[test]
    fn decode_length_boundary() {
        assert!(decode_latin1(&Term::charlist(&[b'a'; 99]), 100).is_ok());
        assert_eq!(
            decode_latin1(&Term::charlist(&[b'a'; 100]), 100).unwrap_err(),
            DecodeError::TooLong { len: 100, capacity: 100 }
        );
    }

    #[test]
    fn oversized_list_rejected_before_element_checks() {
        // The bad element sits past the bound; the length check wins.
        let mut items = vec![Term::Integer(97); 100];
        items.push(Term::atom("x"));
        assert!(matches!(
            decode_latin1(&Term::List(items), 100),
            Err(DecodeError::TooLong { .. })
        ));
    }

    #[test]
    fn decode_with_unbounded_capacity_stays_small() {
        let buf = decode_latin1(&Term::charlist(b"hi"), usize::MAX).unwrap();
        assert_eq!(buf.as_bytes(), b"hi");
    }

    #[test]
    fn decode_rejects_nul() {
        let term = Term::List(vec![Term::Integer(97), Term::Integer(0)]);
        assert_eq!(decode_latin1(&term, 100).unwrap_err(), DecodeError::InteriorNul { index: 1 });
    }

    #[test]
    fn encode_then_decode_preserves_bytes() {
        let samples: [&[u8]; 3] = [b"", b"hello-world", &[0x41, 0xFF, 0x80, 0x7F]];
        for bytes in samples {
            let term = encode_latin1(bytes).unwrap();
            let buf = decode_latin1(&term, 100).unwrap();
            assert_eq!(buf.as_bytes(), bytes);
        }
    }

    #[test]
    fn encode_rejects_nul() {
        assert_eq!(encode_latin1(b"ab\0").unwrap_err(), EncodeError::InteriorNul { index: 2 });
    }

    #[test]
    fn encoding_display_name() {
        assert_eq!(Encoding::Latin1.to_string(), "latin1");
        assert_eq!(Encoding::default(), Encoding::Latin1);
    }
}
