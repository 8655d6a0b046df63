//! Stable integer identifiers for geographic entities.
//!
//! The routing client needs every stop, station, and route keyed by a single
//! integer space. Two namespaces share that space:
//!
//! - the *station* namespace, where the element kind is folded into the low
//!   bits so that a node and a way with the same numeric id stay distinct;
//! - the *typed* namespace, where the caller asserts the kind up front and
//!   only the numeric id is encoded.
//!
//! Both end with a 1-bit left shift, keeping the whole space disjoint from
//! ids minted by other producers that use the low bit.

use thiserror::Error;

use crate::model::{ElementKind, ElementRef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidReference {
    #[error("malformed element reference: {0:?}")]
    Malformed(String),

    #[error("got {got}, expected a {} reference", expected.name())]
    KindMismatch {
        got: ElementRef,
        expected: ElementKind,
    },
}

/// Encodes a reference in the station namespace.
///
/// Distinct `(kind, id)` pairs never collide: the kind tag occupies the two
/// bits below the numeric id.
pub fn encode(r: ElementRef) -> u64 {
    ((r.id << 2) | r.kind.tag()) << 1
}

/// Encodes a reference whose kind the caller already knows.
///
/// Fails with [`InvalidReference::KindMismatch`] when the reference's kind
/// differs from the expected one; that always indicates an upstream
/// data-model inconsistency and aborts the run.
pub fn encode_typed(r: ElementRef, expected: ElementKind) -> Result<u64, InvalidReference> {
    if r.kind != expected {
        return Err(InvalidReference::KindMismatch { got: r, expected });
    }
    Ok(r.id << 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind::{Node, Relation, Way};

    #[test]
    fn test_encode_is_unique_across_kinds() {
        // Same numeric id, three kinds: all distinct.
        let ids = [
            encode(ElementRef::new(Node, 17)),
            encode(ElementRef::new(Way, 17)),
            encode(ElementRef::new(Relation, 17)),
        ];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[2]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_encode_no_cross_id_collisions() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for kind in [Node, Way, Relation] {
            for id in 0..1000 {
                assert!(seen.insert(encode(ElementRef::new(kind, id))));
            }
        }
    }

    #[test]
    fn test_encode_low_bit_is_clear() {
        assert_eq!(encode(ElementRef::new(Way, 12345)) & 1, 0);
        assert_eq!(encode_typed(ElementRef::new(Relation, 9), Relation).unwrap() & 1, 0);
    }

    #[test]
    fn test_encode_typed_matches_kind() {
        let r = ElementRef::new(Relation, 42);
        assert_eq!(encode_typed(r, Relation), Ok(84));
    }

    #[test]
    fn test_encode_typed_rejects_mismatch() {
        let r = ElementRef::new(Node, 42);
        let err = encode_typed(r, Relation).unwrap_err();
        assert_eq!(
            err,
            InvalidReference::KindMismatch {
                got: r,
                expected: Relation
            }
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let r = ElementRef::new(Way, 987654321);
        assert_eq!(encode(r), encode(r));
    }
}
