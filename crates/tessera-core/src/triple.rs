//! Interned triple type.
//!
//! A triple is a directed labeled edge `(head, relation, tail)`. Names are
//! interned by [`Vocab`](crate::Vocab) so that a triple is a small `Copy`
//! value and hashing it never touches a string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Position of this entity in dense per-entity tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Dense identifier for a relation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationId(pub u32);

impl RelationId {
    /// Position of this relation in dense per-relation tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A `(head, relation, tail)` edge.
///
/// # Example
///
/// ```rust
/// use tessera_core::{EntityId, RelationId, Triple};
///
/// let t = Triple::new(EntityId(0), RelationId(3), EntityId(1));
/// assert_eq!(t.reversed_endpoints(), (EntityId(1), EntityId(0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Source entity.
    pub head: EntityId,
    /// Relation type.
    pub relation: RelationId,
    /// Target entity.
    pub tail: EntityId,
}

impl Triple {
    /// Create a new triple.
    pub const fn new(head: EntityId, relation: RelationId, tail: EntityId) -> Self {
        Self {
            head,
            relation,
            tail,
        }
    }

    /// `(tail, head)`, the key under which a reverse edge is indexed.
    pub const fn reversed_endpoints(&self) -> (EntityId, EntityId) {
        (self.tail, self.head)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.head, self.relation, self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loop_reverses_to_itself() {
        let t = Triple::new(EntityId(4), RelationId(0), EntityId(4));
        assert_eq!(t.reversed_endpoints(), (t.head, t.tail));
    }

    #[test]
    fn test_ordering_is_head_relation_tail() {
        let a = Triple::new(EntityId(0), RelationId(9), EntityId(9));
        let b = Triple::new(EntityId(1), RelationId(0), EntityId(0));
        let c = Triple::new(EntityId(1), RelationId(0), EntityId(2));
        let mut v = vec![c, b, a];
        v.sort();
        assert_eq!(v, vec![a, b, c]);
    }

    #[test]
    fn test_display() {
        let t = Triple::new(EntityId(1), RelationId(2), EntityId(3));
        assert_eq!(t.to_string(), "(e1, r2, e3)");
    }
}
