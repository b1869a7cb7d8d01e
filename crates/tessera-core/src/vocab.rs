//! String interning for entity and relation names.

use crate::{EntityId, RelationId, Triple};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Interner {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Interner {
    #[allow(clippy::cast_possible_truncation)]
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    fn resolve(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }
}

/// Two-sided name table: entity names and relation names are interned
/// independently, in order of first appearance.
///
/// # Example
///
/// ```rust
/// use tessera_core::Vocab;
///
/// let mut vocab = Vocab::new();
/// let t = vocab.triple("Ulm", "located_in", "Germany");
/// assert_eq!(vocab.resolve(&t), Some(("Ulm", "located_in", "Germany")));
/// assert_eq!(vocab.entity_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    entities: Interner,
    relations: Interner,
}

impl Vocab {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an entity name.
    pub fn entity(&mut self, name: &str) -> EntityId {
        EntityId(self.entities.intern(name))
    }

    /// Intern a relation name.
    pub fn relation(&mut self, name: &str) -> RelationId {
        RelationId(self.relations.intern(name))
    }

    /// Intern all three parts of a triple.
    pub fn triple(&mut self, head: &str, relation: &str, tail: &str) -> Triple {
        let head = self.entity(head);
        let relation = self.relation(relation);
        let tail = self.entity(tail);
        Triple::new(head, relation, tail)
    }

    /// Look up an entity without interning it.
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.entities.get(name).map(EntityId)
    }

    /// Look up a relation without interning it.
    pub fn relation_id(&self, name: &str) -> Option<RelationId> {
        self.relations.get(name).map(RelationId)
    }

    /// Name of an entity.
    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.entities.resolve(id.0)
    }

    /// Name of a relation.
    pub fn relation_name(&self, id: RelationId) -> Option<&str> {
        self.relations.resolve(id.0)
    }

    /// Names of all three parts of a triple.
    pub fn resolve(&self, triple: &Triple) -> Option<(&str, &str, &str)> {
        Some((
            self.entity_name(triple.head)?,
            self.relation_name(triple.relation)?,
            self.entity_name(triple.tail)?,
        ))
    }

    /// Number of distinct entities.
    pub fn entity_count(&self) -> usize {
        self.entities.names.len()
    }

    /// Number of distinct relations.
    pub fn relation_count(&self) -> usize {
        self.relations.names.len()
    }
}
