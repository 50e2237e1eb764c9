//! Snapshot collections of notes, tags and commands.

use crate::error::{Result, VaultError};
use crate::note::Note;
use crate::types::{Command, Tag};
use std::collections::HashMap;

/// An entity that can be looked up by identifier.
pub trait Keyed {
    /// The identifier the entity is stored under.
    fn id(&self) -> &str;

    /// Whether `query` addresses this entity.
    fn matches(&self, query: &str) -> bool {
        self.id() == query
    }
}

/// Insertion-ordered mapping from identifier to entity.
///
/// Built once and never re-synced with the vault.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

pub type Notes = Collection<Note>;
pub type Tags = Collection<Tag>;
pub type Commands = Collection<Command>;

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Collection<T> {
    /// Build a collection; a repeated identifier keeps its first position
    /// and the latest entity.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut collection = Self::default();
        for item in items {
            collection.insert(item);
        }
        collection
    }

    fn insert(&mut self, item: T) {
        match self.index.get(item.id()) {
            Some(&idx) => self.items[idx] = item,
            None => {
                self.index.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// Look up an entity: by identifier first, then by [`Keyed::matches`].
    pub fn get(&self, query: &str) -> Option<&T> {
        match self.index.get(query) {
            Some(&idx) => self.items.get(idx),
            None => self.items.iter().find(|item| item.matches(query)),
        }
    }

    /// Look up an entity that must exist.
    pub fn require(&self, query: &str) -> Result<&T> {
        self.get(query)
            .ok_or_else(|| VaultError::NotFound(query.to_string()))
    }

    pub fn contains(&self, query: &str) -> bool {
        self.get(query).is_some()
    }

    /// Identifiers in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Keyed::id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Keyed> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
