//! The in-memory keyspace host: named keys holding either a
//! lexicographically ordered set (the index primitive) or a property
//! record (one per graph entity, keyed by the entity id).

use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::btree_set;
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    SortedSet,
    Record,
}

/// An ordered-by-byte-order set of members with uniform score.
#[derive(Debug, Default)]
pub struct SortedSet {
    members: BTreeSet<Vec<u8>>,
}

impl SortedSet {
    /// Inserts a member, returning whether it was newly added.
    pub fn insert(&mut self, member: &[u8]) -> bool {
        self.members.insert(member.to_vec())
    }

    /// Removes a member, returning whether it was present.
    pub fn remove(&mut self, member: &[u8]) -> bool {
        self.members.remove(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &[u8]) -> bool {
        self.members.contains(member)
    }

    /// Members in `[min, max]`, in lexicographic byte order.
    pub fn lex_range(&self, min: Vec<u8>, max: Vec<u8>) -> LexRange<'_> {
        self.members
            .range((Bound::Included(min), Bound::Included(max)))
    }
}

pub type LexRange<'a> = btree_set::Range<'a, Vec<u8>>;

/// A property record: the field map of one graph entity.
#[derive(Debug, Default)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn set(&mut self, key: String, value: Value) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Debug)]
enum Entry {
    SortedSet(SortedSet),
    Record(Record),
}

/// A flat namespace of typed keys. Writes take `&mut self`; the engine
/// executes one command at a time, so no further locking happens here.
#[derive(Debug, Default)]
pub struct Keyspace {
    keys: HashMap<String, Entry>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_type(&self, name: &str) -> Option<KeyType> {
        self.keys.get(name).map(|entry| match entry {
            Entry::SortedSet(_) => KeyType::SortedSet,
            Entry::Record(_) => KeyType::Record,
        })
    }

    /// Opens a sorted set for reading. Absent keys read as `None`.
    pub fn sorted_set(&self, name: &str) -> Result<Option<&SortedSet>> {
        match self.keys.get(name) {
            None => Ok(None),
            Some(Entry::SortedSet(set)) => Ok(Some(set)),
            Some(_) => Err(Error::WrongType(name.to_string())),
        }
    }

    /// Opens a sorted set for writing, creating it when the key is empty.
    pub fn sorted_set_mut(&mut self, name: &str) -> Result<&mut SortedSet> {
        let entry = self
            .keys
            .entry(name.to_string())
            .or_insert_with(|| Entry::SortedSet(SortedSet::default()));
        match entry {
            Entry::SortedSet(set) => Ok(set),
            _ => Err(Error::WrongType(name.to_string())),
        }
    }

    pub fn record(&self, name: &str) -> Result<Option<&Record>> {
        match self.keys.get(name) {
            None => Ok(None),
            Some(Entry::Record(record)) => Ok(Some(record)),
            Some(_) => Err(Error::WrongType(name.to_string())),
        }
    }

    pub fn record_mut(&mut self, name: &str) -> Result<&mut Record> {
        let entry = self
            .keys
            .entry(name.to_string())
            .or_insert_with(|| Entry::Record(Record::default()));
        match entry {
            Entry::Record(record) => Ok(record),
            _ => Err(Error::WrongType(name.to_string())),
        }
    }

    /// Reads one field of a record; absent key, mistyped key, or absent
    /// field all read as `None`.
    pub fn record_field(&self, name: &str, field: &str) -> Option<&Value> {
        match self.keys.get(name) {
            Some(Entry::Record(record)) => record.get(field),
            _ => None,
        }
    }

    /// Deletes a key, returning whether it existed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.keys.remove(name).is_some()
    }
}
