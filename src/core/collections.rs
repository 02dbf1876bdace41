//! Thin persistent collections. Spec §1 treats list/vector/map/set as
//! external collaborators ("the core assumes their existence with
//! standard count/get/equality contracts") — these are not optimized
//! structural-sharing tries, just `Rc`-wrapped immutable containers that
//! satisfy that contract. Every "mutation" builds a fresh value; nothing
//! here is ever mutated in place once constructed, matching spec §3's
//! lifecycle invariant.

use super::value::Value;

#[derive(Clone)]
pub struct PersistentList {
    items: Vec<Value>,
}

impl PersistentList {
    pub fn new(items: Vec<Value>) -> Self {
        PersistentList { items }
    }

    pub fn empty() -> Self {
        PersistentList { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn rest(&self) -> PersistentList {
        if self.items.is_empty() {
            PersistentList::empty()
        } else {
            PersistentList::new(self.items[1..].to_vec())
        }
    }

    pub fn cons(&self, head: Value) -> PersistentList {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(head);
        items.extend(self.items.iter().cloned());
        PersistentList::new(items)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn eq_structural(&self, other: &PersistentList) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.structural_eq(b))
    }
}

/// Association list keyed by structural equality. Linear lookup; the
/// numeric-tower core never inspects map internals beyond count/get, so a
/// hash map keyed on a `Value` (which is not `Hash` due to `f64`) isn't
/// needed — see spec §1's Non-goal framing of collections.
#[derive(Clone)]
pub struct PersistentMap {
    entries: Vec<(Value, Value)>,
}

impl PersistentMap {
    pub fn new(entries: Vec<(Value, Value)>) -> Self {
        PersistentMap { entries }
    }

    pub fn empty() -> Self {
        PersistentMap { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k.structural_eq(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn assoc(&self, key: Value, value: Value) -> PersistentMap {
        let mut entries: Vec<(Value, Value)> = self
            .entries
            .iter()
            .filter(|(k, _)| !k.structural_eq(&key))
            .cloned()
            .collect();
        entries.push((key, value));
        PersistentMap::new(entries)
    }

    pub fn dissoc(&self, key: &Value) -> PersistentMap {
        let entries: Vec<(Value, Value)> = self
            .entries
            .iter()
            .filter(|(k, _)| !k.structural_eq(key))
            .cloned()
            .collect();
        PersistentMap::new(entries)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn vals(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn eq_structural(&self, other: &PersistentMap) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(k, v)| {
                other.get(k).map(|ov| ov.structural_eq(v)).unwrap_or(false)
            })
    }
}

#[derive(Clone)]
pub struct PersistentSet {
    items: Vec<Value>,
}

impl PersistentSet {
    pub fn new(items: Vec<Value>) -> Self {
        let mut deduped: Vec<Value> = Vec::new();
        for item in items {
            if !deduped.iter().any(|v| v.structural_eq(&item)) {
                deduped.push(item);
            }
        }
        PersistentSet { items: deduped }
    }

    pub fn empty() -> Self {
        PersistentSet { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|v| v.structural_eq(value))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn eq_structural(&self, other: &PersistentSet) -> bool {
        self.items.len() == other.items.len() && self.items.iter().all(|v| other.contains(v))
    }
}
