//! World state snapshots, partial-state predicates, and fingerprints.
//!
//! A [`WorldState`] is a complete mapping from [`AttributeKey`] to
//! [`Value`]. The same shape doubles as an effect delta: applying a delta
//! overwrites every key it lists. A [`Condition`] is a partial predicate
//! over a state, used for action preconditions, goals, and cost-modifier
//! triggers.
//!
//! Both are backed by `BTreeMap`, so iteration is already in canonical key
//! order. A [`Fingerprint`] captures that order explicitly and is what the
//! planners use to deduplicate search nodes.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{Coord, Value};

/// The attribute key holding an agent's grid position.
///
/// Movement actions read it for distance costs and overwrite it with their
/// target when applied.
pub const POSITION_KEY: &str = "agent_position";

/// The name of a fact about the world or an agent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeKey(String);

impl AttributeKey {
    /// Create a key from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AttributeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl core::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only lookup over something that behaves like a state.
///
/// Implemented by [`WorldState`] and by [`Merged`], so predicates can be
/// evaluated against a shared/private union without building a merged map.
pub trait StateView {
    /// Look up the value stored under `key`.
    fn get(&self, key: &str) -> Option<&Value>;

    /// The agent position, if the state carries one as a coordinate.
    fn position(&self) -> Option<Coord> {
        self.get(POSITION_KEY).and_then(Value::as_coord)
    }
}

/// A complete snapshot of facts, or a partial one used as an effect delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldState(BTreeMap<AttributeKey, Value>);

impl WorldState {
    /// Create an empty state.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &AttributeKey> {
        self.0.keys()
    }

    /// Iterate key/value pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &Value)> {
        self.0.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the state holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite every key listed in `delta` with its value, in place.
    pub fn overlay(&mut self, delta: &Self) {
        for (key, value) in delta.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Return a copy of this state with `delta` overlaid.
    #[must_use]
    pub fn overlaid(&self, delta: &Self) -> Self {
        let mut next = self.clone();
        next.overlay(delta);
        next
    }

    /// Canonical fingerprint of this state.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl StateView for WorldState {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl<K: Into<AttributeKey>, V: Into<Value>> FromIterator<(K, V)> for WorldState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A partial predicate over a state.
///
/// Satisfied iff every listed key is present in the state with an equal
/// value. Keys not listed are unconstrained, so the empty condition is
/// satisfied by every state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(BTreeMap<AttributeKey, Value>);

impl Condition {
    /// Create an empty (always satisfied) condition.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Require `key` to equal `value`.
    pub fn require(&mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`require`](Self::require).
    #[must_use]
    pub fn with(mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Self {
        self.require(key, value);
        self
    }

    /// Whether `state` satisfies every requirement.
    pub fn is_satisfied_by<S: StateView + ?Sized>(&self, state: &S) -> bool {
        self.0.iter().all(|(key, expected)| state.get(key.as_str()) == Some(expected))
    }

    /// Iterate required key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &Value)> {
        self.0.iter()
    }

    /// Whether no requirement is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<AttributeKey>, V: Into<Value>> FromIterator<(K, V)> for Condition {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Zero-copy union of a shared and a private partition.
///
/// Lookups consult the private partition first. Partitions are disjoint
/// once a layout has been validated, so the order only matters for
/// unvalidated input.
#[derive(Debug, Clone, Copy)]
pub struct Merged<'a> {
    /// World-visible partition.
    pub shared: &'a WorldState,
    /// The acting agent's partition.
    pub private: &'a WorldState,
}

impl<'a> Merged<'a> {
    /// Pair two partitions.
    pub const fn new(shared: &'a WorldState, private: &'a WorldState) -> Self {
        Self { shared, private }
    }

    /// Canonical fingerprint over the union of both partitions.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut union: BTreeMap<&AttributeKey, &Value> = self.shared.iter().collect();
        union.extend(self.private.iter());
        Fingerprint(union.into_iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Materialize the union as a single state.
    pub fn to_state(&self) -> WorldState {
        self.shared.overlaid(self.private)
    }
}

impl StateView for Merged<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.private.get(key).or_else(|| self.shared.get(key))
    }
}

/// Canonical, insertion-order-independent encoding of a state.
///
/// Key/value pairs sorted by key. Two states with identical pairs always
/// produce equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(Vec<(AttributeKey, Value)>);

impl Fingerprint {
    /// The sorted pairs making up this fingerprint.
    pub fn pairs(&self) -> &[(AttributeKey, Value)] {
        &self.0
    }
}
