//! Attribute values stored in a [`WorldState`].
//!
//! A [`Value`] is a tagged variant over the four kinds of facts the planner
//! reasons about. All precondition, goal, and effect comparisons go through
//! the single derived equality; there is no coercion between variants, so
//! `Int(1)` never equals `Bool(true)`.
//!
//! [`WorldState`]: crate::WorldState

use serde::{Deserialize, Serialize};

/// A point on the factory floor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal grid coordinate.
    pub x: i32,
    /// Vertical grid coordinate.
    pub y: i32,
}

impl Coord {
    /// Create a coordinate from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (taxicab) distance between two points.
    pub fn manhattan(self, other: Self) -> u64 {
        u64::from(self.x.abs_diff(other.x)).saturating_add(u64::from(self.y.abs_diff(other.y)))
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A single typed fact about the world or an agent.
///
/// Serialized untagged so configuration files can write plain scalars:
/// `true`, `2`, `"Optimal"`, or `{x: 10, y: 5}`.
///
/// The derived ordering exists only so that states have a canonical
/// fingerprint. It carries no domain meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag (inventory, machine toggles).
    Bool(bool),
    /// A signed count (resource quantities, produced items).
    Int(i64),
    /// A free-form label (machine status and similar enumerations).
    Text(String),
    /// A grid position.
    Coord(Coord),
}

impl Value {
    /// Return the coordinate if this value is one.
    pub const fn as_coord(&self) -> Option<Coord> {
        match self {
            Self::Coord(c) => Some(*c),
            _ => None,
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Coord(c) => write!(f, "{c}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Coord> for Value {
    fn from(c: Coord) -> Self {
        Self::Coord(c)
    }
}
