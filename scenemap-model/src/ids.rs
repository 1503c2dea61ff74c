use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Series identifier as published by an indexer.
///
/// Stored documents call this `indexer_id`. Only ids `>= 1` address a real
/// series; anything else is accepted by lookups but never refreshed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SeriesId(pub i64);

impl SeriesId {
    pub fn new(id: i64) -> Self {
        SeriesId(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 >= 1
    }
}

impl From<i64> for SeriesId {
    fn from(id: i64) -> Self {
        SeriesId(id)
    }
}

impl FromStr for SeriesId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(SeriesId)
            .map_err(|_| ModelError::InvalidIdentity(s.to_string()))
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminates which indexer a series id belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct IndexerKind(pub u16);

impl IndexerKind {
    pub const TVDB: IndexerKind = IndexerKind(1);
    pub const TVRAGE: IndexerKind = IndexerKind(2);

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for IndexerKind {
    fn from(kind: u16) -> Self {
        IndexerKind(kind)
    }
}

impl fmt::Display for IndexerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity assigned to a record by the store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
