//! Core identity primitives for block-addressable documents.
//!
//! This module provides the leaf utilities every other layer depends on:
//!
//! - [`BlockId`] - Stable string identifier carried by every addressable block
//! - [`IdGenerator`] - Source of fresh identifiers, injected into the flattener
//! - [`UuidIds`] - Random v4 UUID generator used in production
//! - [`SequentialIds`] - Deterministic counter for tests and fixtures

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identifier of a single block inside one document.
///
/// Stored ids are opaque strings (`"p1"`, a UUID, or a legacy
/// `block-xxxxxxx-<millis>` value) and are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for BlockId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BlockId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A source of fresh block identifiers.
///
/// Implementations only need to avoid collisions with other ids produced in
/// the same process for the same document.
pub trait IdGenerator {
    fn next_id(&mut self) -> BlockId;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> BlockId,
{
    fn next_id(&mut self) -> BlockId {
        self()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> BlockId {
        BlockId::from(Uuid::new_v4())
    }
}

/// Deterministic `<prefix>-<n>` ids, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("block")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
