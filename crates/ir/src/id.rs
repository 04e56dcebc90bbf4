// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an IR node.
///
/// Identifiers come from a monotonic atomic counter and are never reused
/// during the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IirId(u64);

impl IirId {
    /// Allocates the next identifier.
    pub fn next() -> Self {
        IirId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and (non-owning) parent link shared by all nodes.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    /// Identifier assigned at creation.
    pub id: IirId,

    /// Owner of this node, set by the owner once the tree is assembled.
    #[serde(skip)]
    pub parent: Option<IirId>,
}

impl NodeMeta {
    /// Creates metadata with a fresh identifier and no parent.
    pub fn new() -> Self {
        Self {
            id: IirId::next(),
            parent: None,
        }
    }
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let a = IirId::next();
        let b = IirId::next();
        assert!(b > a);
        assert_ne!(NodeMeta::new().id, NodeMeta::new().id);
    }
}
