// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! RegMap Intermediate Representation (IR)
//!
//! This crate defines the typed tree used to model an IP-XACT hardware component
//! and its register map. It serves as the common language between:
//!
//! 1. **Ingestion**: the IP-XACT XML parser which builds the tree.
//! 2. **Transformations**: reference resolution, renaming and word grouping.
//! 3. **Generators**: C headers, VHDL packages and documentation tables.
//!
//! Every node owns its children exclusively. Parent links and references to
//! parameters are non-owning [`IirId`] handles, never pointers.

#![warn(missing_docs)]

mod enums;
mod error;
mod id;
mod model;
mod value;

pub mod grouping;
pub mod rename;
pub mod resolve;
pub mod tree;
pub mod visit;

pub use enums::*;
pub use error::{IrError, Result};
pub use id::{IirId, NodeMeta};
pub use model::*;
pub use value::{parse_literal, ReferenceValue, Value};

/// Common accessors of every IR node.
pub trait Object {
    /// Identity and parent link of the node.
    fn meta(&self) -> &NodeMeta;

    /// Process-unique identifier of the node.
    fn iir_id(&self) -> IirId {
        self.meta().id
    }

    /// Identifier of the owning node, `None` for the root or before linking.
    fn parent(&self) -> Option<IirId> {
        self.meta().parent
    }
}

/// Nodes carrying a name, an optional display name and a description.
pub trait NamedObject: Object {
    /// Name, unique among siblings of the same kind.
    fn name(&self) -> &str;
    /// Human-readable name.
    fn display_name(&self) -> Option<&str>;
    /// Free-text description.
    fn description(&self) -> Option<&str>;
}
