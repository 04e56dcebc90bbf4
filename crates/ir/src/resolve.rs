// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Parameter reference resolution.
//!
//! Values such as a register offset or a field width may name a parameter
//! instead of giving a literal. After the tree is built, every
//! [`ReferenceValue`] under the memory maps is looked up in the component's
//! parameter list by `parameterId`:
//!
//! - on a match, `value` becomes the parameter's value and
//!   `reference_object` records the parameter;
//! - otherwise `uuid` is cleared and the text stays as it was.
//!
//! Resolution is idempotent. Running it again on a resolved tree changes
//! nothing.

use crate::model::{AddressBlock, HwComponent, MemoryMap, Parameter, Register, RegisterField};
use crate::value::{parse_literal, ReferenceValue};
use crate::visit::{self, VisitMut};
use crate::{IirId, NamedObject, Object};
use serde::Serialize;
use tracing::{debug, warn};

/// A reference that named no parameter and is not a numeric literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// The reference value node.
    pub id: IirId,
    /// Path of the node holding the value, e.g. `Registers/CTRL/MODE`.
    pub owner: String,
    /// Text left in the value.
    pub placeholder: String,
}

/// Outcome of one resolution pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// References replaced by a parameter value.
    pub resolved: usize,
    /// Values that matched no parameter but read as numeric literals.
    pub literals: usize,
    /// Values that matched no parameter and are not numeric.
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolveReport {
    /// No suspect references were found.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolves every reference value reachable from the memory maps of
/// `component` against its parameters.
pub fn resolve_references(component: &mut HwComponent) -> ResolveReport {
    let HwComponent {
        parameters,
        memory_maps,
        ..
    } = component;

    let mut resolver = ReferenceResolver::new(parameters);
    for map in memory_maps.iter_mut() {
        resolver.visit_memory_map_mut(map);
    }
    resolver.into_report()
}

/// Visitor rewriting reference values from a parameter list.
pub struct ReferenceResolver<'a> {
    parameters: &'a [Parameter],
    path: Vec<String>,
    report: ResolveReport,
}

impl<'a> ReferenceResolver<'a> {
    /// Creates a resolver over `parameters`.
    pub fn new(parameters: &'a [Parameter]) -> Self {
        Self {
            parameters,
            path: Vec::new(),
            report: ResolveReport::default(),
        }
    }

    /// Finishes and returns what was resolved.
    pub fn into_report(self) -> ResolveReport {
        self.report
    }

    fn lookup(&self, uuid: &str) -> Option<&'a Parameter> {
        self.parameters
            .iter()
            .find(|param| param.parameter_id == uuid)
    }

    fn scoped<N: NamedObject>(&mut self, node: &mut N, walk: impl FnOnce(&mut Self, &mut N)) {
        self.path.push(node.name().to_string());
        walk(self, node);
        self.path.pop();
    }
}

impl VisitMut for ReferenceResolver<'_> {
    fn visit_memory_map_mut(&mut self, node: &mut MemoryMap) {
        self.scoped(node, |v, n| visit::walk_memory_map_mut(v, n));
    }

    fn visit_address_block_mut(&mut self, node: &mut AddressBlock) {
        self.scoped(node, |v, n| visit::walk_address_block_mut(v, n));
    }

    fn visit_register_mut(&mut self, node: &mut Register) {
        self.scoped(node, |v, n| visit::walk_register_mut(v, n));
    }

    fn visit_field_mut(&mut self, node: &mut RegisterField) {
        self.scoped(node, |v, n| visit::walk_field_mut(v, n));
    }

    fn visit_reference_value_mut(&mut self, node: &mut ReferenceValue) {
        let Some(uuid) = node.uuid.as_deref() else {
            return;
        };
        // Empty elements such as `<isPresent/>` name nothing.
        if uuid.trim().is_empty() {
            node.uuid = None;
            return;
        }

        if let Some(param) = self.lookup(uuid) {
            let Some(value) = param.value.as_ref() else {
                warn!(
                    "Parameter {} referenced by {} has no value",
                    param.name,
                    self.path.join("/")
                );
                node.uuid = None;
                return;
            };
            debug!(
                "Resolved reference {} to parameter {} = {}",
                uuid, param.name, value.value
            );
            node.value = value.value.clone();
            node.reference_object = Some(param.iir_id());
            self.report.resolved += 1;
            return;
        }

        node.uuid = None;
        if parse_literal(&node.value).is_some() {
            self.report.literals += 1;
            return;
        }

        let owner = self.path.join("/");
        warn!("Unresolved reference '{}' in {}", node.value, owner);
        self.report.unresolved.push(UnresolvedReference {
            id: node.iir_id(),
            owner,
            placeholder: node.value.clone(),
        });
    }
}
