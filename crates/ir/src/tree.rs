// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Whole-tree utilities: parent linking, identifier collection and an
//! indented outline printer.

use crate::id::{IirId, NodeMeta};
use crate::model::*;
use crate::value::{ReferenceValue, Value};
use crate::visit::{self, Visit, VisitMut};
use crate::Object;
use std::fmt::Write;

impl HwComponent {
    /// Sets the parent handle of every node below the component.
    pub fn link_parents(&mut self) {
        ParentLinker::default().visit_component_mut(self);
    }

    /// Identifiers of every node of the tree, in traversal order.
    pub fn collect_ids(&self) -> Vec<IirId> {
        let mut collector = IdCollector::default();
        collector.visit_component(self);
        collector.ids
    }
}

#[derive(Default)]
struct ParentLinker {
    stack: Vec<IirId>,
}

impl ParentLinker {
    fn enter(&mut self, meta: &mut NodeMeta) {
        meta.parent = self.stack.last().copied();
        self.stack.push(meta.id);
    }

    fn leave(&mut self) {
        self.stack.pop();
    }

    fn leaf(&self, meta: &mut NodeMeta) {
        meta.parent = self.stack.last().copied();
    }
}

impl VisitMut for ParentLinker {
    fn visit_component_mut(&mut self, node: &mut HwComponent) {
        self.enter(&mut node.meta);
        visit::walk_component_mut(self, node);
        self.leave();
    }

    fn visit_parameter_mut(&mut self, node: &mut Parameter) {
        self.enter(&mut node.meta);
        visit::walk_parameter_mut(self, node);
        self.leave();
    }

    fn visit_reset_type_mut(&mut self, node: &mut ResetType) {
        self.leaf(&mut node.meta);
    }

    fn visit_vendor_extension_mut(&mut self, node: &mut VendorExtension) {
        self.enter(&mut node.meta);
        visit::walk_vendor_extension_mut(self, node);
        self.leave();
    }

    fn visit_memory_map_mut(&mut self, node: &mut MemoryMap) {
        self.enter(&mut node.meta);
        visit::walk_memory_map_mut(self, node);
        self.leave();
    }

    fn visit_address_block_mut(&mut self, node: &mut AddressBlock) {
        self.enter(&mut node.meta);
        visit::walk_address_block_mut(self, node);
        self.leave();
    }

    fn visit_register_mut(&mut self, node: &mut Register) {
        self.enter(&mut node.meta);
        visit::walk_register_mut(self, node);
        self.leave();
    }

    fn visit_field_mut(&mut self, node: &mut RegisterField) {
        self.enter(&mut node.meta);
        visit::walk_field_mut(self, node);
        self.leave();
    }

    fn visit_reset_mut(&mut self, node: &mut Reset) {
        self.enter(&mut node.meta);
        visit::walk_reset_mut(self, node);
        self.leave();
    }

    fn visit_enumerated_value_mut(&mut self, node: &mut EnumeratedValue) {
        self.enter(&mut node.meta);
        visit::walk_enumerated_value_mut(self, node);
        self.leave();
    }

    fn visit_reference_value_mut(&mut self, node: &mut ReferenceValue) {
        self.leaf(&mut node.meta);
    }

    fn visit_value_mut(&mut self, node: &mut Value) {
        self.leaf(&mut node.meta);
    }
}

#[derive(Default)]
struct IdCollector {
    ids: Vec<IirId>,
}

impl<'ast> Visit<'ast> for IdCollector {
    fn visit_component(&mut self, node: &'ast HwComponent) {
        self.ids.push(node.iir_id());
        visit::walk_component(self, node);
    }

    fn visit_parameter(&mut self, node: &'ast Parameter) {
        self.ids.push(node.iir_id());
        visit::walk_parameter(self, node);
    }

    fn visit_reset_type(&mut self, node: &'ast ResetType) {
        self.ids.push(node.iir_id());
    }

    fn visit_vendor_extension(&mut self, node: &'ast VendorExtension) {
        self.ids.push(node.iir_id());
        visit::walk_vendor_extension(self, node);
    }

    fn visit_memory_map(&mut self, node: &'ast MemoryMap) {
        self.ids.push(node.iir_id());
        visit::walk_memory_map(self, node);
    }

    fn visit_address_block(&mut self, node: &'ast AddressBlock) {
        self.ids.push(node.iir_id());
        visit::walk_address_block(self, node);
    }

    fn visit_register(&mut self, node: &'ast Register) {
        self.ids.push(node.iir_id());
        visit::walk_register(self, node);
    }

    fn visit_field(&mut self, node: &'ast RegisterField) {
        self.ids.push(node.iir_id());
        visit::walk_field(self, node);
    }

    fn visit_reset(&mut self, node: &'ast Reset) {
        self.ids.push(node.iir_id());
        visit::walk_reset(self, node);
    }

    fn visit_enumerated_value(&mut self, node: &'ast EnumeratedValue) {
        self.ids.push(node.iir_id());
        visit::walk_enumerated_value(self, node);
    }

    fn visit_reference_value(&mut self, node: &'ast ReferenceValue) {
        self.ids.push(node.iir_id());
    }

    fn visit_value(&mut self, node: &'ast Value) {
        self.ids.push(node.iir_id());
    }
}

/// Renders the component as an indented outline, one node per line.
///
/// ```text
/// component CAN_FD (ctu/can/CAN_FD/2.1)
///   memory map Registers
///     address block Control @ 0x0
///       register MODE @ 0x0, 32 bits
///         field RST [0 +1] read-write
/// ```
pub fn print_tree(component: &HwComponent) -> String {
    let mut printer = TreePrinter::default();
    printer.visit_component(component);
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{:indent$}{}", "", text, indent = self.depth * 2);
    }

    fn nested(&mut self, walk: impl FnOnce(&mut Self)) {
        self.depth += 1;
        walk(self);
        self.depth -= 1;
    }
}

fn text(value: &Option<ReferenceValue>) -> &str {
    value.as_ref().map_or("?", |v| v.value.as_str())
}

impl<'ast> Visit<'ast> for TreePrinter {
    fn visit_component(&mut self, node: &'ast HwComponent) {
        let vlnv = &node.vlnv;
        self.line(format_args!(
            "component {} ({}/{}/{}/{})",
            node.name, vlnv.vendor, vlnv.library, vlnv.name, vlnv.version
        ));
        self.nested(|p| visit::walk_component(p, node));
    }

    fn visit_parameter(&mut self, node: &'ast Parameter) {
        self.line(format_args!(
            "parameter {} [{}] = {}",
            node.name,
            node.parameter_id,
            text(&node.value)
        ));
    }

    fn visit_reset_type(&mut self, node: &'ast ResetType) {
        self.line(format_args!("reset type {}", node.name));
    }

    fn visit_vendor_extension(&mut self, node: &'ast VendorExtension) {
        match node.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => self.line(format_args!("extension {} = {}", node.tag, text)),
            None => self.line(format_args!("extension {}", node.tag)),
        }
        self.nested(|p| visit::walk_vendor_extension(p, node));
    }

    fn visit_memory_map(&mut self, node: &'ast MemoryMap) {
        self.line(format_args!("memory map {}", node.name));
        self.nested(|p| visit::walk_memory_map(p, node));
    }

    fn visit_address_block(&mut self, node: &'ast AddressBlock) {
        self.line(format_args!(
            "address block {} @ {}",
            node.name,
            text(&node.base_address)
        ));
        self.nested(|p| visit::walk_address_block(p, node));
    }

    fn visit_register(&mut self, node: &'ast Register) {
        self.line(format_args!(
            "register {} @ {}, {} bits",
            node.name,
            text(&node.offset),
            text(&node.size)
        ));
        self.nested(|p| visit::walk_register(p, node));
    }

    fn visit_field(&mut self, node: &'ast RegisterField) {
        self.line(format_args!(
            "field {} [{} +{}] {}",
            node.name,
            text(&node.offset),
            text(&node.width),
            node.access.as_ipxact().unwrap_or("-")
        ));
        self.nested(|p| visit::walk_field(p, node));
    }

    fn visit_reset(&mut self, node: &'ast Reset) {
        self.line(format_args!(
            "reset {} = {}",
            node.reset_reference.as_deref().unwrap_or("-"),
            text(&node.reset_value)
        ));
    }

    fn visit_enumerated_value(&mut self, node: &'ast EnumeratedValue) {
        let value = node.value.as_ref().map_or("?", |v| v.value.as_str());
        self.line(format_args!("enum {} = {}", node.name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn component() -> HwComponent {
        let mut component = HwComponent::new(Vlnv {
            vendor: "ctu".into(),
            library: "can".into(),
            name: "CAN_FD".into(),
            version: "2.1".into(),
        });
        component.memory_maps.push(MemoryMap {
            name: "Registers".into(),
            address_blocks: vec![AddressBlock {
                name: "Control".into(),
                base_address: Some(ReferenceValue::new("0x0")),
                registers: vec![Register {
                    name: "MODE".into(),
                    offset: Some(ReferenceValue::new("0x0")),
                    size: Some(ReferenceValue::new("32")),
                    fields: vec![RegisterField {
                        name: "RST".into(),
                        offset: Some(ReferenceValue::new("0")),
                        width: Some(ReferenceValue::new("1")),
                        access: crate::Access::ReadWrite,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        });
        component
    }

    #[test]
    fn test_link_parents() {
        let mut component = component();
        component.link_parents();

        let map = &component.memory_maps[0];
        let block = &map.address_blocks[0];
        let reg = &block.registers[0];
        let field = &reg.fields[0];

        assert_eq!(component.parent(), None);
        assert_eq!(map.parent(), Some(component.iir_id()));
        assert_eq!(block.parent(), Some(map.iir_id()));
        assert_eq!(reg.parent(), Some(block.iir_id()));
        assert_eq!(field.parent(), Some(reg.iir_id()));
        assert_eq!(field.width.as_ref().unwrap().parent(), Some(field.iir_id()));
    }

    #[test]
    fn test_collect_ids_are_unique() {
        let component = component();
        let ids = component.collect_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        // component, map, block, base, register, offset, size, field, offset, width
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_print_tree() {
        let out = print_tree(&component());
        let expected = "\
component CAN_FD (ctu/can/CAN_FD/2.1)
  memory map Registers
    address block Control @ 0x0
      register MODE @ 0x0, 32 bits
        field RST [0 +1] read-write
";
        assert_eq!(out, expected);
    }
}
