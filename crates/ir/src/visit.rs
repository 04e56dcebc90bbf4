// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Exhaustive traversal of the IR tree.
//!
//! [`Visit`] walks a shared tree and [`VisitMut`] a mutable one. Every method
//! defaults to the matching `walk_*` function, which visits the children of
//! the node in document order. Override a method to act on a node kind and
//! call the `walk_*` function to keep descending. Parent handles are never
//! followed, and reference values are leaves.

use crate::model::*;
use crate::value::{ReferenceValue, Value};

/// Read-only visitor.
#[allow(unused_variables)]
pub trait Visit<'ast> {
    /// Component root.
    fn visit_component(&mut self, node: &'ast HwComponent) {
        walk_component(self, node)
    }
    /// Parameter.
    fn visit_parameter(&mut self, node: &'ast Parameter) {
        walk_parameter(self, node)
    }
    /// Reset domain.
    fn visit_reset_type(&mut self, node: &'ast ResetType) {}
    /// Vendor extension.
    fn visit_vendor_extension(&mut self, node: &'ast VendorExtension) {
        walk_vendor_extension(self, node)
    }
    /// Memory map.
    fn visit_memory_map(&mut self, node: &'ast MemoryMap) {
        walk_memory_map(self, node)
    }
    /// Address block.
    fn visit_address_block(&mut self, node: &'ast AddressBlock) {
        walk_address_block(self, node)
    }
    /// Register.
    fn visit_register(&mut self, node: &'ast Register) {
        walk_register(self, node)
    }
    /// Register field.
    fn visit_field(&mut self, node: &'ast RegisterField) {
        walk_field(self, node)
    }
    /// Field reset.
    fn visit_reset(&mut self, node: &'ast Reset) {
        walk_reset(self, node)
    }
    /// Enumerated value.
    fn visit_enumerated_value(&mut self, node: &'ast EnumeratedValue) {
        walk_enumerated_value(self, node)
    }
    /// Reference value leaf.
    fn visit_reference_value(&mut self, node: &'ast ReferenceValue) {}
    /// Literal value leaf.
    fn visit_value(&mut self, node: &'ast Value) {}
}

/// Visits parameters, reset types, memory maps and vendor extensions.
pub fn walk_component<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast HwComponent) {
    for param in &node.parameters {
        v.visit_parameter(param);
    }
    for reset_type in &node.reset_types {
        v.visit_reset_type(reset_type);
    }
    for map in &node.memory_maps {
        v.visit_memory_map(map);
    }
    for ext in &node.vendor_extensions {
        v.visit_vendor_extension(ext);
    }
}

/// Visits the parameter value.
pub fn walk_parameter<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Parameter) {
    if let Some(value) = &node.value {
        v.visit_reference_value(value);
    }
}

/// Visits nested vendor elements.
pub fn walk_vendor_extension<'ast, V: Visit<'ast> + ?Sized>(
    v: &mut V,
    node: &'ast VendorExtension,
) {
    for child in &node.children {
        v.visit_vendor_extension(child);
    }
}

/// Visits the guard and the address blocks.
pub fn walk_memory_map<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast MemoryMap) {
    if let Some(value) = &node.is_present {
        v.visit_reference_value(value);
    }
    for block in &node.address_blocks {
        v.visit_address_block(block);
    }
}

/// Visits block values and registers.
pub fn walk_address_block<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast AddressBlock) {
    for value in [
        &node.base_address,
        &node.block_range,
        &node.width,
        &node.is_present,
    ]
    .into_iter()
    .flatten()
    {
        v.visit_reference_value(value);
    }
    for reg in &node.registers {
        v.visit_register(reg);
    }
}

/// Visits register values and fields.
pub fn walk_register<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Register) {
    for value in [&node.offset, &node.size, &node.dimension, &node.is_present]
        .into_iter()
        .flatten()
    {
        v.visit_reference_value(value);
    }
    for field in &node.fields {
        v.visit_field(field);
    }
}

/// Visits field values, resets and enumerated values.
pub fn walk_field<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast RegisterField) {
    if let Some(value) = &node.field_id {
        v.visit_value(value);
    }
    for value in [
        &node.offset,
        &node.width,
        &node.is_present,
        &node.reserved,
        &node.write_constraint_minimum,
        &node.write_constraint_maximum,
    ]
    .into_iter()
    .flatten()
    {
        v.visit_reference_value(value);
    }
    for reset in &node.resets {
        v.visit_reset(reset);
    }
    for enum_value in &node.enumerated_values {
        v.visit_enumerated_value(enum_value);
    }
}

/// Visits reset value and mask.
pub fn walk_reset<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Reset) {
    for value in [&node.reset_value, &node.reset_mask].into_iter().flatten() {
        v.visit_reference_value(value);
    }
}

/// Visits the encoded value.
pub fn walk_enumerated_value<'ast, V: Visit<'ast> + ?Sized>(
    v: &mut V,
    node: &'ast EnumeratedValue,
) {
    if let Some(value) = &node.value {
        v.visit_value(value);
    }
}

/// Mutating visitor.
#[allow(unused_variables)]
pub trait VisitMut {
    /// Component root.
    fn visit_component_mut(&mut self, node: &mut HwComponent) {
        walk_component_mut(self, node)
    }
    /// Parameter.
    fn visit_parameter_mut(&mut self, node: &mut Parameter) {
        walk_parameter_mut(self, node)
    }
    /// Reset domain.
    fn visit_reset_type_mut(&mut self, node: &mut ResetType) {}
    /// Vendor extension.
    fn visit_vendor_extension_mut(&mut self, node: &mut VendorExtension) {
        walk_vendor_extension_mut(self, node)
    }
    /// Memory map.
    fn visit_memory_map_mut(&mut self, node: &mut MemoryMap) {
        walk_memory_map_mut(self, node)
    }
    /// Address block.
    fn visit_address_block_mut(&mut self, node: &mut AddressBlock) {
        walk_address_block_mut(self, node)
    }
    /// Register.
    fn visit_register_mut(&mut self, node: &mut Register) {
        walk_register_mut(self, node)
    }
    /// Register field.
    fn visit_field_mut(&mut self, node: &mut RegisterField) {
        walk_field_mut(self, node)
    }
    /// Field reset.
    fn visit_reset_mut(&mut self, node: &mut Reset) {
        walk_reset_mut(self, node)
    }
    /// Enumerated value.
    fn visit_enumerated_value_mut(&mut self, node: &mut EnumeratedValue) {
        walk_enumerated_value_mut(self, node)
    }
    /// Reference value leaf.
    fn visit_reference_value_mut(&mut self, node: &mut ReferenceValue) {}
    /// Literal value leaf.
    fn visit_value_mut(&mut self, node: &mut Value) {}
}

/// Mutable counterpart of [`walk_component`].
pub fn walk_component_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut HwComponent) {
    for param in &mut node.parameters {
        v.visit_parameter_mut(param);
    }
    for reset_type in &mut node.reset_types {
        v.visit_reset_type_mut(reset_type);
    }
    for map in &mut node.memory_maps {
        v.visit_memory_map_mut(map);
    }
    for ext in &mut node.vendor_extensions {
        v.visit_vendor_extension_mut(ext);
    }
}

/// Mutable counterpart of [`walk_parameter`].
pub fn walk_parameter_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Parameter) {
    if let Some(value) = &mut node.value {
        v.visit_reference_value_mut(value);
    }
}

/// Mutable counterpart of [`walk_vendor_extension`].
pub fn walk_vendor_extension_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut VendorExtension) {
    for child in &mut node.children {
        v.visit_vendor_extension_mut(child);
    }
}

/// Mutable counterpart of [`walk_memory_map`].
pub fn walk_memory_map_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut MemoryMap) {
    if let Some(value) = &mut node.is_present {
        v.visit_reference_value_mut(value);
    }
    for block in &mut node.address_blocks {
        v.visit_address_block_mut(block);
    }
}

/// Mutable counterpart of [`walk_address_block`].
pub fn walk_address_block_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut AddressBlock) {
    for value in [
        &mut node.base_address,
        &mut node.block_range,
        &mut node.width,
        &mut node.is_present,
    ]
    .into_iter()
    .flatten()
    {
        v.visit_reference_value_mut(value);
    }
    for reg in &mut node.registers {
        v.visit_register_mut(reg);
    }
}

/// Mutable counterpart of [`walk_register`].
pub fn walk_register_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Register) {
    for value in [
        &mut node.offset,
        &mut node.size,
        &mut node.dimension,
        &mut node.is_present,
    ]
    .into_iter()
    .flatten()
    {
        v.visit_reference_value_mut(value);
    }
    for field in &mut node.fields {
        v.visit_field_mut(field);
    }
}

/// Mutable counterpart of [`walk_field`].
pub fn walk_field_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut RegisterField) {
    if let Some(value) = &mut node.field_id {
        v.visit_value_mut(value);
    }
    for value in [
        &mut node.offset,
        &mut node.width,
        &mut node.is_present,
        &mut node.reserved,
        &mut node.write_constraint_minimum,
        &mut node.write_constraint_maximum,
    ]
    .into_iter()
    .flatten()
    {
        v.visit_reference_value_mut(value);
    }
    for reset in &mut node.resets {
        v.visit_reset_mut(reset);
    }
    for enum_value in &mut node.enumerated_values {
        v.visit_enumerated_value_mut(enum_value);
    }
}

/// Mutable counterpart of [`walk_reset`].
pub fn walk_reset_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Reset) {
    for value in [&mut node.reset_value, &mut node.reset_mask]
        .into_iter()
        .flatten()
    {
        v.visit_reference_value_mut(value);
    }
}

/// Mutable counterpart of [`walk_enumerated_value`].
pub fn walk_enumerated_value_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut EnumeratedValue) {
    if let Some(value) = &mut node.value {
        v.visit_value_mut(value);
    }
}
