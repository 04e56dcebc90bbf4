// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Case conversion of node names.
//!
//! [`rename`] rewrites the names of memory maps, address blocks, registers,
//! fields and enumerated values to one case. Parameters keep their names since
//! values refer to them by `parameterId`. Optionally every description in the
//! tree that mentions an old name as a word is rewritten to the new one.

use crate::error::{IrError, Result};
use crate::model::*;
use crate::visit::{self, VisitMut};
use heck::{ToSnakeCase, ToUpperCamelCase};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Target case of a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameCase {
    /// `RX_BUFFER_SIZE` becomes `RxBufferSize`.
    UpperCamel,
    /// `RxBufferSize` becomes `rx_buffer_size`.
    Snake,
}

impl NameCase {
    /// Converts one name.
    pub fn apply(self, name: &str) -> String {
        match self {
            NameCase::UpperCamel => name.to_upper_camel_case(),
            NameCase::Snake => name.to_snake_case(),
        }
    }
}

/// Kinds of named nodes a rename can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameKind {
    /// Memory map names.
    MemoryMap,
    /// Address block names.
    AddressBlock,
    /// Register names.
    Register,
    /// Field names.
    Field,
    /// Enumerated value names.
    EnumeratedValue,
}

impl NameKind {
    /// Every kind, outermost first.
    pub const ALL: [NameKind; 5] = [
        NameKind::MemoryMap,
        NameKind::AddressBlock,
        NameKind::Register,
        NameKind::Field,
        NameKind::EnumeratedValue,
    ];

    fn as_str(self) -> &'static str {
        match self {
            NameKind::MemoryMap => "memory map",
            NameKind::AddressBlock => "address block",
            NameKind::Register => "register",
            NameKind::Field => "field",
            NameKind::EnumeratedValue => "enumerated value",
        }
    }
}

/// What [`rename`] converts.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Target case.
    pub case: NameCase,
    /// Node kinds to rename.
    pub kinds: Vec<NameKind>,
    /// Also rewrite mentions of renamed nodes in descriptions.
    pub descriptions: bool,
}

impl RenameOptions {
    /// Renames every kind, leaving descriptions alone.
    pub fn new(case: NameCase) -> Self {
        Self {
            case,
            kinds: NameKind::ALL.to_vec(),
            descriptions: false,
        }
    }
}

/// Outcome of a rename.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// `(old, new)` for every name that changed, in traversal order.
    pub renamed: Vec<(String, String)>,
    /// Descriptions that were rewritten.
    pub descriptions: usize,
}

/// Converts node names of `component` to `options.case`.
///
/// Fails when two siblings of one kind end up with the same name, e.g.
/// `RX_DATA` and `RxData`. The tree is then left partially renamed.
pub fn rename(component: &mut HwComponent, options: &RenameOptions) -> Result<RenameReport> {
    let mut renamer = Renamer {
        options,
        renamed: Vec::new(),
        error: None,
    };
    renamer.visit_component_mut(component);
    if let Some(err) = renamer.error {
        return Err(err);
    }

    let mut report = RenameReport {
        renamed: renamer.renamed,
        descriptions: 0,
    };
    if options.descriptions && !report.renamed.is_empty() {
        let mut rewriter = DescriptionRewriter {
            renamed: &report.renamed,
            count: 0,
        };
        rewriter.visit_component_mut(component);
        report.descriptions = rewriter.count;
    }
    debug!(
        "Renamed {} nodes, rewrote {} descriptions",
        report.renamed.len(),
        report.descriptions
    );
    Ok(report)
}

struct Renamer<'a> {
    options: &'a RenameOptions,
    renamed: Vec<(String, String)>,
    error: Option<IrError>,
}

impl Renamer<'_> {
    fn rename_siblings<'n>(
        &mut self,
        kind: NameKind,
        parent: &str,
        names: impl Iterator<Item = &'n mut String>,
    ) {
        if !self.options.kinds.contains(&kind) {
            return;
        }
        let mut seen = HashSet::new();
        for name in names {
            let new = self.options.case.apply(name);
            if !seen.insert(new.clone()) && self.error.is_none() {
                self.error = Some(IrError::NameCollision {
                    kind: kind.as_str(),
                    name: new.clone(),
                    parent: parent.to_string(),
                });
            }
            if *name != new {
                let old = std::mem::replace(name, new.clone());
                self.renamed.push((old, new));
            }
        }
    }
}

impl VisitMut for Renamer<'_> {
    fn visit_component_mut(&mut self, node: &mut HwComponent) {
        self.rename_siblings(
            NameKind::MemoryMap,
            &node.name,
            node.memory_maps.iter_mut().map(|m| &mut m.name),
        );
        visit::walk_component_mut(self, node);
    }

    fn visit_memory_map_mut(&mut self, node: &mut MemoryMap) {
        self.rename_siblings(
            NameKind::AddressBlock,
            &node.name,
            node.address_blocks.iter_mut().map(|b| &mut b.name),
        );
        visit::walk_memory_map_mut(self, node);
    }

    fn visit_address_block_mut(&mut self, node: &mut AddressBlock) {
        self.rename_siblings(
            NameKind::Register,
            &node.name,
            node.registers.iter_mut().map(|r| &mut r.name),
        );
        visit::walk_address_block_mut(self, node);
    }

    fn visit_register_mut(&mut self, node: &mut Register) {
        self.rename_siblings(
            NameKind::Field,
            &node.name,
            node.fields.iter_mut().map(|f| &mut f.name),
        );
        visit::walk_register_mut(self, node);
    }

    fn visit_field_mut(&mut self, node: &mut RegisterField) {
        self.rename_siblings(
            NameKind::EnumeratedValue,
            &node.name,
            node.enumerated_values.iter_mut().map(|e| &mut e.name),
        );
    }
}

struct DescriptionRewriter<'a> {
    renamed: &'a [(String, String)],
    count: usize,
}

impl DescriptionRewriter<'_> {
    fn rewrite(&mut self, description: &mut Option<String>) {
        let Some(text) = description.as_mut() else {
            return;
        };
        let mut changed = false;
        for (old, new) in self.renamed {
            if let Some(updated) = replace_word(text, old, new) {
                *text = updated;
                changed = true;
            }
        }
        if changed {
            self.count += 1;
        }
    }
}

impl VisitMut for DescriptionRewriter<'_> {
    fn visit_component_mut(&mut self, node: &mut HwComponent) {
        self.rewrite(&mut node.description);
        visit::walk_component_mut(self, node);
    }

    fn visit_parameter_mut(&mut self, node: &mut Parameter) {
        self.rewrite(&mut node.description);
    }

    fn visit_reset_type_mut(&mut self, node: &mut ResetType) {
        self.rewrite(&mut node.description);
    }

    fn visit_memory_map_mut(&mut self, node: &mut MemoryMap) {
        self.rewrite(&mut node.description);
        visit::walk_memory_map_mut(self, node);
    }

    fn visit_address_block_mut(&mut self, node: &mut AddressBlock) {
        self.rewrite(&mut node.description);
        visit::walk_address_block_mut(self, node);
    }

    fn visit_register_mut(&mut self, node: &mut Register) {
        self.rewrite(&mut node.description);
        visit::walk_register_mut(self, node);
    }

    fn visit_field_mut(&mut self, node: &mut RegisterField) {
        self.rewrite(&mut node.description);
        visit::walk_field_mut(self, node);
    }

    fn visit_enumerated_value_mut(&mut self, node: &mut EnumeratedValue) {
        self.rewrite(&mut node.description);
    }
}

/// Replaces mentions of `old` that follow whitespace and end the text or
/// precede a space, `.`, `,` or an opening bracket. `MODE[3:0]` and `MODE.ENA`
/// match, `TX_MODE` does not. `None` when nothing matched.
fn replace_word(text: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut matched = false;
    while let Some(pos) = rest.find(old) {
        let before = if pos > 0 {
            rest[..pos].chars().last()
        } else {
            out.chars().last()
        };
        let after = rest[pos + old.len()..].chars().next();
        let starts_word = before.is_some_and(char::is_whitespace);
        let ends_word = after.map_or(true, |c| matches!(c, ' ' | '.' | ',' | '[' | '(' | '{'));

        out.push_str(&rest[..pos]);
        if starts_word && ends_word {
            out.push_str(new);
            matched = true;
        } else {
            out.push_str(old);
        }
        rest = &rest[pos + old.len()..];
    }
    out.push_str(rest);
    matched.then_some(out)
}
