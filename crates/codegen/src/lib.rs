// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Source generators for resolved register maps.
//!
//! Every backend writes through a [`CodeWriter`]. Register map backends
//! implement [`RegisterMapGenerator`] and consume a component whose references
//! were already resolved by the ingestor.

#![warn(missing_docs)]

pub mod c_header;
pub mod entity_table;
pub mod kernel_header;
pub mod register_doc;
pub mod vhdl_package;
pub mod writer;

pub use c_header::CHeaderGenerator;
pub use entity_table::EntityTableGenerator;
pub use kernel_header::KernelHeaderGenerator;
pub use register_doc::{DocOptions, RegisterDocGenerator};
pub use vhdl_package::VhdlPackageGenerator;
pub use writer::{CodeWriter, Scope, Style};

use anyhow::{Context, Result};
use heck::ToShoutySnakeCase;
use regmap_ir::{HwComponent, MemoryMap};

/// Options shared by the register map backends.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Package or header name.
    pub name: String,
    /// Identifier prefix, may be empty.
    pub prefix: String,
    /// Access word width in bits.
    pub word_width: u32,
    /// Memory map to generate, the first one when `None`.
    pub memory_map: Option<String>,
    /// License text written as a comment at the top of the output.
    pub license: Option<String>,
    /// Indentation and line length of the output.
    pub style: Style,
}

impl GeneratorOptions {
    /// Options for output `name` with a 32-bit word, no prefix and the
    /// first memory map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: String::new(),
            word_width: 32,
            memory_map: None,
            license: None,
            style: Style::default(),
        }
    }

    /// Access word width in bytes.
    pub fn word_bytes(&self) -> u64 {
        u64::from(self.word_width / 8).max(1)
    }
}

/// A backend turning one memory map of a component into source text.
pub trait RegisterMapGenerator {
    /// Source text for the selected memory map of `component`.
    ///
    /// Fails when the memory map does not exist or a value the backend needs
    /// is missing, not numeric or out of range.
    fn generate(&self, component: &HwComponent) -> Result<String>;
}

pub(crate) fn select_memory_map<'a>(
    component: &'a HwComponent,
    options: &GeneratorOptions,
) -> Result<&'a MemoryMap> {
    component
        .memory_map(options.memory_map.as_deref())
        .with_context(|| match &options.memory_map {
            Some(name) => format!("Memory map '{}' not found in {}", name, component.name),
            None => format!("Component {} has no memory map", component.name),
        })
}

/// `prefix_name`, or `name` alone when there is no prefix.
pub(crate) fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}_{name}")
    }
}

pub(crate) fn header_guard(options: &GeneratorOptions) -> String {
    format!("__{}__", prefixed(&options.prefix, &options.name).to_shouty_snake_case())
}

/// License block and the do-not-edit note.
pub(crate) fn write_preamble(w: &mut CodeWriter, license: Option<&str>) {
    if let Some(license) = license {
        w.write_comment_lines(license);
        w.write_blank_line();
    }
    w.write_comment("This file is autogenerated, DO NOT EDIT!", None, true, true);
    w.write_blank_line();
}

/// Escapes characters with a special meaning in LaTeX text.
pub(crate) fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' | '&' | '%' | '#' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}
