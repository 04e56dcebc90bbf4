// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! C header with register addresses, bitfield unions and field enums.
//!
//! Registers sharing one access word are emitted as a single union:
//!
//! ```c
//! union ctu_can_fd_mode_settings {
//!   uint32_t u32;
//!   struct ctu_can_fd_mode_settings_s {
//!     uint32_t rst        : 1;
//!     uint32_t reserved_0 : 3;
//!     ...
//!   } s;
//! };
//! ```

use crate::writer::CodeWriter;
use crate::{
    header_guard, prefixed, select_memory_map, write_preamble, GeneratorOptions,
    RegisterMapGenerator,
};
use anyhow::Result;
use heck::{ToShoutySnakeCase, ToSnakeCase};
use regmap_ir::grouping::{group_registers, word_bit_position};
use regmap_ir::{HwComponent, MemoryMap, Register};
use tracing::info;

/// Writes a C header for one memory map.
pub struct CHeaderGenerator {
    options: GeneratorOptions,
}

struct Bitfield {
    position: u64,
    width: u64,
    name: String,
    /// Set on the first field of each register.
    register: Option<String>,
}

impl CHeaderGenerator {
    /// Creates a generator writing with `options`.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    fn write_union(&self, w: &mut CodeWriter, group: &[&Register]) -> Result<()> {
        let word_width = u64::from(self.options.word_width);
        let word_type = format!("uint{}_t", self.options.word_width);
        let names: Vec<&str> = group.iter().map(|reg| reg.name.as_str()).collect();
        let union_name = prefixed(&self.options.prefix, &names.join("_")).to_snake_case();

        let mut fields = Vec::new();
        for reg in group {
            for (i, field) in reg.sorted_fields()?.into_iter().enumerate() {
                fields.push(Bitfield {
                    position: word_bit_position(reg, field, self.options.word_bytes())?,
                    width: field.bit_width()?,
                    name: field.name.to_snake_case(),
                    register: (i == 0).then(|| reg.name.to_uppercase()),
                });
            }
        }

        // Gaps between fields become reserved bitfields.
        let mut members = Vec::new();
        let mut reserved = 0;
        let mut next = 0;
        for field in fields {
            if field.position > next {
                members.push((None, format!("reserved_{reserved}"), field.position - next));
                reserved += 1;
            }
            next = next.max(field.position.saturating_add(field.width));
            members.push((field.register, field.name, field.width));
        }
        if next < word_width {
            members.push((None, format!("reserved_{reserved}"), word_width - next));
        }
        let pad = members.iter().map(|(_, name, _)| name.len()).max().unwrap_or(0);

        let mut union = w.scope(format!("union {union_name} {{"), "};");
        union.write_line(format!("{word_type} u{};", self.options.word_width));
        let mut body = union.scope(format!("struct {union_name}_s {{"), "} s;");
        for (register, name, width) in members {
            if let Some(register) = register {
                body.write_comment(&register, None, true, false);
            }
            body.write_line(format!("{word_type} {name:<pad$} : {width};"));
        }
        Ok(())
    }

    fn write_field_enums(&self, w: &mut CodeWriter, reg: &Register) -> Result<()> {
        for field in reg.sorted_fields()? {
            if field.enumerated_values.is_empty() {
                continue;
            }
            let mut values = field
                .enumerated_values
                .iter()
                .map(|e| Ok((e.require_u64()?, e.name.to_shouty_snake_case())))
                .collect::<regmap_ir::Result<Vec<_>>>()?;
            values.sort_by_key(|(value, _)| *value);

            let enum_name = prefixed(
                &self.options.prefix,
                &format!("{}_{}", reg.name, field.name),
            )
            .to_snake_case();
            let mut body = w.scope(format!("enum {enum_name} {{"), "};");
            for (value, name) in values {
                body.write_line(format!("{name} = {value},"));
            }
            body.close();
            w.write_blank_line();
        }
        Ok(())
    }
}

/// Enum of absolute register addresses over every block of `map`.
pub(crate) fn write_address_enum(w: &mut CodeWriter, map: &MemoryMap, prefix: &str) -> Result<()> {
    w.write_comment(&format!("{} memory map", map.name), None, true, true);

    let mut entries = Vec::new();
    for block in &map.address_blocks {
        for reg in block.sorted_registers()? {
            entries.push((
                prefixed(prefix, &reg.name).to_shouty_snake_case(),
                block.register_address(reg)?,
            ));
        }
    }
    let pad = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut body = w.scope(format!("enum {} {{", prefixed(prefix, &map.name).to_snake_case()), "};");
    for (name, address) in entries {
        body.write_line(format!("{name:<pad$} = {address:#06x},"));
    }
    Ok(())
}

impl RegisterMapGenerator for CHeaderGenerator {
    fn generate(&self, component: &HwComponent) -> Result<String> {
        let map = select_memory_map(component, &self.options)?;
        let mut w = CodeWriter::new(self.options.style.clone().with_comment_char('/'));

        write_preamble(&mut w, self.options.license.as_deref());
        let guard = header_guard(&self.options);
        w.write_line(format!("#ifndef {guard}"));
        w.write_line(format!("#define {guard}"));
        w.push_deferred(format!("#endif /* {guard} */"));
        w.write_blank_line();

        info!("Writing addresses of '{}' register map", map.name);
        write_address_enum(&mut w, map, &self.options.prefix)?;
        w.write_blank_line();

        w.write_comment("Register descriptions:", None, false, true);
        w.write_blank_line();
        info!("Writing bit fields of '{}' register map", map.name);
        for block in map.address_blocks.iter().filter(|b| !b.is_memory()) {
            for group in group_registers(&block.registers, self.options.word_bytes())? {
                self.write_union(&mut w, &group)?;
                w.write_blank_line();
                for reg in &group {
                    self.write_field_enums(&mut w, reg)?;
                }
            }
        }

        w.flush_deferred_all();
        Ok(w.finish())
    }
}
