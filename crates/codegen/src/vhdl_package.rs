// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! VHDL package of register addresses, field bit ranges, enumerated values
//! and reset values.

use crate::writer::CodeWriter;
use crate::{prefixed, select_memory_map, write_preamble, GeneratorOptions, RegisterMapGenerator};
use anyhow::Result;
use heck::{ToShoutySnakeCase, ToSnakeCase};
use regmap_ir::grouping::word_bit_range;
use regmap_ir::{HwComponent, MemoryMap, Register};
use tracing::info;

/// Narrowest address constant, in bits.
const MIN_ADDRESS_BITS: u32 = 12;

/// Writes a VHDL constants package for one memory map.
pub struct VhdlPackageGenerator {
    options: GeneratorOptions,
}

/// Type and literal of a constant holding `value` in `width` bits.
fn std_logic_constant(value: u64, width: u64) -> (String, String) {
    if width <= 1 {
        return ("std_logic".to_string(), format!("'{}'", value & 1));
    }
    let kind = format!("std_logic_vector({} downto 0)", width - 1);
    let digits = width as usize;
    let literal = if width % 4 == 0 {
        format!("x\"{:0nibbles$X}\"", value, nibbles = digits / 4)
    } else {
        format!("\"{:0digits$b}\"", value)
    };
    (kind, literal)
}

/// Address width of `map`: at least 12 bits, whole nibbles.
fn address_bits(map: &MemoryMap) -> Result<u32> {
    let mut highest = 0;
    for block in &map.address_blocks {
        for reg in &block.registers {
            highest = highest.max(block.register_address(reg)?);
        }
    }
    let needed = u64::BITS - highest.leading_zeros();
    Ok(needed.max(MIN_ADDRESS_BITS).div_ceil(4) * 4)
}

impl VhdlPackageGenerator {
    /// Creates a generator writing with `options`.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    fn constant(&self, w: &mut CodeWriter, name: &str, kind: &str, value: &str) {
        w.write_line(format!("constant {name:<28} : {kind} := {value};"));
    }

    fn write_addresses(&self, w: &mut CodeWriter, map: &MemoryMap) -> Result<()> {
        let bits = address_bits(map)?;
        let kind = format!("std_logic_vector({} downto 0)", bits - 1);
        let nibbles = (bits / 4) as usize;

        w.write_comment(&format!("{} memory map addresses", map.name), None, true, true);
        for block in &map.address_blocks {
            for reg in block.sorted_registers()? {
                let address = block.register_address(reg)?;
                let name = format!("{}_ADR", reg.name.to_shouty_snake_case());
                self.constant(w, &name, &kind, &format!("x\"{address:0nibbles$X}\""));
            }
        }
        w.write_blank_line();
        Ok(())
    }

    fn write_register(&self, w: &mut CodeWriter, reg: &Register) -> Result<()> {
        w.write_comment(&format!("{} register", reg.name.to_uppercase()), None, true, true);

        let fields = reg.sorted_fields()?;
        for field in &fields {
            let name = field.name.to_shouty_snake_case();
            let (low, high) = word_bit_range(reg, field, self.options.word_bytes())?;
            if high == low {
                self.constant(w, &format!("{name}_IND"), "natural", &low.to_string());
            } else {
                self.constant(w, &format!("{name}_L"), "natural", &low.to_string());
                self.constant(w, &format!("{name}_H"), "natural", &high.to_string());
            }
        }

        for field in &fields {
            let width = field.bit_width()?;
            if !field.enumerated_values.is_empty() {
                w.write_blank_line();
                w.write_comment(&format!("\"{}\" field enumerated values", field.name), None, true, true);
            }
            for value in &field.enumerated_values {
                let (kind, literal) = std_logic_constant(value.require_u64()?, width);
                self.constant(w, &value.name.to_shouty_snake_case(), &kind, &literal);
            }
        }

        let resets: Vec<_> = fields
            .iter()
            .filter_map(|field| field.reset_value().map(|value| (field, value)))
            .collect();
        if !resets.is_empty() {
            w.write_blank_line();
            w.write_comment(&format!("{} register reset values", reg.name.to_uppercase()), None, true, true);
        }
        for (field, value) in resets {
            let (kind, literal) = std_logic_constant(value, field.bit_width()?);
            let name = format!("{}_RSTVAL", field.name.to_shouty_snake_case());
            self.constant(w, &name, &kind, &literal);
        }
        w.write_blank_line();
        Ok(())
    }
}

impl RegisterMapGenerator for VhdlPackageGenerator {
    fn generate(&self, component: &HwComponent) -> Result<String> {
        let map = select_memory_map(component, &self.options)?;
        let mut w = CodeWriter::new(self.options.style.clone().with_comment_char('-'));
        let package = prefixed(&self.options.prefix, &self.options.name).to_snake_case();

        write_preamble(&mut w, self.options.license.as_deref());
        w.write_line("library ieee;");
        w.write_line("use ieee.std_logic_1164.all;");
        w.write_blank_line();
        w.write_line(format!("package {package} is"));
        w.push_deferred("end package;");
        w.write_blank_line();
        w.indent();

        info!("Writing addresses of '{}' register map", map.name);
        self.write_addresses(&mut w, map)?;

        info!("Writing bit fields of '{}' register map", map.name);
        for block in map.address_blocks.iter().filter(|b| !b.is_memory()) {
            w.write_comment(&format!("{} block", block.name), None, false, true);
            w.write_blank_line();
            for reg in block.sorted_registers()? {
                self.write_register(&mut w, reg)?;
            }
        }

        w.dedent();
        w.flush_deferred_all();
        Ok(w.finish())
    }
}
