// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Linux kernel style header: field masks as `BIT()` / `GENMASK()` macros.

use crate::c_header::write_address_enum;
use crate::writer::CodeWriter;
use crate::{header_guard, select_memory_map, write_preamble, GeneratorOptions, RegisterMapGenerator};
use anyhow::Result;
use heck::ToShoutySnakeCase;
use regmap_ir::grouping::{group_registers, word_bit_range};
use regmap_ir::{HwComponent, Register};
use tracing::info;

/// Writes a Linux kernel style header for one memory map.
pub struct KernelHeaderGenerator {
    options: GeneratorOptions,
}

impl KernelHeaderGenerator {
    /// Creates a generator writing with `options`.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// All fields of one access word, named after its first register.
    fn write_group(&self, w: &mut CodeWriter, group: &[&Register]) -> Result<()> {
        let Some(first) = group.first() else {
            return Ok(());
        };
        let names: Vec<String> = group.iter().map(|reg| reg.name.to_uppercase()).collect();
        let noun = if group.len() > 1 { "registers" } else { "register" };
        w.write_comment(&format!("{} {noun}", names.join(" ")), None, false, true);

        let base = format!("REG_{}", first.name.to_shouty_snake_case());
        let mut macros = Vec::new();
        for reg in group {
            for field in reg.sorted_fields()? {
                let (low, high) = word_bit_range(reg, field, self.options.word_bytes())?;
                let value = if high == low {
                    format!("BIT({low})")
                } else {
                    format!("GENMASK({high}, {low})")
                };
                macros.push((format!("{base}_{}", field.name.to_shouty_snake_case()), value));
            }
        }
        let pad = macros.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in macros {
            w.write_line(format!("#define {name:<pad$} {value}"));
        }
        w.write_blank_line();
        Ok(())
    }
}

impl RegisterMapGenerator for KernelHeaderGenerator {
    fn generate(&self, component: &HwComponent) -> Result<String> {
        let map = select_memory_map(component, &self.options)?;
        let mut w = CodeWriter::new(self.options.style.clone().with_comment_char('/'));

        write_preamble(&mut w, self.options.license.as_deref());
        let guard = header_guard(&self.options);
        w.write_line(format!("#ifndef {guard}"));
        w.write_line(format!("#define {guard}"));
        w.push_deferred(format!("#endif /* {guard} */"));
        w.write_blank_line();
        w.write_line("#include <linux/bits.h>");
        w.write_blank_line();

        info!("Writing addresses of '{}' register map", map.name);
        write_address_enum(&mut w, map, &self.options.prefix)?;
        w.write_blank_line();

        info!("Writing kernel header of '{}' register map", map.name);
        for block in map.address_blocks.iter().filter(|b| !b.is_memory()) {
            w.write_comment(&format!("{} memory region", block.name), None, false, true);
            w.write_blank_line();
            for group in group_registers(&block.registers, self.options.word_bytes())? {
                self.write_group(&mut w, &group)?;
            }
        }

        w.flush_deferred_all();
        Ok(w.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_ingestor::parse_component;

    const STATUS: &str = r#"
        <component><vendor>v</vendor><library>l</library><name>CAN</name><version>1</version>
          <memoryMaps><memoryMap><name>Regs</name>
            <addressBlock><name>Status</name><baseAddress>0x10</baseAddress>
              <register><name>INT_STAT</name><addressOffset>0x0</addressOffset><size>16</size>
                <field><name>RXI</name><bitOffset>0</bitOffset><bitWidth>1</bitWidth></field>
              </register>
              <register><name>FAULT_STATE</name><addressOffset>0x2</addressOffset><size>16</size>
                <field><name>ERA</name><bitOffset>0</bitOffset><bitWidth>1</bitWidth></field>
                <field><name>REC_VAL</name><bitOffset>4</bitOffset><bitWidth>9</bitWidth></field>
              </register>
              <register><name>TX_COUNTER</name><addressOffset>0x4</addressOffset><size>32</size>
                <field><name>TX_CNT</name><bitOffset>0</bitOffset><bitWidth>32</bitWidth></field>
              </register>
            </addressBlock>
          </memoryMap></memoryMaps>
        </component>"#;

    fn generate() -> String {
        let component = parse_component(STATUS).unwrap();
        let mut options = GeneratorOptions::new("kern_regs");
        options.prefix = "ctucanfd".into();
        KernelHeaderGenerator::new(options).generate(&component).unwrap()
    }

    #[test]
    fn test_bits_and_masks() {
        let result = generate();
        assert!(result.contains("#include <linux/bits.h>"));
        assert!(result.contains("// INT_STAT FAULT_STATE registers"));
        assert!(result.contains("#define REG_INT_STAT_RXI     BIT(0)"));
        assert!(result.contains("#define REG_INT_STAT_ERA     BIT(16)"));
        assert!(result.contains("#define REG_INT_STAT_REC_VAL GENMASK(28, 20)"));
        assert!(result.contains("// TX_COUNTER register\n"));
        assert!(result.contains("#define REG_TX_COUNTER_TX_CNT GENMASK(31, 0)"));
    }

    #[test]
    fn test_guard_and_addresses() {
        let result = generate();
        assert!(result.contains("#ifndef __CTUCANFD_KERN_REGS__"));
        assert!(result.contains("CTUCANFD_FAULT_STATE = 0x0012,"));
        assert!(result.contains("// Status memory region"));
        assert!(result.trim_end().ends_with("#endif /* __CTUCANFD_KERN_REGS__ */"));
    }
}
