// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! LaTeX documentation of a register map.
//!
//! For one memory map the output holds a table of address block offsets and,
//! per address block, a table showing which register occupies which byte of
//! each access word. Register blocks then get a subsection per register with
//! its type, address and size, one bit table per byte and the field
//! descriptions with their enumerated values.
//!
//! The output needs the `colortbl` and `xcolor` packages.

use crate::latex_escape as escape;
use crate::writer::CodeWriter;
use crate::{select_memory_map, write_preamble, GeneratorOptions, RegisterMapGenerator};
use anyhow::Result;
use regmap_ir::{
    AddressBlock, HwComponent, MemoryMap, NamedObject, Object, Register, RegisterField,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// What goes into the document.
#[derive(Debug, Clone)]
pub struct DocOptions {
    /// Table of address block offsets.
    pub regions: bool,
    /// Bit tables and field descriptions of every register.
    pub fields: bool,
    /// Parameter values deciding which conditional registers exist, keyed by
    /// parameter name. With `None`, every register is documented and the
    /// conditional ones carry a note naming their parameter.
    pub presence: Option<BTreeMap<String, bool>>,
}

impl Default for DocOptions {
    fn default() -> Self {
        Self {
            regions: true,
            fields: true,
            presence: None,
        }
    }
}

/// Writes LaTeX register documentation for one memory map.
pub struct RegisterDocGenerator {
    options: GeneratorOptions,
    doc: DocOptions,
}

/// Whether a register exists in the documented configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence<'a> {
    Always,
    Never,
    /// Present when the named parameter is true.
    When(&'a str),
}

impl RegisterDocGenerator {
    /// Creates a generator writing with `options`.
    pub fn new(options: GeneratorOptions, doc: DocOptions) -> Self {
        Self { options, doc }
    }

    fn presence<'a>(&self, component: &'a HwComponent, reg: &Register) -> Presence<'a> {
        let Some(value) = reg.is_present.as_ref() else {
            return Presence::Always;
        };
        let parameter = value
            .reference_object
            .and_then(|id| component.parameters.iter().find(|p| p.iir_id() == id));
        let enabled = match (parameter, &self.doc.presence) {
            (Some(param), None) => return Presence::When(&param.name),
            (Some(param), Some(values)) => values
                .get(&param.name)
                .or_else(|| values.get(&param.parameter_id))
                .copied()
                .or_else(|| value.as_bool()),
            (None, _) => value.as_bool(),
        };
        match enabled {
            Some(false) => Presence::Never,
            _ => Presence::Always,
        }
    }

    fn write_regions(&self, w: &mut CodeWriter, map: &MemoryMap) -> Result<()> {
        w.write_comment("Memory regions", None, true, true);
        let mut table = w.scope("\\begin{tabular}{|p{5cm}|p{4cm}|}", "\\end{tabular}");
        table.write_line("\\hline");
        table.write_line("\\textbf{Memory region} & \\textbf{Address offset} \\\\");
        table.write_line("\\hline");
        for block in &map.address_blocks {
            table.write_line(format!(
                "{} & 0x{:03X} \\\\",
                escape(title(block)),
                block.base_address_value()?
            ));
            table.write_line("\\hline");
        }
        table.close();
        w.write_blank_line();
        Ok(())
    }

    /// One row per access word, one column per byte, highest byte first.
    fn write_word_table(
        &self,
        w: &mut CodeWriter,
        block: &AddressBlock,
        registers: &[(&Register, Presence<'_>)],
    ) -> Result<()> {
        let word_bytes = self.options.word_bytes();
        let mut words: BTreeMap<u64, (u64, Vec<Option<&str>>)> = BTreeMap::new();
        for (reg, _) in registers {
            let offset = reg.offset_bytes()?;
            let address = block.register_address(reg)?;
            let size = reg.size_bits()?.div_ceil(8).max(1);
            let first = offset % word_bytes;
            let (_, cells) = words
                .entry(offset / word_bytes)
                .or_insert_with(|| (address - first, vec![None; word_bytes as usize]));
            // Bytes past the end of the word are not shown.
            for byte in first..first.saturating_add(size).min(word_bytes) {
                cells[byte as usize] = Some(reg.name.as_str());
            }
        }

        let columns = "c|".repeat(word_bytes as usize + 1);
        let mut table = w.scope(format!("\\begin{{tabular}}{{|{columns}}}"), "\\end{tabular}");
        table.write_line("\\hline");
        let mut header: Vec<String> = (0..word_bytes)
            .rev()
            .map(|byte| format!("\\textbf{{Bits [{}:{}]}}", byte * 8 + 7, byte * 8))
            .collect();
        header.push("\\textbf{Address offset}".to_string());
        table.write_line(format!("{} \\\\", header.join(" & ")));
        table.write_line("\\hline");

        let mut next_word = 0;
        for (word, (address, cells)) in &words {
            if *word > next_word {
                table.write_line(format!(
                    "\\multicolumn{{{word_bytes}}}{{|c|}}{{Reserved}} & \\dots \\\\"
                ));
                table.write_line("\\hline");
            }
            let cells: Vec<String> = cells
                .iter()
                .rev()
                .map(|cell| cell.map(escape).unwrap_or_default())
                .collect();
            let mut row = merge_cells(&cells);
            row.push(format!("0x{address:03X}"));
            table.write_line(format!("{} \\\\", row.join(" & ")));
            table.write_line("\\hline");
            next_word = word + 1;
        }
        table.close();
        w.write_blank_line();
        Ok(())
    }

    fn write_register(
        &self,
        w: &mut CodeWriter,
        block: &AddressBlock,
        reg: &Register,
        presence: Presence<'_>,
    ) -> Result<()> {
        let size_bytes = reg.size_bits()?.div_ceil(8).max(1);
        w.write_line(format!("\\subsection{{{}}}\\label{{{}}}", escape(&reg.name), reg.name));
        let mut items = w.scope("\\begin{description}", "\\end{description}");
        items.write_line(format!("\\item[Type:] {}", register_access(reg)));
        items.write_line(format!("\\item[Address:] 0x{:X}", block.register_address(reg)?));
        items.write_line(format!(
            "\\item[Size:] {size_bytes} byte{}",
            if size_bytes == 1 { "" } else { "s" }
        ));
        if let Presence::When(param) = presence {
            items.write_line(format!(
                "\\item[Note:] Register is present only when {} = true. \
                 Otherwise this address is reserved.",
                escape(param)
            ));
        }
        items.close();
        if let Some(description) = reg.description.as_deref() {
            w.write_line(escape(description));
        }
        w.write_blank_line();

        if self.doc.fields {
            self.write_bit_tables(w, reg)?;
            self.write_field_descriptions(w, reg)?;
        }
        Ok(())
    }

    /// One table per register byte, highest byte first.
    fn write_bit_tables(&self, w: &mut CodeWriter, reg: &Register) -> Result<()> {
        let size = reg.size_bits()?;
        let mut fields = Vec::new();
        for field in reg.sorted_fields()? {
            let low = field.bit_offset()?;
            let high = low.saturating_add(field.bit_width()?.saturating_sub(1));
            fields.push((low, high, field));
        }

        for byte in (0..size.div_ceil(8)).rev() {
            let byte_low = byte * 8;
            let byte_high = (byte_low + 7).min(size.saturating_sub(1));
            let bits: Vec<u64> = (byte_low..=byte_high).rev().collect();

            let mut names = Vec::with_capacity(bits.len());
            let mut resets = Vec::with_capacity(bits.len());
            for &bit in &bits {
                match fields.iter().find(|(low, high, _)| (*low..=*high).contains(&bit)) {
                    Some(&(low, high, field)) => {
                        names.push(bit_field_name(field, low, high, byte_low, byte_high));
                        resets.push(reset_bit(field, bit - low));
                    }
                    None => {
                        names.push("Reserved".to_string());
                        resets.push("-".to_string());
                    }
                }
            }

            let columns = "c|".repeat(bits.len());
            let mut table = w.scope(
                format!("\\begin{{tabular}}{{|p{{2cm}}|{columns}}}"),
                "\\end{tabular}",
            );
            table.write_line("\\hline");
            let index: Vec<String> = bits
                .iter()
                .map(|bit| format!("\\cellcolor{{gray!25}}{bit}"))
                .collect();
            table.write_line(format!(
                "\\cellcolor{{gray!25}}Bit index & {} \\\\",
                index.join(" & ")
            ));
            table.write_line("\\hline");
            table.write_line(format!("Field name & {} \\\\", merge_cells(&names).join(" & ")));
            table.write_line("\\hline");
            table.write_line(format!("Reset value & {} \\\\", resets.join(" & ")));
            table.write_line("\\hline");
            table.close();
            w.write_blank_line();
        }
        Ok(())
    }

    fn write_field_descriptions(&self, w: &mut CodeWriter, reg: &Register) -> Result<()> {
        let fields: Vec<&RegisterField> = reg
            .sorted_fields()?
            .into_iter()
            .filter(|field| !field.is_reserved())
            .collect();
        if fields.is_empty() {
            return Ok(());
        }

        let mut items = w.scope("\\begin{description}", "\\end{description}");
        for field in fields {
            let description = field.description.as_deref().map(escape).unwrap_or_default();
            items.write_line(format!("\\item[{}] {}", escape(&field.name), description).trim_end());

            let width = field.bit_width()?.clamp(1, 64) as usize;
            let mut values = field
                .enumerated_values
                .iter()
                .map(|e| Ok((e.require_u64()?, e)))
                .collect::<regmap_ir::Result<Vec<_>>>()?;
            values.sort_by_key(|(value, _)| *value);
            for (value, e) in values {
                let mut line = format!("\\newline 0b{value:0width$b} - {}", escape(&e.name));
                if let Some(description) = e.description.as_deref() {
                    line.push_str(&format!(" - {}", escape(description)));
                }
                items.write_line(line);
            }
        }
        items.close();
        w.write_blank_line();
        Ok(())
    }
}

impl RegisterMapGenerator for RegisterDocGenerator {
    fn generate(&self, component: &HwComponent) -> Result<String> {
        let map = select_memory_map(component, &self.options)?;
        info!("Documenting memory map {}", map.name);

        let mut w = CodeWriter::new(self.options.style.clone().with_comment_char('%'));
        write_preamble(&mut w, self.options.license.as_deref());
        w.write_line(format!("\\chapter{{{}}}\\label{{{}}}", escape(title(map)), map.name));
        if let Some(description) = map.description.as_deref() {
            w.write_line(escape(description));
        }
        w.write_blank_line();

        if self.doc.regions {
            self.write_regions(&mut w, map)?;
        }

        for block in &map.address_blocks {
            let mut registers = Vec::new();
            for reg in block.sorted_registers()? {
                match self.presence(component, reg) {
                    Presence::Never => debug!("Skipping register {} not present", reg.name),
                    presence => registers.push((reg, presence)),
                }
            }

            w.write_line(format!("\\section{{{}}}\\label{{{}}}", escape(title(block)), block.name));
            if let Some(description) = block.description.as_deref() {
                w.write_line(escape(description));
            }
            w.write_blank_line();
            self.write_word_table(&mut w, block, &registers)?;

            if block.is_memory() {
                continue;
            }
            for (reg, presence) in registers {
                self.write_register(&mut w, block, reg, presence)?;
            }
        }
        Ok(w.finish())
    }
}

fn title<T: NamedObject>(node: &T) -> &str {
    node.display_name().unwrap_or(node.name())
}

/// Register access, or the access its fields share.
fn register_access(reg: &Register) -> &'static str {
    if let Some(access) = reg.access.as_ipxact() {
        return access;
    }
    let accesses: BTreeSet<&'static str> = reg
        .fields
        .iter()
        .filter_map(|field| field.access.as_ipxact())
        .collect();
    match accesses.len() {
        0 => "-",
        1 => accesses.into_iter().next().unwrap_or("-"),
        _ => "mixed",
    }
}

/// Field name as shown in a byte of the bit table, with the bit range of the
/// field inside the byte when the field spans several bytes.
fn bit_field_name(
    field: &RegisterField,
    low: u64,
    high: u64,
    byte_low: u64,
    byte_high: u64,
) -> String {
    let name = if field.is_reserved() {
        "Reserved".to_string()
    } else {
        escape(&field.name)
    };
    if low >= byte_low && high <= byte_high {
        return name;
    }
    let from = low.max(byte_low) - low;
    let to = high.min(byte_high) - low;
    if from == to {
        format!("{name}[{to}]")
    } else {
        format!("{name}[{to}:{from}]")
    }
}

fn reset_bit(field: &RegisterField, bit: u64) -> String {
    match field.reset_value() {
        Some(reset) => {
            let shift = u32::try_from(bit).unwrap_or(u32::MAX);
            reset.checked_shr(shift).map_or(0, |v| v & 1).to_string()
        }
        None => "X".to_string(),
    }
}

/// Joins runs of equal non-empty cells into `\multicolumn` cells.
fn merge_cells(cells: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < cells.len() {
        let run = cells[i..]
            .iter()
            .take_while(|cell| **cell == cells[i])
            .count();
        if run > 1 && !cells[i].is_empty() {
            let border = if i == 0 { "|c|" } else { "c|" };
            out.push(format!("\\multicolumn{{{run}}}{{{border}}}{{{}}}", cells[i]));
            i += run;
        } else {
            out.push(cells[i].clone());
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_ingestor::parse_component;

    const COMPONENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
  <ipxact:vendor>example.org</ipxact:vendor>
  <ipxact:library>demo</ipxact:library>
  <ipxact:name>UART</ipxact:name>
  <ipxact:version>1.0</ipxact:version>
  <ipxact:parameters>
    <ipxact:parameter parameterId="id_has_fifo" parameterType="bit">
      <ipxact:name>HAS_FIFO</ipxact:name>
      <ipxact:value>1</ipxact:value>
    </ipxact:parameter>
  </ipxact:parameters>
  <ipxact:memoryMaps>
    <ipxact:memoryMap>
      <ipxact:name>Registers</ipxact:name>
      <ipxact:description>UART registers</ipxact:description>
      <ipxact:addressBlock>
        <ipxact:name>Control</ipxact:name>
        <ipxact:baseAddress>0x40</ipxact:baseAddress>
        <ipxact:range>0x10</ipxact:range>
        <ipxact:width>32</ipxact:width>
        <ipxact:register>
          <ipxact:name>CTRL</ipxact:name>
          <ipxact:description>Control register.</ipxact:description>
          <ipxact:addressOffset>0x0</ipxact:addressOffset>
          <ipxact:size>16</ipxact:size>
          <ipxact:access>read-write</ipxact:access>
          <ipxact:field>
            <ipxact:name>EN</ipxact:name>
            <ipxact:description>Enable.</ipxact:description>
            <ipxact:bitOffset>0</ipxact:bitOffset>
            <ipxact:bitWidth>1</ipxact:bitWidth>
            <ipxact:resets>
              <ipxact:reset><ipxact:value>1</ipxact:value></ipxact:reset>
            </ipxact:resets>
          </ipxact:field>
          <ipxact:field>
            <ipxact:name>BAUD</ipxact:name>
            <ipxact:bitOffset>4</ipxact:bitOffset>
            <ipxact:bitWidth>8</ipxact:bitWidth>
            <ipxact:resets>
              <ipxact:reset><ipxact:value>0x5A</ipxact:value></ipxact:reset>
            </ipxact:resets>
            <ipxact:enumeratedValues>
              <ipxact:enumeratedValue>
                <ipxact:name>B115200</ipxact:name>
                <ipxact:value>2</ipxact:value>
              </ipxact:enumeratedValue>
              <ipxact:enumeratedValue>
                <ipxact:name>B9600</ipxact:name>
                <ipxact:description>Slow</ipxact:description>
                <ipxact:value>1</ipxact:value>
              </ipxact:enumeratedValue>
            </ipxact:enumeratedValues>
          </ipxact:field>
        </ipxact:register>
        <ipxact:register>
          <ipxact:name>FIFO_LEVEL</ipxact:name>
          <ipxact:isPresent>id_has_fifo</ipxact:isPresent>
          <ipxact:addressOffset>0x2</ipxact:addressOffset>
          <ipxact:size>8</ipxact:size>
          <ipxact:access>read-only</ipxact:access>
          <ipxact:field>
            <ipxact:name>LEVEL</ipxact:name>
            <ipxact:bitOffset>0</ipxact:bitOffset>
            <ipxact:bitWidth>8</ipxact:bitWidth>
          </ipxact:field>
        </ipxact:register>
        <ipxact:register>
          <ipxact:name>DATA</ipxact:name>
          <ipxact:addressOffset>0x8</ipxact:addressOffset>
          <ipxact:size>32</ipxact:size>
          <ipxact:field>
            <ipxact:name>DATA</ipxact:name>
            <ipxact:bitOffset>0</ipxact:bitOffset>
            <ipxact:bitWidth>32</ipxact:bitWidth>
            <ipxact:access>read-write</ipxact:access>
          </ipxact:field>
        </ipxact:register>
      </ipxact:addressBlock>
    </ipxact:memoryMap>
  </ipxact:memoryMaps>
</ipxact:component>"#;

    fn generate(doc: DocOptions) -> String {
        let component = parse_component(COMPONENT).unwrap();
        RegisterDocGenerator::new(GeneratorOptions::new("uart"), doc)
            .generate(&component)
            .unwrap()
    }

    #[test]
    fn test_regions_and_word_table() {
        let result = generate(DocOptions::default());
        assert!(result.starts_with("%% This file is autogenerated, DO NOT EDIT!\n"));
        assert!(result.contains("\\chapter{Registers}\\label{Registers}\nUART registers\n"));
        assert!(result.contains("%% Memory regions\n\\begin{tabular}{|p{5cm}|p{4cm}|}"));
        assert!(result.contains("  Control & 0x040 \\\\"));
        assert!(result.contains(
            "  \\textbf{Bits [31:24]} & \\textbf{Bits [23:16]} & \\textbf{Bits [15:8]} & \\textbf{Bits [7:0]} & \\textbf{Address offset} \\\\"
        ));
        assert!(result.contains("  & FIFO\\_LEVEL & \\multicolumn{2}{c|}{CTRL} & 0x040 \\\\"));
        // Word 1 holds no register.
        assert!(result.contains("  \\multicolumn{4}{|c|}{Reserved} & \\dots \\\\"));
        assert!(result.contains("  \\multicolumn{4}{|c|}{DATA} & 0x048 \\\\"));
    }

    #[test]
    fn test_register_header_and_bit_tables() {
        let result = generate(DocOptions::default());
        assert!(result.contains(
            "\\subsection{CTRL}\\label{CTRL}\n\\begin{description}\n  \\item[Type:] read-write\n  \\item[Address:] 0x40\n  \\item[Size:] 2 bytes\n\\end{description}\nControl register.\n"
        ));
        // High byte first, BAUD split across both bytes.
        let high = result.find("\\cellcolor{gray!25}15 &").unwrap();
        let low = result.find("\\cellcolor{gray!25}7 &").unwrap();
        assert!(high < low);
        assert!(result.contains(
            "  Field name & \\multicolumn{4}{|c|}{Reserved} & \\multicolumn{4}{c|}{BAUD[7:4]} \\\\"
        ));
        assert!(result.contains("  Reset value & - & - & - & - & 0 & 1 & 0 & 1 \\\\"));
        assert!(result.contains(
            "  Field name & \\multicolumn{4}{|c|}{BAUD[3:0]} & \\multicolumn{3}{c|}{Reserved} & EN \\\\"
        ));
        assert!(result.contains("  Reset value & 1 & 0 & 1 & 0 & - & - & - & 1 \\\\"));
        // Field without reset.
        assert!(result.contains("  Reset value & X & X & X & X & X & X & X & X \\\\"));
    }

    #[test]
    fn test_field_descriptions_with_enums() {
        let result = generate(DocOptions::default());
        assert!(result.contains(
            "  \\item[EN] Enable.\n  \\item[BAUD]\n  \\newline 0b00000001 - B9600 - Slow\n  \\newline 0b00000010 - B115200\n"
        ));
        assert!(result.contains("  \\item[Type:] read-write\n  \\item[Address:] 0x48\n"));
    }

    #[test]
    fn test_conditional_register_note() {
        let result = generate(DocOptions::default());
        assert!(result.contains(
            "  \\item[Note:] Register is present only when HAS\\_FIFO = true. Otherwise this address is reserved."
        ));
    }

    #[test]
    fn test_conditional_register_skipped() {
        let doc = DocOptions {
            presence: Some(BTreeMap::from([("HAS_FIFO".to_string(), false)])),
            ..Default::default()
        };
        let result = generate(doc);
        assert!(!result.contains("FIFO\\_LEVEL"));
        assert!(!result.contains("\\item[Note:]"));
        assert!(result.contains("  &  & \\multicolumn{2}{c|}{CTRL} & 0x040 \\\\"));

        // A parameter missing from the map falls back to its own value.
        let doc = DocOptions {
            presence: Some(BTreeMap::new()),
            ..Default::default()
        };
        let result = generate(doc);
        assert!(result.contains("\\subsection{FIFO\\_LEVEL}"));
        assert!(!result.contains("\\item[Note:]"));
    }

    #[test]
    fn test_regions_and_fields_disabled() {
        let doc = DocOptions {
            regions: false,
            fields: false,
            presence: None,
        };
        let result = generate(doc);
        assert!(!result.contains("Memory region"));
        assert!(!result.contains("Bit index"));
        assert!(!result.contains("\\item[EN]"));
        assert!(result.contains("\\subsection{CTRL}"));
    }

    #[test]
    fn test_merge_cells() {
        let cells: Vec<String> = ["A", "A", "", "", "B"].iter().map(|c| c.to_string()).collect();
        assert_eq!(merge_cells(&cells), ["\\multicolumn{2}{|c|}{A}", "", "", "B"]);
    }
}
