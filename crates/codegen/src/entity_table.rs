// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! LaTeX tables documenting the generics and ports of a VHDL entity.
//!
//! The output needs the `colortbl` and `xcolor` packages for the grey
//! section rows.

use crate::latex_escape as escape;
use crate::writer::{CodeWriter, Style};
use anyhow::Result;
use tracing::info;
use vhdl_entity::{EntityInterface, Entry};

const COLUMNS: &str = "|p{0.2\\textwidth}|p{0.15\\textwidth}|p{0.2\\textwidth}|p{0.35\\textwidth}|";

/// Writes the generics and ports of an entity as two LaTeX tables.
pub struct EntityTableGenerator {
    style: Style,
}

impl Default for EntityTableGenerator {
    fn default() -> Self {
        Self::new(Style::default())
    }
}

impl EntityTableGenerator {
    /// Creates a generator; the comment character of `style` is replaced by `%`.
    pub fn new(style: Style) -> Self {
        Self {
            style: style.with_comment_char('%'),
        }
    }

    /// Tables for `entity`. A table with no rows is left out.
    pub fn generate(&self, entity: &EntityInterface) -> Result<String> {
        let mut w = CodeWriter::new(self.style.clone());
        w.write_comment("This file is autogenerated, DO NOT EDIT!", None, true, true);
        w.write_blank_line();

        if !entity.generics.is_empty() {
            info!("Writing table of {} generics", entity.generics.len());
            let rows = entity.generics.iter().map(|entry| match entry {
                Entry::Field(g) => Row::Cells([
                    g.name.as_str(),
                    g.kind.as_str(),
                    g.default.as_deref().unwrap_or(""),
                    g.description.as_str(),
                ]),
                Entry::Section { description } => Row::Section(description),
            });
            write_table(&mut w, "Generics", ["Name", "Type", "Default value", "Description"], rows);
        }
        if !entity.ports.is_empty() {
            info!("Writing table of {} ports", entity.ports.len());
            let rows = entity.ports.iter().map(|entry| match entry {
                Entry::Field(p) => Row::Cells([
                    p.name.as_str(),
                    p.direction.as_str(),
                    p.kind.as_str(),
                    p.description.as_str(),
                ]),
                Entry::Section { description } => Row::Section(description),
            });
            write_table(&mut w, "Ports", ["Name", "Direction", "Type", "Description"], rows);
        }
        Ok(w.finish())
    }
}

enum Row<'a> {
    Cells([&'a str; 4]),
    Section(&'a str),
}

fn write_table<'a>(
    w: &mut CodeWriter,
    title: &str,
    header: [&str; 4],
    rows: impl Iterator<Item = Row<'a>>,
) {
    w.write_comment(title, None, true, true);
    let mut table = w.scope(format!("\\begin{{tabular}}{{{COLUMNS}}}"), "\\end{tabular}");
    table.write_line("\\hline");
    let header: Vec<String> = header.iter().map(|h| format!("\\textbf{{{h}}}")).collect();
    table.write_line(format!("{} \\\\", header.join(" & ")));
    table.write_line("\\hline");
    for row in rows {
        match row {
            Row::Cells(cells) => {
                let cells: Vec<String> = cells.iter().map(|c| escape(c)).collect();
                table.write_line(format!("{} \\\\", cells.join(" & ")));
            }
            Row::Section(description) => {
                table.write_line(format!(
                    "\\multicolumn{{4}}{{|l|}}{{\\cellcolor{{gray!25}}\\textbf{{{}}}}} \\\\",
                    escape(description)
                ));
            }
        }
        table.write_line("\\hline");
    }
    table.close();
    w.write_blank_line();
}
