// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! # VHDL Entity Parser
//!
//! Extracts the generics and ports of the first entity declared in a VHDL
//! source file, for documentation.
//!
//! The parser is a line-driven state machine. It understands entities laid
//! out like this:
//!
//! ```vhdl
//! entity can_top_level is
//!     generic(
//!         -- Number of TXT buffers
//!         txt_buffer_count : natural := 4
//!     );
//!     port(
//!         -- System clock
//!         clk_sys : in std_logic;
//!
//!         ---------------------------------------------------------------
//!         -- Memory interface
//!         ---------------------------------------------------------------
//!         data_in : in std_logic_vector(31 downto 0)
//!     );
//! end entity;
//! ```
//!
//! Comment lines above a declaration become its description. A block of
//! comments enclosed by two rules of four or more dashes is a section, which
//! appears in the output between the declarations around it. Files without
//! an entity give an empty interface.

#![warn(missing_docs)]

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{trace, warn};

/// Errors of the entity parser.
#[derive(Error, Debug)]
pub enum EntityError {
    /// The source file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A line pattern failed to compile.
    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for entity parsing.
pub type Result<T> = std::result::Result<T, EntityError>;

/// State of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParserState {
    /// Looking for `entity <name> is`.
    None,
    /// Inside the entity, outside of generic and port lists.
    Entity,
    /// Inside `generic (`.
    Generics,
    /// Inside `port (`.
    Ports,
    /// Between two section rules.
    Section,
    /// `end entity;` was seen. Nothing more is read.
    Finish,
}

/// A generic declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generic {
    /// Generic name.
    pub name: String,
    /// Type name, without constraints.
    pub kind: String,
    /// Default value, if one is given.
    pub default: Option<String>,
    /// Comment lines written above the declaration.
    pub description: String,
}

/// A port declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// `in`, `out`, `inout` or `buffer`, as written.
    pub direction: String,
    /// Type with its constraint, e.g. `std_logic_vector (7 downto 0)`.
    pub kind: String,
    /// Comment lines written above the declaration.
    pub description: String,
}

/// One row of a generic or port list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum Entry<T> {
    /// A declaration.
    Field(T),
    /// A section divider.
    Section {
        /// Comment text between the two rules.
        description: String,
    },
}

impl<T> Entry<T> {
    /// The declaration, if this is not a section.
    pub fn field(&self) -> Option<&T> {
        match self {
            Entry::Field(field) => Some(field),
            Entry::Section { .. } => None,
        }
    }
}

/// Generics and ports of an entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityInterface {
    /// Generic list.
    pub generics: Vec<Entry<Generic>>,
    /// Port list.
    pub ports: Vec<Entry<Port>>,
}

impl EntityInterface {
    /// Neither generics nor ports were found.
    pub fn is_empty(&self) -> bool {
        self.generics.is_empty() && self.ports.is_empty()
    }
}

/// Parses VHDL source text.
pub fn parse_entity(source: &str) -> Result<EntityInterface> {
    let mut parser = EntityParser::new()?;
    for line in source.lines() {
        parser.feed(line);
        if parser.state() == ParserState::Finish {
            break;
        }
    }
    Ok(parser.finish())
}

/// Reads and parses a VHDL file.
pub fn parse_entity_file(path: impl AsRef<Path>) -> Result<EntityInterface> {
    let source = std::fs::read_to_string(path)?;
    parse_entity(&source)
}

/// A trimmed source line, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    EntityStart,
    GenericStart,
    PortStart,
    EntityEnd,
    SectionRule,
    Comment(&'a str),
    ListEnd,
    Code(&'a str),
}

struct Patterns {
    entity: Regex,
    generic: Regex,
    port: Regex,
    end_entity: Regex,
    section: Regex,
    comment: Regex,
    list_end: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            entity: Regex::new(r"(?i)^entity\s+\w+\s+is$")?,
            generic: Regex::new(r"(?i)^generic\s*\(\s*$")?,
            port: Regex::new(r"(?i)^port\s*\(\s*$")?,
            end_entity: Regex::new(r"(?i)^end\s+entity(\s+\w+)?\s*;$")?,
            section: Regex::new(r"^-{4,}")?,
            comment: Regex::new(r"^--")?,
            list_end: Regex::new(r"^\)\s*;$")?,
        })
    }

    fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if self.entity.is_match(line) {
            Line::EntityStart
        } else if self.generic.is_match(line) {
            Line::GenericStart
        } else if self.port.is_match(line) {
            Line::PortStart
        } else if self.end_entity.is_match(line) {
            Line::EntityEnd
        } else if self.section.is_match(line) {
            Line::SectionRule
        } else if self.comment.is_match(line) {
            Line::Comment(line.trim_matches('-').trim())
        } else if self.list_end.is_match(line) {
            Line::ListEnd
        } else {
            Line::Code(line)
        }
    }
}

/// What a line contributes to the output.
#[derive(Debug, PartialEq, Eq)]
enum Event {
    Nothing,
    Comment(String),
    SectionStart,
    SectionEnd,
    Generic(Generic),
    Port(Port),
    Malformed,
}

/// Next state and event for `line` read in `state`. `last` is the state
/// the parser was in before the current one.
fn transition(state: ParserState, last: ParserState, line: Line<'_>) -> (ParserState, Event) {
    use ParserState as S;

    match (state, line) {
        (S::None, Line::EntityStart) => (S::Entity, Event::Nothing),
        (S::None, _) => (S::None, Event::Nothing),

        (S::Entity, Line::GenericStart) => (S::Generics, Event::Nothing),
        (S::Entity, Line::PortStart) => (S::Ports, Event::Nothing),
        (S::Entity, Line::EntityEnd) => (S::Finish, Event::Nothing),
        (S::Entity, _) => (S::Entity, Event::Nothing),

        (S::Generics | S::Ports, Line::SectionRule) => (S::Section, Event::SectionStart),
        (S::Generics | S::Ports, Line::Comment(text)) => (state, Event::Comment(text.to_string())),
        (S::Generics | S::Ports, Line::ListEnd) => (S::Entity, Event::Nothing),
        (S::Generics, Line::Code(code)) => match parse_generic(code) {
            Some(generic) => (state, Event::Generic(generic)),
            None => (state, Event::Nothing),
        },
        (S::Ports, Line::Code(code)) => match parse_port(code) {
            Some(port) => (state, Event::Port(port)),
            None => (state, Event::Nothing),
        },
        (S::Generics | S::Ports, _) => (state, Event::Nothing),

        (S::Section, Line::SectionRule) => (last, Event::SectionEnd),
        (S::Section, Line::Comment(text)) => (state, Event::Comment(text.to_string())),
        (S::Section, _) => (state, Event::Malformed),

        (S::Finish, _) => (S::Finish, Event::Nothing),
    }
}

fn strip_inline_comment(code: &str) -> &str {
    code.split_once("--").map_or(code, |(code, _)| code).trim()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> &'a str {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((first, rest)) if first.eq_ignore_ascii_case(keyword) => rest.trim(),
        _ => text,
    }
}

/// `[constant] name : type [:= default];`
fn parse_generic(code: &str) -> Option<Generic> {
    let code = strip_inline_comment(code);
    let mut parts = code.split(':');
    let name = strip_keyword(parts.next()?, "constant");
    let kind = parts
        .next()?
        .trim()
        .split(&['(', ':', ';'][..])
        .next()
        .unwrap_or_default()
        .trim();
    let default = parts
        .next()
        .map(|rest| {
            rest.chars()
                .filter(|c| !matches!(c, ' ' | '\t' | '=' | ';'))
                .collect::<String>()
        })
        .filter(|default| !default.is_empty());

    Some(Generic {
        name: name.to_string(),
        kind: kind.to_string(),
        default,
        description: String::new(),
    })
}

/// `[signal] name : direction type;`
fn parse_port(code: &str) -> Option<Port> {
    let code = strip_inline_comment(code);
    let (left, right) = code.split_once(':')?;
    let name = strip_keyword(left, "signal");
    let right = right.trim();
    let (direction, kind) = right
        .split_once(char::is_whitespace)
        .unwrap_or((right, ""));
    let kind = kind.trim().trim_end_matches(';').trim().replace('(', " (");

    Some(Port {
        name: name.to_string(),
        direction: direction.to_string(),
        kind: kind.split_whitespace().collect::<Vec<_>>().join(" "),
        description: String::new(),
    })
}

/// Incremental entity parser, fed one line at a time.
pub struct EntityParser {
    patterns: Patterns,
    state: ParserState,
    last: ParserState,
    comment: String,
    interface: EntityInterface,
}

impl EntityParser {
    /// Creates a parser looking for an entity.
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: Patterns::compile()?,
            state: ParserState::None,
            last: ParserState::None,
            comment: String::new(),
            interface: EntityInterface::default(),
        })
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Processes one source line.
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.state == ParserState::Finish {
            return;
        }

        let (next, event) = transition(self.state, self.last, self.patterns.classify(line));
        self.apply(event, line);

        if next != self.state {
            trace!("Moving from {:?} to {:?}", self.state, next);
            self.last = self.state;
            self.state = next;
        }
    }

    /// Returns everything parsed so far.
    pub fn finish(self) -> EntityInterface {
        self.interface
    }

    fn take_comment(&mut self) -> String {
        std::mem::take(&mut self.comment)
    }

    fn apply(&mut self, event: Event, line: &str) {
        match event {
            Event::Nothing => {}
            Event::Comment(text) => {
                if text.is_empty() {
                    return;
                }
                if !self.comment.is_empty() {
                    self.comment.push(' ');
                }
                self.comment.push_str(&text);
            }
            Event::SectionStart => self.comment.clear(),
            Event::SectionEnd => {
                let description = self.take_comment();
                match self.last {
                    ParserState::Generics => {
                        self.interface.generics.push(Entry::Section { description })
                    }
                    ParserState::Ports => self.interface.ports.push(Entry::Section { description }),
                    other => warn!("Section ended in unexpected state {:?}", other),
                }
            }
            Event::Generic(mut generic) => {
                generic.description = self.take_comment();
                trace!("Adding generic {}", generic.name);
                self.interface.generics.push(Entry::Field(generic));
            }
            Event::Port(mut port) => {
                port.description = self.take_comment();
                trace!("Adding port {}", port.name);
                self.interface.ports.push(Entry::Field(port));
            }
            Event::Malformed => {
                warn!("Non-comment VHDL code in comment section, skipping: {}", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, direction: &str, kind: &str, description: &str) -> Entry<Port> {
        Entry::Field(Port {
            name: name.into(),
            direction: direction.into(),
            kind: kind.into(),
            description: description.into(),
        })
    }

    #[test]
    fn test_section_between_ports() {
        let source = "\
entity demo is
    port(
        a : in std_logic;
        ------------------------------------
        -- Group A
        ------------------------------------
        b : out std_logic
    );
end entity;
";
        let interface = parse_entity(source).unwrap();
        assert_eq!(
            interface.ports,
            vec![
                port("a", "in", "std_logic", ""),
                Entry::Section {
                    description: "Group A".into()
                },
                port("b", "out", "std_logic", ""),
            ]
        );
        assert!(interface.generics.is_empty());
    }

    #[test]
    fn test_no_entity_gives_empty_interface() {
        let source = "\
library ieee;
use ieee.std_logic_1164.all;

package demo_pkg is
    constant WIDTH : natural := 8;
end package;
";
        let interface = parse_entity(source).unwrap();
        assert!(interface.is_empty());
    }

    #[test]
    fn test_generics_with_defaults_and_comments() {
        let source = "\
entity fifo is
  generic (
    -- Depth of the FIFO
    -- in words
    constant DEPTH : natural := 16;
    G_WIDTH : std_logic_vector(7 downto 0);
    G_RESET : boolean:=true
  );
end entity fifo;
";
        let interface = parse_entity(source).unwrap();
        let generics: Vec<&Generic> = interface.generics.iter().filter_map(Entry::field).collect();
        assert_eq!(generics.len(), 3);

        assert_eq!(generics[0].name, "DEPTH");
        assert_eq!(generics[0].kind, "natural");
        assert_eq!(generics[0].default.as_deref(), Some("16"));
        assert_eq!(generics[0].description, "Depth of the FIFO in words");

        assert_eq!(generics[1].kind, "std_logic_vector");
        assert_eq!(generics[1].default, None);
        assert_eq!(generics[1].description, "");

        assert_eq!(generics[2].name, "G_RESET");
        assert_eq!(generics[2].default.as_deref(), Some("true"));
    }

    #[test]
    fn test_port_type_and_signal_keyword() {
        let source = "\
ENTITY regs IS
  PORT (
    -- Data bus
    signal data_in : IN std_logic_vector(31 downto 0); -- trailing note
    irq : out std_logic
  );
END ENTITY;
";
        let interface = parse_entity(source).unwrap();
        assert_eq!(
            interface.ports[0],
            port("data_in", "IN", "std_logic_vector (31 downto 0)", "Data bus")
        );
        assert_eq!(interface.ports[1], port("irq", "out", "std_logic", ""));
    }

    #[test]
    fn test_malformed_section_line_is_skipped() {
        let source = "\
entity demo is
  port (
    ----------------
    -- Clocks
    clk : in std_logic;
    ----------------
    rst : in std_logic
  );
end entity;
";
        let interface = parse_entity(source).unwrap();
        assert_eq!(
            interface.ports,
            vec![
                Entry::Section {
                    description: "Clocks".into()
                },
                port("rst", "in", "std_logic", ""),
            ]
        );
    }

    #[test]
    fn test_parsing_stops_at_end_of_entity() {
        let mut parser = EntityParser::new().unwrap();
        for line in ["entity a is", "port (", "x : in bit", ");", "end entity;"] {
            parser.feed(line);
        }
        assert_eq!(parser.state(), ParserState::Finish);

        parser.feed("entity b is");
        assert_eq!(parser.state(), ParserState::Finish);
        assert_eq!(parser.finish().ports.len(), 1);
    }

    #[test]
    fn test_transition_table() {
        use ParserState as S;
        assert_eq!(
            transition(S::None, S::None, Line::EntityStart),
            (S::Entity, Event::Nothing)
        );
        assert_eq!(
            transition(S::Ports, S::Entity, Line::SectionRule),
            (S::Section, Event::SectionStart)
        );
        assert_eq!(
            transition(S::Section, S::Generics, Line::SectionRule),
            (S::Generics, Event::SectionEnd)
        );
        assert_eq!(
            transition(S::Section, S::Ports, Line::Code("x : in bit")),
            (S::Section, Event::Malformed)
        );
        assert_eq!(
            transition(S::Generics, S::Entity, Line::ListEnd),
            (S::Entity, Event::Nothing)
        );
    }

    #[test]
    fn test_serialized_entry_shape() {
        let entry: Entry<Port> = Entry::Section {
            description: "Bus".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["entry_type"], "section");
        assert_eq!(json["description"], "Bus");
    }
}
