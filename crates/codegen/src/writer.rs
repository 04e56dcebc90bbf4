// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Line-oriented text accumulation shared by every backend.
//!
//! [`CodeWriter`] keeps the current indentation, a FIFO of deferred closing
//! lines and the comment style of the target language. Backends only ever
//! append lines; the accumulated text is taken with [`CodeWriter::finish`].

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

/// Columns a comment keeps for marker and text, however deep the indent.
const MIN_COMMENT_WIDTH: usize = 24;

/// Formatting options of a [`CodeWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Indentation step, in characters.
    pub indent: usize,
    /// Indent with spaces, otherwise with tabs.
    pub use_spaces: bool,
    /// Comment character, doubled to start a comment line (`//`, `--`, `%%`).
    pub comment_char: char,
    /// Width that wrapped comments and rule lines stay within.
    pub max_line_length: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            indent: 2,
            use_spaces: true,
            comment_char: '/',
            max_line_length: 80,
        }
    }
}

impl Style {
    /// Same style with another comment character.
    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }
}

/// Stateful text builder.
#[derive(Debug, Default)]
pub struct CodeWriter {
    style: Style,
    lines: Vec<String>,
    indent: usize,
    deferred: VecDeque<String>,
}

impl CodeWriter {
    /// Empty writer using `style`.
    pub fn new(style: Style) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Formatting options.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Current indentation in characters.
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Lines written so far, without indentation changes applied later.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Appends `text` prefixed with the current indentation.
    pub fn write_line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let pad = if self.style.use_spaces { " " } else { "\t" };
        self.lines.push(format!("{}{}", pad.repeat(self.indent), text));
    }

    /// Appends an empty line.
    pub fn write_blank_line(&mut self) {
        self.lines.push(String::new());
    }

    /// Queues a closing line to be written by [`flush_deferred`](Self::flush_deferred).
    pub fn push_deferred(&mut self, text: impl Into<String>) {
        self.deferred.push_back(text.into());
    }

    /// Writes up to `count` deferred lines, oldest first.
    pub fn flush_deferred(&mut self, count: usize) {
        for _ in 0..count {
            match self.deferred.pop_front() {
                Some(line) => self.write_line(line),
                None => break,
            }
        }
    }

    /// Writes every deferred line, oldest first.
    pub fn flush_deferred_all(&mut self) {
        self.flush_deferred(self.deferred.len());
    }

    /// Number of deferred lines not yet written.
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Indents by `by` characters.
    pub fn increase_indent(&mut self, by: usize) {
        self.indent += by;
    }

    /// Dedents by `by` characters, never below zero.
    pub fn decrease_indent(&mut self, by: usize) {
        self.indent = self.indent.saturating_sub(by);
    }

    /// One indentation step in.
    pub fn indent(&mut self) {
        self.increase_indent(self.style.indent);
    }

    /// One indentation step out.
    pub fn dedent(&mut self) {
        self.decrease_indent(self.style.indent);
    }

    /// Writes a comment block.
    ///
    /// Unless `small`, the block is framed by rule lines of the comment
    /// character reaching the maximum line length. A `caption` goes on its own
    /// line followed by an empty comment line. With `wrap`, the text is broken
    /// greedily at spaces so that no line exceeds the maximum length; a word
    /// longer than the available width is kept whole on its own line.
    ///
    /// When the indentation leaves fewer than 24 columns, the block is
    /// written less indented than the surrounding code.
    pub fn write_comment(&mut self, text: &str, caption: Option<&str>, small: bool, wrap: bool) {
        let marker = self.comment_marker();
        let code_indent = self.indent;
        self.indent = code_indent.min(
            self.style
                .max_line_length
                .saturating_sub(MIN_COMMENT_WIDTH),
        );
        let width = self.style.max_line_length.saturating_sub(self.indent);

        if !small {
            self.write_rule(width);
        }
        if let Some(caption) = caption {
            self.write_line(format!("{marker} {caption}"));
            self.write_line(&marker);
        }
        if wrap {
            for line in wrap_words(text, width.saturating_sub(marker.len() + 1)) {
                self.write_line(format!("{marker} {line}"));
            }
        } else {
            self.write_line(format!("{marker} {text}").trim_end());
        }
        if !small {
            self.write_rule(width);
        }
        self.indent = code_indent;
    }

    /// Writes every line of `text` as a comment line, keeping its layout.
    pub fn write_comment_lines(&mut self, text: &str) {
        let marker = self.comment_marker();
        for line in text.lines() {
            self.write_line(format!("{marker} {line}").trim_end());
        }
    }

    /// Writes `opener`, indents, and returns a guard that dedents and writes
    /// `closer` when dropped.
    pub fn scope(&mut self, opener: impl AsRef<str>, closer: impl Into<String>) -> Scope<'_> {
        self.write_line(opener);
        self.indent();
        Scope {
            writer: self,
            closer: Some(closer.into()),
        }
    }

    /// Accumulated text, one trailing newline per line.
    pub fn finish(self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn comment_marker(&self) -> String {
        self.style.comment_char.to_string().repeat(2)
    }

    fn write_rule(&mut self, width: usize) {
        let rule = self.style.comment_char.to_string().repeat(width);
        self.write_line(rule);
    }
}

/// Open construct of a [`CodeWriter`]; closes it on drop.
pub struct Scope<'a> {
    writer: &'a mut CodeWriter,
    closer: Option<String>,
}

impl Scope<'_> {
    /// Closes the construct now.
    pub fn close(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if let Some(closer) = self.closer.take() {
            self.writer.dedent();
            self.writer.write_line(closer);
        }
    }
}

impl Deref for Scope<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.end();
    }
}

/// Greedy word wrap of `text` into lines of at most `limit` bytes.
///
/// Words are separated by single spaces in the output. Empty lines are never
/// produced.
pub fn wrap_words(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buf = String::new();
    for word in text.split_whitespace() {
        if !buf.is_empty() && buf.len() + 1 + word.len() > limit {
            lines.push(std::mem::take(&mut buf));
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(word);
    }
    if !buf.is_empty() {
        lines.push(buf);
    }
    lines
}
