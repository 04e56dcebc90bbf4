// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_word_width() -> u32 {
    32
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_max_line_length() -> usize {
    80
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[serde(alias = "c", alias = "header")]
    CHeader,
    #[serde(alias = "kernel")]
    KernelHeader,
    #[serde(alias = "vhdl")]
    VhdlPackage,
    #[serde(alias = "doc", alias = "latex")]
    RegisterDoc,
}

/// Target case of the `rename` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    #[serde(alias = "camel")]
    UpperCamel,
    Snake,
}

/// Converts node names before any output is generated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenameConfig {
    pub case: NameCase,
    /// Rewrite mentions of renamed nodes in descriptions too.
    #[serde(default)]
    pub descriptions: bool,
}

/// Content of `register_doc` outputs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    #[serde(default = "default_true")]
    pub regions: bool,
    #[serde(default = "default_true")]
    pub fields: bool,
    /// Parameter values deciding which conditional registers are documented.
    /// When absent, all of them are, with a note naming the parameter.
    #[serde(default)]
    pub presence: Option<BTreeMap<String, bool>>,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            regions: true,
            fields: true,
            presence: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default = "default_true")]
    pub use_spaces: bool,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            use_spaces: true,
            max_line_length: default_max_line_length(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub kind: OutputKind,
    pub path: PathBuf,
    /// Package or header guard name.
    pub name: String,
}

/// One generator run: an input component and the files made from it.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub input: PathBuf,
    /// Memory map to generate, the first one when absent.
    #[serde(default)]
    pub memory_map: Option<String>,
    /// Access word width in bits.
    #[serde(default = "default_word_width")]
    pub word_width: u32,
    #[serde(default)]
    pub prefix: String,
    /// File whose text heads every output as a comment.
    #[serde(default)]
    pub license: Option<PathBuf>,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub rename: Option<RenameConfig>,
    #[serde(default)]
    pub documentation: DocConfig,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

impl GeneratorConfig {
    /// Loads a config file. Relative paths inside it are taken relative to
    /// the directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("Failed to open generator config at {:?}", path))?;
        let mut config: Self =
            serde_yaml::from_reader(f).context("Failed to parse Generator Config YAML")?;
        config.validate()?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        tracing::debug!(
            "Loaded generator config {:?} with {} outputs",
            path,
            config.outputs.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse Generator Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.input.as_os_str().is_empty() {
            anyhow::bail!("Input path cannot be empty");
        }

        if self.word_width == 0 || self.word_width % 8 != 0 {
            anyhow::bail!(
                "Word width must be a non-zero multiple of 8, got {}",
                self.word_width
            );
        }

        if self.style.max_line_length <= 8 {
            anyhow::bail!(
                "Style 'max_line_length' must be greater than 8, got {}",
                self.style.max_line_length
            );
        }

        if let Some(i) = self.outputs.iter().position(|o| o.name.trim().is_empty()) {
            anyhow::bail!("Output #{} has an empty 'name'", i + 1);
        }

        Ok(())
    }

    /// Makes every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.input);
        if let Some(license) = self.license.as_mut() {
            resolve(license);
        }
        for output in &mut self.outputs {
            resolve(&mut output.path);
        }
    }

    /// Text of the license file, if one is configured.
    pub fn license_text(&self) -> Result<Option<String>> {
        self.license
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read license file {:?}", path))
            })
            .transpose()
    }
}
