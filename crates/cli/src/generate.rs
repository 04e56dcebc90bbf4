// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use regmap_codegen::{
    CHeaderGenerator, DocOptions, GeneratorOptions, KernelHeaderGenerator, RegisterDocGenerator,
    RegisterMapGenerator, Style, VhdlPackageGenerator,
};
use regmap_config::{DocConfig, GeneratorConfig, NameCase, OutputConfig, OutputKind, RenameConfig};
use regmap_ir::rename::{self, RenameOptions};
use regmap_ir::HwComponent;
use std::path::Path;
use tracing::{info, warn};

pub fn generator_for(
    kind: OutputKind,
    options: GeneratorOptions,
    doc: &DocConfig,
) -> Box<dyn RegisterMapGenerator> {
    match kind {
        OutputKind::CHeader => Box::new(CHeaderGenerator::new(options)),
        OutputKind::KernelHeader => Box::new(KernelHeaderGenerator::new(options)),
        OutputKind::VhdlPackage => Box::new(VhdlPackageGenerator::new(options)),
        OutputKind::RegisterDoc => Box::new(RegisterDocGenerator::new(
            options,
            DocOptions {
                regions: doc.regions,
                fields: doc.fields,
                presence: doc.presence.clone(),
            },
        )),
    }
}

fn rename_component(component: &mut HwComponent, config: &RenameConfig) -> Result<()> {
    let case = match config.case {
        NameCase::UpperCamel => rename::NameCase::UpperCamel,
        NameCase::Snake => rename::NameCase::Snake,
    };
    let options = RenameOptions {
        descriptions: config.descriptions,
        ..RenameOptions::new(case)
    };
    let report = rename::rename(component, &options)
        .with_context(|| format!("Failed to rename {}", component.name))?;
    info!(
        "Renamed {} nodes to {:?}, {} descriptions rewritten",
        report.renamed.len(),
        config.case,
        report.descriptions
    );
    Ok(())
}

fn options_for(config: &GeneratorConfig, output: &OutputConfig, license: Option<String>) -> GeneratorOptions {
    GeneratorOptions {
        name: output.name.clone(),
        prefix: config.prefix.clone(),
        word_width: config.word_width,
        memory_map: config.memory_map.clone(),
        license,
        style: Style {
            indent: config.style.indent,
            use_spaces: config.style.use_spaces,
            max_line_length: config.style.max_line_length,
            ..Default::default()
        },
    }
}

/// Parses the configured component once and writes every configured output.
pub fn run_config(config: &GeneratorConfig) -> Result<()> {
    config.validate()?;
    let mut component = ipxact_ingestor::parse_file(&config.input)
        .with_context(|| format!("Failed to parse {}", config.input.display()))?;
    if let Some(rename) = &config.rename {
        rename_component(&mut component, rename)?;
    }
    let license = config.license_text()?;

    if config.outputs.is_empty() {
        warn!("No outputs configured for {}", config.input.display());
    }
    for output in &config.outputs {
        generate_output(&component, config, output, license.clone())?;
    }
    Ok(())
}

fn generate_output(
    component: &HwComponent,
    config: &GeneratorConfig,
    output: &OutputConfig,
    license: Option<String>,
) -> Result<()> {
    let generator = generator_for(
        output.kind,
        options_for(config, output, license),
        &config.documentation,
    );
    let text = generator
        .generate(component)
        .with_context(|| format!("Failed to generate {}", output.path.display()))?;
    write_output(&output.path, &text)?;
    info!("Wrote {:?} to {}", output.kind, output.path.display());
    Ok(())
}

pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
