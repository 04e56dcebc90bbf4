// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod generate;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use regmap_codegen::EntityTableGenerator;
use regmap_config::{
    DocConfig, GeneratorConfig, NameCase, OutputConfig, OutputKind, RenameConfig, StyleConfig,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

const EXIT_PASS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "RegMap - IP-XACT register map generator",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a C header with register address enums and bitfield unions.
    CHeader(GenerateArgs),

    /// Generate a Linux kernel style header with BIT/GENMASK field macros.
    KernelHeader(GenerateArgs),

    /// Generate a VHDL package with address, bit index and reset constants.
    VhdlPackage(GenerateArgs),

    /// Document the register map as LaTeX tables.
    RegisterDoc(RegisterDocArgs),

    /// Document the generics and ports of a VHDL entity as LaTeX tables.
    EntityDoc(EntityDocArgs),

    /// Print the resolved IR of an IP-XACT component.
    Dump(DumpArgs),

    /// Generate every output listed in a generator config (YAML).
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input IP-XACT component file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Package or header guard name
    #[arg(short, long)]
    name: String,

    /// Memory map to generate (default: the first one)
    #[arg(long)]
    memory_map: Option<String>,

    /// Access word width in bits
    #[arg(long, default_value_t = 32)]
    word_width: u32,

    /// Prefix of generated identifiers
    #[arg(long, default_value = "")]
    prefix: String,

    /// License file written as a comment at the top of the output
    #[arg(long)]
    license: Option<PathBuf>,

    /// Convert register map names to this case first
    #[arg(long, value_enum)]
    rename: Option<CaseArg>,

    /// With --rename, also rewrite renamed names in descriptions
    #[arg(long, requires = "rename")]
    rename_descriptions: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseArg {
    Camel,
    Snake,
}

impl GenerateArgs {
    fn into_config(self, kind: OutputKind) -> GeneratorConfig {
        let rename = self.rename.map(|case| RenameConfig {
            case: match case {
                CaseArg::Camel => NameCase::UpperCamel,
                CaseArg::Snake => NameCase::Snake,
            },
            descriptions: self.rename_descriptions,
        });
        GeneratorConfig {
            schema_version: "1.0".to_string(),
            input: self.input,
            memory_map: self.memory_map,
            word_width: self.word_width,
            prefix: self.prefix,
            license: self.license,
            style: StyleConfig::default(),
            rename,
            documentation: DocConfig::default(),
            outputs: vec![OutputConfig {
                kind,
                path: self.output,
                name: self.name,
            }],
        }
    }
}

#[derive(Args, Debug)]
struct RegisterDocArgs {
    #[command(flatten)]
    common: GenerateArgs,

    /// Leave out the table of address blocks
    #[arg(long)]
    no_regions: bool,

    /// Leave out bit tables and field descriptions
    #[arg(long)]
    no_fields: bool,

    /// Document only registers whose guarding parameter is true
    #[arg(long)]
    skip_conditional: bool,

    /// Value of a guarding parameter, implies --skip-conditional
    #[arg(long = "param", value_name = "NAME=BOOL", value_parser = parse_param)]
    params: Vec<(String, bool)>,
}

impl RegisterDocArgs {
    fn into_config(self) -> GeneratorConfig {
        let presence = (self.skip_conditional || !self.params.is_empty())
            .then(|| self.params.into_iter().collect::<BTreeMap<_, _>>());
        GeneratorConfig {
            documentation: DocConfig {
                regions: !self.no_regions,
                fields: !self.no_fields,
                presence,
            },
            ..self.common.into_config(OutputKind::RegisterDoc)
        }
    }
}

fn parse_param(text: &str) -> Result<(String, bool), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=BOOL, got '{text}'"))?;
    let value = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("'{value}' is neither true nor false"))?;
    Ok((name.trim().to_string(), value))
}

#[derive(Args, Debug)]
struct EntityDocArgs {
    /// VHDL source holding the entity
    #[arg(short, long)]
    input: PathBuf,

    /// Output LaTeX file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    Tree,
    Json,
    Yaml,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Input IP-XACT component file
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = DumpFormat::Tree)]
    format: DumpFormat,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Generator config (YAML)
    #[arg(short, long)]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout is reserved for `dump` output.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::CHeader(args) => generate::run_config(&args.into_config(OutputKind::CHeader)),
        Commands::KernelHeader(args) => {
            generate::run_config(&args.into_config(OutputKind::KernelHeader))
        }
        Commands::VhdlPackage(args) => {
            generate::run_config(&args.into_config(OutputKind::VhdlPackage))
        }
        Commands::RegisterDoc(args) => generate::run_config(&args.into_config()),
        Commands::EntityDoc(args) => run_entity_doc(args),
        Commands::Dump(args) => run_dump(args),
        Commands::Run(args) => run_generator_config(args),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_PASS),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run_entity_doc(args: EntityDocArgs) -> Result<()> {
    let entity = vhdl_entity::parse_entity_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    if entity.is_empty() {
        warn!("No generics or ports found in {}", args.input.display());
    }
    let text = EntityTableGenerator::default().generate(&entity)?;
    generate::write_output(&args.output, &text)?;
    info!("Wrote entity tables to {}", args.output.display());
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
    let component = ipxact_ingestor::parse_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    let text = match args.format {
        DumpFormat::Tree => regmap_ir::tree::print_tree(&component),
        DumpFormat::Json => {
            serde_json::to_string_pretty(&component).context("Failed to serialize IR as JSON")?
        }
        DumpFormat::Yaml => {
            serde_yaml::to_string(&component).context("Failed to serialize IR as YAML")?
        }
    };
    println!("{}", text.trim_end());
    Ok(())
}

fn run_generator_config(args: RunArgs) -> Result<()> {
    let config = GeneratorConfig::from_file(&args.config)?;
    generate::run_config(&config)?;
    info!(
        "Generated {} outputs from {}",
        config.outputs.len(),
        args.config.display()
    );
    Ok(())
}
