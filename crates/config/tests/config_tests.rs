// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use regmap_config::{GeneratorConfig, OutputKind};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_from_file_resolves_relative_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("LICENSE"), "MIT License\n").unwrap();
    let config_path = dir.path().join("regmap.yaml");
    fs::write(
        &config_path,
        r#"
input: ip/can.xml
license: LICENSE
outputs:
  - kind: kernel_header
    path: out/kern.h
    name: kframe
"#,
    )
    .unwrap();

    let config = GeneratorConfig::from_file(&config_path).unwrap();
    assert_eq!(config.input, dir.path().join("ip/can.xml"));
    assert_eq!(config.outputs[0].kind, OutputKind::KernelHeader);
    assert_eq!(config.outputs[0].path, dir.path().join("out/kern.h"));
    assert_eq!(config.license_text().unwrap().as_deref(), Some("MIT License\n"));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = GeneratorConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to open generator config"));
}

#[test]
fn test_missing_license_file() {
    let config = GeneratorConfig::from_yaml_str("input: a.xml\nlicense: /nonexistent/LICENSE\n").unwrap();
    let err = config.license_text().unwrap_err();
    assert!(err.to_string().contains("Failed to read license file"));
}

#[test]
fn test_workspace_fixture() {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/regmap.yaml");
    let config = GeneratorConfig::from_file(&path).unwrap();
    assert!(config.input.ends_with("tests/fixtures/ctu_can_fd.xml"));
    assert!(config.input.exists());
    assert_eq!(config.prefix, "ctu_can_fd");
    let kinds: Vec<_> = config.outputs.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        [OutputKind::CHeader, OutputKind::KernelHeader, OutputKind::VhdlPackage]
    );
}
