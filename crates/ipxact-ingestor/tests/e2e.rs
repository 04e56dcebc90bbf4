use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

#[test]
#[allow(deprecated)]
fn test_cli_writes_yaml() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out/can_fd.yaml");

    Command::cargo_bin("ipxact-ingestor")?
        .arg("--input")
        .arg(fixture("ctu_can_fd.xml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let content = fs::read_to_string(&output)?;
    assert!(content.contains("name: CAN_FD"));
    assert!(content.contains("memory_maps:"));
    assert!(content.contains("name: DEVICE_ID"));
    Ok(())
}

#[test]
#[allow(deprecated)]
fn test_cli_writes_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("timer.json");

    Command::cargo_bin("ipxact-ingestor")?
        .args(["--input"])
        .arg(fixture("two_registers.xml"))
        .args(["--output"])
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(json["name"], "TIMER");
    let registers = &json["memory_maps"][0]["address_blocks"][0]["registers"];
    assert_eq!(registers[1]["name"], "RELOAD");
    assert_eq!(registers[1]["offset"]["value"], "4");
    Ok(())
}

#[test]
#[allow(deprecated)]
fn test_cli_rejects_non_component() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("bus.xml");
    fs::write(&input, "<busDefinition><name>apb</name></busDefinition>")?;

    Command::cargo_bin("ipxact-ingestor")?
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("out.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported IP-XACT item type busDefinition"));
    Ok(())
}
