use std::path::PathBuf;
use vhdl_entity::{parse_entity_file, Entry};

fn get_fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

#[test]
fn test_parse_can_top_level() {
    let interface =
        parse_entity_file(get_fixture_path("can_top_level.vhd")).expect("Failed to parse");

    let generics: Vec<_> = interface.generics.iter().filter_map(Entry::field).collect();
    assert_eq!(generics.len(), 3);
    assert_eq!(generics[0].name, "rx_buffer_size");
    assert_eq!(generics[0].kind, "natural range 32 to 4096");
    assert_eq!(generics[0].default.as_deref(), Some("128"));
    assert_eq!(generics[0].description, "RX Buffer RAM size (32 bit words)");
    assert_eq!(generics[2].default.as_deref(), Some("true"));

    let sections: Vec<&str> = interface
        .ports
        .iter()
        .filter_map(|entry| match entry {
            Entry::Section { description } => Some(description.as_str()),
            Entry::Field(_) => None,
        })
        .collect();
    assert_eq!(
        sections,
        [
            "Clock and Asynchronous reset",
            "Memory interface",
            "Interrupt Interface"
        ]
    );

    // Sections sit between the ports they separate.
    assert!(matches!(interface.ports[0], Entry::Section { .. }));
    let data_in = interface.ports[4].field().expect("data_in expected");
    assert_eq!(data_in.name, "data_in");
    assert_eq!(data_in.direction, "in");
    assert_eq!(data_in.kind, "std_logic_vector (31 downto 0)");
    assert_eq!(data_in.description, "Input data");

    let last = interface.ports.last().and_then(Entry::field).expect("int expected");
    assert_eq!(last.name, "int");
    assert_eq!(last.direction, "out");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parse_entity_file(get_fixture_path("does_not_exist.vhd")).unwrap_err();
    assert!(matches!(err, vhdl_entity::EntityError::Io(_)));
}
