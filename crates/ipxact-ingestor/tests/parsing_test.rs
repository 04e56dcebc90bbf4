use ipxact_ingestor::parse_file;
use regmap_ir::grouping::group_registers;
use regmap_ir::{Access, AddressBlockUsage, ModifiedWriteValue, NamedObject, Object, ParameterType};
use std::collections::HashSet;
use std::path::PathBuf;

fn get_fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

#[test]
fn test_parse_ctu_can_fd() {
    let component = parse_file(get_fixture_path("ctu_can_fd.xml")).expect("Failed to parse");

    assert_eq!(component.name(), "CAN_FD");
    assert_eq!(component.vlnv.vendor, "ctu.cz");
    assert_eq!(component.vlnv.version, "2.1");
    assert_eq!(component.description(), Some("CAN FD IP core register map"));
    assert_eq!(component.license.as_deref(), Some("MIT"));

    assert_eq!(component.parameters.len(), 2);
    assert_eq!(component.parameters[0].parameter_type, ParameterType::Int);
    assert_eq!(component.reset_types.len(), 2);
    assert_eq!(
        component.reset_type("HARD").and_then(|r| r.display_name()),
        Some("Hard reset")
    );

    let map = component.memory_map(None).expect("No memory map");
    assert_eq!(map.name(), "CAN_Registers");
    assert_eq!(map.address_unit_bits, Some(8));
    assert_eq!(map.address_blocks.len(), 2);

    let control = &map.address_blocks[0];
    assert_eq!(control.registers.len(), 5);
    assert_eq!(control.block_range.as_ref().unwrap().value, "0x100");
    assert_eq!(control.width.as_ref().unwrap().value, "32");
    assert!(map.address_blocks[1].is_memory());
    assert_eq!(map.address_blocks[1].usage, AddressBlockUsage::Memory);

    let mode = &control.registers[2];
    assert_eq!(mode.name(), "MODE");
    let rst = mode.fields.iter().find(|f| f.name == "RST").expect("RST not found");
    assert_eq!(rst.access, Access::WriteOnly);
    assert_eq!(rst.modified_write_value, ModifiedWriteValue::OneToClear);
    assert_eq!(rst.reset_value(), Some(0));

    let sorted: Vec<_> = mode
        .sorted_fields()
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(sorted, ["RST", "FDE"]);
}

#[test]
fn test_parameter_references_are_resolved() {
    let component = parse_file(get_fixture_path("ctu_can_fd.xml")).expect("Failed to parse");
    let control = &component.memory_maps[0].address_blocks[0];

    let status = &control.registers[4];
    let offset = status.offset.as_ref().unwrap();
    assert_eq!(offset.value, "0x8");
    assert_eq!(offset.reference_object, Some(component.parameters[1].iir_id()));
    assert_eq!(status.offset_bytes().unwrap(), 8);

    let rtrth = &control.registers[3].fields[1];
    assert_eq!(rtrth.bit_width().unwrap(), 4);

    // Plain literals are not references.
    let rtrle = &control.registers[3].fields[0];
    assert_eq!(rtrle.width.as_ref().unwrap().uuid, None);
}

#[test]
fn test_parent_links_and_unique_ids() {
    let component = parse_file(get_fixture_path("ctu_can_fd.xml")).expect("Failed to parse");

    let ids = component.collect_ids();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());

    let map = &component.memory_maps[0];
    let block = &map.address_blocks[0];
    assert_eq!(map.parent(), Some(component.iir_id()));
    assert_eq!(block.registers[0].parent(), Some(block.iir_id()));
    let field = &block.registers[0].fields[0];
    assert_eq!(field.resets[0].parent(), Some(field.iir_id()));
}

#[test]
fn test_two_register_block_groups() {
    let component = parse_file(get_fixture_path("two_registers.xml")).expect("Failed to parse");
    let block = &component.memory_maps[0].address_blocks[0];
    assert_eq!(block.base_address_value().unwrap(), 0x1000);

    let groups = group_registers(&block.registers, 4).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.len() == 1));

    let addresses: Vec<u64> = groups
        .iter()
        .map(|g| block.base_address_value().unwrap() + g[0].offset_bytes().unwrap())
        .collect();
    assert_eq!(addresses, [0x1000, 0x1004]);
}
