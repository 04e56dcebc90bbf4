#![deny(missing_docs)]

//! # IP-XACT Ingestor
//!
//! Builds the RegMap IR from an IP-XACT `component` document.
//!
//! Both the 2009 (`spirit:`) and 2014 (`ipxact:`) flavours are accepted.
//! Namespace prefixes are ignored, so tags are matched by local name only.
//! Unknown tags are skipped. Once the tree is built, parent handles are
//! linked and parameter references are resolved exactly once.

use regmap_ir::resolve::resolve_references;
use regmap_ir::{
    parse_literal, AddressBlock, AddressBlockUsage, EnumeratedValue, EnumeratedValueUsage,
    HwComponent, MemoryMap, ModifiedWriteValue, Parameter, ParameterType, ReadAction,
    ReferenceValue, Register, RegisterField, Reset, ResetType, TestConstraint, Testable, Value,
    VendorExtension, Vlnv, Volatile, WriteValueConstraint,
};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use xmltree::{Element, XMLNode};

/// Errors that can occur while reading an IP-XACT document.
#[derive(Error, Debug)]
pub enum IngestError {
    /// IO error during file reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(#[from] xmltree::ParseError),
    /// Error serializing the IR as YAML.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Error serializing the IR as JSON.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// The root element is not a `component`.
    #[error("Unsupported IP-XACT item type {0}")]
    UnsupportedRoot(String),
    /// A required attribute is absent.
    #[error("<{element}> is missing attribute {attribute}")]
    MissingAttribute {
        /// Element lacking the attribute.
        element: String,
        /// Attribute name.
        attribute: &'static str,
    },
    /// A required child element is absent.
    #[error("<{element}> is missing element <{child}>")]
    MissingElement {
        /// Element lacking the child.
        element: String,
        /// Child tag.
        child: &'static str,
    },
    /// Two parameters share a `parameterId`.
    #[error("Duplicate parameterId '{id}' on parameter {name}")]
    DuplicateParameterId {
        /// Repeated identifier.
        id: String,
        /// Name of the second parameter carrying it.
        name: String,
    },
    /// Two siblings of the same kind share a name.
    #[error("Duplicate {kind} '{name}' in {parent}")]
    DuplicateName {
        /// Node kind, e.g. `register`.
        kind: &'static str,
        /// Repeated name.
        name: String,
        /// Name of the owning node.
        parent: String,
    },
    /// A value that must be a plain number is not.
    #[error("<{element}>: '{text}' is not a number")]
    InvalidNumber {
        /// Element holding the text.
        element: String,
        /// Offending text.
        text: String,
    },
}

/// Result type for IP-XACT ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Reads and parses an IP-XACT file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<HwComponent> {
    let path = path.as_ref();
    info!("Reading IP-XACT component from {}", path.display());
    let xml = std::fs::read_to_string(path)?;
    parse_component(&xml)
}

/// Parses an IP-XACT document held in memory.
pub fn parse_component(xml: &str) -> Result<HwComponent> {
    let root = Element::parse(xml.as_bytes())?;
    if root.name != "component" {
        return Err(IngestError::UnsupportedRoot(root.name));
    }

    let mut component = parse_hw_component(&root)?;
    component.link_parents();
    let report = resolve_references(&mut component);
    info!(
        "Parsed component {}: {} memory map(s), {} parameter(s), {} reference(s) resolved",
        component.name,
        component.memory_maps.len(),
        component.parameters.len(),
        report.resolved
    );
    Ok(component)
}

/// Saves the IR of `component` to `path`, as JSON if the extension is
/// `.json` and as YAML otherwise.
pub fn save_component(component: &HwComponent, path: &Path) -> Result<()> {
    let text = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::to_string_pretty(component)?,
        _ => serde_yaml::to_string(component)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

fn elements(node: &Element) -> impl Iterator<Item = &Element> {
    node.children.iter().filter_map(|child| match child {
        XMLNode::Element(element) => Some(element),
        _ => None,
    })
}

fn text(node: &Element) -> String {
    node.get_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn reference(node: &Element) -> Option<ReferenceValue> {
    Some(ReferenceValue::new(text(node)))
}

fn number(node: &Element) -> Result<u64> {
    let text = text(node);
    parse_literal(&text).ok_or_else(|| IngestError::InvalidNumber {
        element: node.name.clone(),
        text,
    })
}

/// Fails on the first name that occurs twice among the siblings.
fn ensure_unique_names<'a>(
    kind: &'static str,
    parent: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(IngestError::DuplicateName {
                kind,
                name: name.to_string(),
                parent: parent.to_string(),
            });
        }
    }
    Ok(())
}

struct Named {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
}

/// First pass over an element: `name`, `displayName` and `description`.
fn parse_named_object(node: &Element) -> Named {
    let mut named = Named {
        name: String::new(),
        display_name: None,
        description: None,
    };
    for item in elements(node) {
        match item.name.as_str() {
            "name" => named.name = text(item),
            "displayName" => named.display_name = Some(text(item)),
            "description" => named.description = Some(text(item)),
            _ => {}
        }
    }
    named
}

fn parse_vlnv(node: &Element) -> Result<Vlnv> {
    let mut vendor = None;
    let mut library = None;
    let mut name = None;
    let mut version = None;

    for item in elements(node) {
        match item.name.as_str() {
            "vendor" => vendor = Some(text(item)),
            "library" => library = Some(text(item)),
            "name" => name = Some(text(item)),
            "version" => version = Some(text(item)),
            _ => {}
        }
    }

    let missing = |child| IngestError::MissingElement {
        element: node.name.clone(),
        child,
    };
    Ok(Vlnv {
        vendor: vendor.ok_or_else(|| missing("vendor"))?,
        library: library.ok_or_else(|| missing("library"))?,
        name: name.ok_or_else(|| missing("name"))?,
        version: version.ok_or_else(|| missing("version"))?,
    })
}

fn parse_hw_component(node: &Element) -> Result<HwComponent> {
    let vlnv = parse_vlnv(node)?;
    debug!("Parsing component {}", vlnv.name);
    let mut component = HwComponent::new(vlnv);

    for item in elements(node) {
        match item.name.as_str() {
            "displayName" => component.display_name = Some(text(item)),
            "description" => component.description = Some(text(item)),
            "author" => component.author = Some(text(item)),
            "license" => component.license = Some(text(item)),
            "parameters" => component.parameters = parse_parameters(item)?,
            "resetTypes" => component.reset_types = parse_reset_types(item),
            "memoryMaps" => component.memory_maps = parse_memory_maps(item)?,
            "vendorExtensions" => component.vendor_extensions = parse_vendor_extensions(item),
            _ => {}
        }
    }
    ensure_unique_names(
        "memory map",
        &component.name,
        component.memory_maps.iter().map(|map| map.name.as_str()),
    )?;
    Ok(component)
}

fn parse_parameters(node: &Element) -> Result<Vec<Parameter>> {
    let parameters = elements(node)
        .filter(|item| item.name == "parameter")
        .map(parse_parameter)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    for param in &parameters {
        if !seen.insert(param.parameter_id.as_str()) {
            return Err(IngestError::DuplicateParameterId {
                id: param.parameter_id.clone(),
                name: param.name.clone(),
            });
        }
    }
    Ok(parameters)
}

fn parse_parameter(node: &Element) -> Result<Parameter> {
    let parameter_id = node
        .attributes
        .get("parameterId")
        .cloned()
        .ok_or_else(|| IngestError::MissingAttribute {
            element: node.name.clone(),
            attribute: "parameterId",
        })?;
    let parameter_type = node
        .attributes
        .get("parameterType")
        .or_else(|| node.attributes.get("type"))
        .map(|kind| ParameterType::from(kind.as_str()))
        .unwrap_or_default();

    let named = parse_named_object(node);
    let value = elements(node)
        .filter(|item| item.name == "value")
        .last()
        .and_then(reference);

    Ok(Parameter {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        parameter_id,
        value,
        parameter_type,
        ..Default::default()
    })
}

fn parse_reset_types(node: &Element) -> Vec<ResetType> {
    elements(node)
        .filter(|item| item.name == "resetType")
        .map(|item| {
            let named = parse_named_object(item);
            ResetType {
                name: named.name,
                display_name: named.display_name,
                description: named.description,
                ..Default::default()
            }
        })
        .collect()
}

fn parse_memory_maps(node: &Element) -> Result<Vec<MemoryMap>> {
    elements(node)
        .filter(|item| item.name == "memoryMap")
        .map(parse_memory_map)
        .collect()
}

fn parse_memory_map(node: &Element) -> Result<MemoryMap> {
    let named = parse_named_object(node);
    let mut map = MemoryMap {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        ..Default::default()
    };

    for item in elements(node) {
        match item.name.as_str() {
            "addressUnitBits" => map.address_unit_bits = Some(number(item)?),
            "isPresent" => map.is_present = reference(item),
            "addressBlock" => map.address_blocks.push(parse_address_block(item)?),
            _ => {}
        }
    }
    ensure_unique_names(
        "address block",
        &map.name,
        map.address_blocks.iter().map(|block| block.name.as_str()),
    )?;
    Ok(map)
}

fn parse_address_block(node: &Element) -> Result<AddressBlock> {
    let named = parse_named_object(node);
    let mut block = AddressBlock {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        ..Default::default()
    };

    for item in elements(node) {
        match item.name.as_str() {
            "baseAddress" => block.base_address = reference(item),
            "blockRange" | "range" => block.block_range = reference(item),
            "width" => block.width = reference(item),
            "isPresent" => block.is_present = reference(item),
            "volatile" => block.volatile = Volatile::from(text(item).as_str()),
            "usage" => block.usage = AddressBlockUsage::from(text(item).as_str()),
            "access" => block.access = text(item).as_str().into(),
            "register" => block.registers.push(parse_register(item)?),
            _ => {}
        }
    }
    ensure_unique_names(
        "register",
        &block.name,
        block.registers.iter().map(|reg| reg.name.as_str()),
    )?;
    debug!(
        "Address block {}: {} register(s)",
        block.name,
        block.registers.len()
    );
    Ok(block)
}

fn parse_register(node: &Element) -> Result<Register> {
    let named = parse_named_object(node);
    let mut register = Register {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        ..Default::default()
    };

    for item in elements(node) {
        match item.name.as_str() {
            "offset" | "addressOffset" => register.offset = reference(item),
            "size" => register.size = reference(item),
            "dimension" | "dim" => register.dimension = reference(item),
            "isPresent" => register.is_present = reference(item),
            "volatile" => register.volatile = Volatile::from(text(item).as_str()),
            "access" => register.access = text(item).as_str().into(),
            "field" => register.fields.push(parse_register_field(item)?),
            _ => {}
        }
    }
    ensure_unique_names(
        "field",
        &register.name,
        register.fields.iter().map(|field| field.name.as_str()),
    )?;
    Ok(register)
}

fn parse_register_field(node: &Element) -> Result<RegisterField> {
    let named = parse_named_object(node);
    let mut field = RegisterField {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        field_id: node.attributes.get("fieldID").map(Value::new),
        ..Default::default()
    };

    for item in elements(node) {
        match item.name.as_str() {
            "offset" | "bitOffset" => field.offset = reference(item),
            "width" | "bitWidth" => field.width = reference(item),
            "isPresent" => field.is_present = reference(item),
            "reserved" => field.reserved = reference(item),
            "volatile" => field.volatile = Volatile::from(text(item).as_str()),
            "access" => field.access = text(item).as_str().into(),
            "modifiedWriteValue" | "modifiedWriteValues" => {
                field.modified_write_value = ModifiedWriteValue::from(text(item).as_str())
            }
            "readAction" => field.read_action = ReadAction::from(text(item).as_str()),
            "testable" => {
                field.testable = Testable::from(text(item).as_str());
                if let Some(constraint) = item.attributes.get("testConstraint") {
                    field.test_constraint = TestConstraint::from(constraint.as_str());
                }
            }
            "testConstraint" => {
                field.test_constraint = TestConstraint::from(text(item).as_str())
            }
            "writeValueConstraint" => parse_write_value_constraint(item, &mut field),
            "writevalueminimum" => field.write_constraint_minimum = reference(item),
            "writevaluemaximum" => field.write_constraint_maximum = reference(item),
            "resets" => {
                for reset in elements(item).filter(|reset| reset.name == "reset") {
                    field.resets.push(parse_field_reset(reset));
                }
            }
            "enumeratedValues" => {
                for value in elements(item).filter(|value| value.name == "enumeratedValue") {
                    field.enumerated_values.push(parse_enumerated_value(value));
                }
            }
            _ => {}
        }
    }
    Ok(field)
}

/// Handles both the keyword form and the structured form of
/// `writeValueConstraint`.
fn parse_write_value_constraint(node: &Element, field: &mut RegisterField) {
    let mut structured = false;
    for item in elements(node) {
        structured = true;
        match item.name.as_str() {
            "writeAsRead" => field.write_value_constraint = WriteValueConstraint::WriteAsRead,
            "useEnumeratedValues" => {
                field.write_value_constraint = WriteValueConstraint::UseEnumeratedValues
            }
            "minimum" => {
                field.write_value_constraint = WriteValueConstraint::SetMinimumAndMaximumLimits;
                field.write_constraint_minimum = reference(item);
            }
            "maximum" => {
                field.write_value_constraint = WriteValueConstraint::SetMinimumAndMaximumLimits;
                field.write_constraint_maximum = reference(item);
            }
            _ => {}
        }
    }
    if !structured {
        field.write_value_constraint = WriteValueConstraint::from(text(node).as_str());
    }
}

fn parse_field_reset(node: &Element) -> Reset {
    let mut reset = Reset {
        reset_reference: node.attributes.get("resetTypeRef").cloned(),
        ..Default::default()
    };
    for item in elements(node) {
        match item.name.as_str() {
            "value" => reset.reset_value = reference(item),
            "mask" => reset.reset_mask = reference(item),
            _ => {}
        }
    }
    reset
}

fn parse_enumerated_value(node: &Element) -> EnumeratedValue {
    let named = parse_named_object(node);
    let mut value = EnumeratedValue {
        name: named.name,
        display_name: named.display_name,
        description: named.description,
        usage: node
            .attributes
            .get("usage")
            .map(|usage| EnumeratedValueUsage::from(usage.as_str()))
            .unwrap_or_default(),
        ..Default::default()
    };
    for item in elements(node) {
        match item.name.as_str() {
            "value" => value.value = Some(Value::new(text(item))),
            "usage" => value.usage = EnumeratedValueUsage::from(text(item).as_str()),
            _ => {}
        }
    }
    value
}

fn parse_vendor_extensions(node: &Element) -> Vec<VendorExtension> {
    elements(node).map(parse_vendor_extension).collect()
}

fn parse_vendor_extension(node: &Element) -> VendorExtension {
    let text = node.children.iter().find_map(|child| match child {
        XMLNode::Text(text) | XMLNode::CData(text) => Some(text.trim().to_string()),
        _ => None,
    });
    VendorExtension {
        tag: node.name.clone(),
        text,
        attributes: node
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        children: parse_vendor_extensions(node),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_ir::{Access, NamedObject, Object};

    fn wrap(body: &str) -> String {
        format!(
            r#"<ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
                 <ipxact:vendor>v</ipxact:vendor>
                 <ipxact:library>l</ipxact:library>
                 <ipxact:name>c</ipxact:name>
                 <ipxact:version>1</ipxact:version>
                 {body}
               </ipxact:component>"#
        )
    }

    #[test]
    fn test_unsupported_root() {
        let err = parse_component("<abstractor><name>x</name></abstractor>").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedRoot(ref tag) if tag == "abstractor"));
    }

    #[test]
    fn test_missing_vlnv_element() {
        let err = parse_component("<component><vendor>v</vendor></component>").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingElement { child: "library", .. }
        ));
    }

    #[test]
    fn test_parameter_requires_id() {
        let xml = wrap(
            "<ipxact:parameters><ipxact:parameter>
                <ipxact:name>P</ipxact:name><ipxact:value>1</ipxact:value>
             </ipxact:parameter></ipxact:parameters>",
        );
        let err = parse_component(&xml).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingAttribute { attribute: "parameterId", .. }
        ));
    }

    #[test]
    fn test_duplicate_parameter_id() {
        let xml = wrap(
            r#"<ipxact:parameters>
                 <ipxact:parameter parameterId="W"><ipxact:name>W8</ipxact:name><ipxact:value>8</ipxact:value></ipxact:parameter>
                 <ipxact:parameter parameterId="W"><ipxact:name>W16</ipxact:name><ipxact:value>16</ipxact:value></ipxact:parameter>
               </ipxact:parameters>"#,
        );
        let err = parse_component(&xml).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate parameterId 'W' on parameter W16");
    }

    #[test]
    fn test_duplicate_register_name() {
        let xml = wrap(
            "<ipxact:memoryMaps><ipxact:memoryMap><ipxact:name>M</ipxact:name>
                <ipxact:addressBlock><ipxact:name>Ctrl</ipxact:name>
                  <ipxact:baseAddress>0</ipxact:baseAddress>
                  <ipxact:register><ipxact:name>R</ipxact:name><ipxact:addressOffset>0</ipxact:addressOffset></ipxact:register>
                  <ipxact:register><ipxact:name>R</ipxact:name><ipxact:addressOffset>4</ipxact:addressOffset></ipxact:register>
                </ipxact:addressBlock>
              </ipxact:memoryMap></ipxact:memoryMaps>",
        );
        let err = parse_component(&xml).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DuplicateName { kind: "register", ref name, ref parent }
                if name == "R" && parent == "Ctrl"
        ));
    }

    #[test]
    fn test_duplicate_field_name() {
        let xml = wrap(
            "<ipxact:memoryMaps><ipxact:memoryMap><ipxact:name>M</ipxact:name>
                <ipxact:addressBlock><ipxact:name>B</ipxact:name>
                  <ipxact:register><ipxact:name>MODE</ipxact:name>
                    <ipxact:field><ipxact:name>ENA</ipxact:name><ipxact:bitOffset>0</ipxact:bitOffset></ipxact:field>
                    <ipxact:field><ipxact:name>ENA</ipxact:name><ipxact:bitOffset>1</ipxact:bitOffset></ipxact:field>
                  </ipxact:register>
                </ipxact:addressBlock>
              </ipxact:memoryMap></ipxact:memoryMaps>",
        );
        let err = parse_component(&xml).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate field 'ENA' in MODE");
    }

    #[test]
    fn test_invalid_address_unit_bits() {
        let xml = wrap(
            "<ipxact:memoryMaps><ipxact:memoryMap>
                <ipxact:name>M</ipxact:name>
                <ipxact:addressUnitBits>eight</ipxact:addressUnitBits>
             </ipxact:memoryMap></ipxact:memoryMaps>",
        );
        let err = parse_component(&xml).unwrap_err();
        assert_eq!(err.to_string(), "<addressUnitBits>: 'eight' is not a number");
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let xml = wrap(
            "<ipxact:busInterfaces><ipxact:busInterface/></ipxact:busInterfaces>
             <ipxact:model><ipxact:views/></ipxact:model>",
        );
        let component = parse_component(&xml).unwrap();
        assert_eq!(component.name(), "c");
        assert!(component.memory_maps.is_empty());
    }

    #[test]
    fn test_field_with_structured_write_constraint() {
        let xml = wrap(
            r#"<ipxact:memoryMaps><ipxact:memoryMap><ipxact:name>M</ipxact:name>
                <ipxact:addressBlock><ipxact:name>B</ipxact:name>
                  <ipxact:baseAddress>0</ipxact:baseAddress>
                  <ipxact:register><ipxact:name>R</ipxact:name>
                    <ipxact:addressOffset>0</ipxact:addressOffset>
                    <ipxact:size>32</ipxact:size>
                    <ipxact:field ipxact:fieldID="f7">
                      <ipxact:name>PRESC</ipxact:name>
                      <ipxact:bitOffset>3</ipxact:bitOffset>
                      <ipxact:bitWidth>5</ipxact:bitWidth>
                      <ipxact:access>read-write</ipxact:access>
                      <ipxact:writeValueConstraint>
                        <ipxact:minimum>1</ipxact:minimum>
                        <ipxact:maximum>'h1f</ipxact:maximum>
                      </ipxact:writeValueConstraint>
                      <ipxact:enumeratedValues>
                        <ipxact:enumeratedValue usage="write">
                          <ipxact:name>DIV1</ipxact:name>
                          <ipxact:value>1</ipxact:value>
                        </ipxact:enumeratedValue>
                      </ipxact:enumeratedValues>
                    </ipxact:field>
                  </ipxact:register>
                </ipxact:addressBlock>
              </ipxact:memoryMap></ipxact:memoryMaps>"#,
        );
        let component = parse_component(&xml).unwrap();
        let field = &component.memory_maps[0].address_blocks[0].registers[0].fields[0];

        assert_eq!(field.name(), "PRESC");
        assert_eq!(field.field_id.as_ref().unwrap().value, "f7");
        assert_eq!(field.bit_offset().unwrap(), 3);
        assert_eq!(field.bit_width().unwrap(), 5);
        assert_eq!(field.access, Access::ReadWrite);
        assert_eq!(
            field.write_value_constraint,
            WriteValueConstraint::SetMinimumAndMaximumLimits
        );
        assert_eq!(field.write_constraint_maximum.as_ref().unwrap().as_u64(), Some(31));
        assert_eq!(field.enumerated_values[0].usage, EnumeratedValueUsage::Write);
    }

    #[test]
    fn test_vendor_extensions_keep_markup() {
        let xml = wrap(
            r#"<ipxact:vendorExtensions>
                 <acme:flags xmlns:acme="urn:acme" mode="fast">
                   <acme:flag>a</acme:flag>
                   <acme:flag>b</acme:flag>
                 </acme:flags>
               </ipxact:vendorExtensions>"#,
        );
        let component = parse_component(&xml).unwrap();
        let ext = &component.vendor_extensions[0];
        assert_eq!(ext.tag, "flags");
        assert_eq!(ext.attributes.get("mode").map(String::as_str), Some("fast"));
        assert_eq!(ext.children.len(), 2);
        assert_eq!(ext.children[1].text.as_deref(), Some("b"));
        assert_eq!(ext.children[1].parent(), Some(ext.iir_id()));
    }
}
