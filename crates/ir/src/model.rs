// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::enums::*;
use crate::error::{IrError, Result};
use crate::id::NodeMeta;
use crate::value::{ReferenceValue, Value};
use crate::{NamedObject, Object};
use serde::Serialize;
use std::collections::BTreeMap;

macro_rules! impl_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Object for $ty {
                fn meta(&self) -> &NodeMeta {
                    &self.meta
                }
            }
        )*
    };
}

macro_rules! impl_named_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl_object!($ty);

            impl NamedObject for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn display_name(&self) -> Option<&str> {
                    self.display_name.as_deref()
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }
            }
        )*
    };
}

/// A named, typed constant declared by the component.
#[derive(Debug, Default, Serialize)]
pub struct Parameter {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Parameter name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Key matched against [`ReferenceValue::uuid`].
    pub parameter_id: String,
    /// Parameter value.
    pub value: Option<ReferenceValue>,
    /// Declared type.
    pub parameter_type: ParameterType,
}

/// One named value of a field.
#[derive(Debug, Default, Serialize)]
pub struct EnumeratedValue {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Value name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Encoded value.
    pub value: Option<Value>,
    /// Whether the value applies to reads, writes or both.
    pub usage: EnumeratedValueUsage,
}

impl EnumeratedValue {
    /// Numeric value of the enumerator.
    pub fn require_u64(&self) -> Result<u64> {
        let value = self.value.as_ref().ok_or_else(|| IrError::MissingValue {
            owner: format!("enumerated value {}", self.name),
            what: "value",
        })?;
        value.as_u64().ok_or_else(|| IrError::InvalidLiteral {
            owner: format!("enumerated value {}", self.name),
            text: value.value.clone(),
        })
    }
}

/// Reset value of a field within one reset domain.
#[derive(Debug, Default, Serialize)]
pub struct Reset {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Value after reset.
    pub reset_value: Option<ReferenceValue>,
    /// Bits the reset applies to.
    pub reset_mask: Option<ReferenceValue>,
    /// Name of the [`ResetType`] this reset belongs to.
    pub reset_reference: Option<String>,
}

/// A bit field of a register.
#[derive(Debug, Default, Serialize)]
pub struct RegisterField {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Field name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Value of the `fieldID` attribute.
    pub field_id: Option<Value>,
    /// Bit offset within the register.
    pub offset: Option<ReferenceValue>,
    /// Width in bits.
    pub width: Option<ReferenceValue>,
    /// Conditional inclusion guard.
    pub is_present: Option<ReferenceValue>,
    /// Reserved marker.
    pub reserved: Option<ReferenceValue>,
    /// Volatility.
    pub volatile: Volatile,
    /// Software access.
    pub access: Access,
    /// Effect of writes.
    pub modified_write_value: ModifiedWriteValue,
    /// Effect of reads.
    pub read_action: ReadAction,
    /// Participation in automated tests.
    pub testable: Testable,
    /// Test constraint.
    pub test_constraint: TestConstraint,
    /// Constraint on written values.
    pub write_value_constraint: WriteValueConstraint,
    /// Smallest legal written value.
    pub write_constraint_minimum: Option<ReferenceValue>,
    /// Largest legal written value.
    pub write_constraint_maximum: Option<ReferenceValue>,
    /// Reset values, one per reset domain.
    pub resets: Vec<Reset>,
    /// Named values of the field.
    pub enumerated_values: Vec<EnumeratedValue>,
}

impl RegisterField {
    /// Bit offset within the register.
    pub fn bit_offset(&self) -> Result<u64> {
        require(&self.offset, || format!("field {}", self.name), "offset")
    }

    /// Width in bits.
    pub fn bit_width(&self) -> Result<u64> {
        require(&self.width, || format!("field {}", self.name), "width")
    }

    /// Reset value of the first reset domain that gives a numeric one.
    pub fn reset_value(&self) -> Option<u64> {
        self.resets
            .iter()
            .filter_map(|reset| reset.reset_value.as_ref())
            .find_map(ReferenceValue::as_u64)
    }

    /// Field is marked reserved.
    pub fn is_reserved(&self) -> bool {
        self.reserved
            .as_ref()
            .and_then(ReferenceValue::as_bool)
            .unwrap_or(false)
    }
}

/// A register within an address block.
#[derive(Debug, Default, Serialize)]
pub struct Register {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Register name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Byte offset within the address block.
    pub offset: Option<ReferenceValue>,
    /// Width in bits.
    pub size: Option<ReferenceValue>,
    /// Array dimension.
    pub dimension: Option<ReferenceValue>,
    /// Conditional inclusion guard.
    pub is_present: Option<ReferenceValue>,
    /// Volatility.
    pub volatile: Volatile,
    /// Software access.
    pub access: Access,
    /// Fields in document order. Not necessarily sorted by offset.
    pub fields: Vec<RegisterField>,
}

impl Register {
    /// Byte offset within the address block.
    pub fn offset_bytes(&self) -> Result<u64> {
        require(&self.offset, || format!("register {}", self.name), "offset")
    }

    /// Width in bits.
    pub fn size_bits(&self) -> Result<u64> {
        require(&self.size, || format!("register {}", self.name), "size")
    }

    /// Fields sorted by ascending bit offset.
    pub fn sorted_fields(&self) -> Result<Vec<&RegisterField>> {
        let mut keyed = self
            .fields
            .iter()
            .map(|field| Ok((field.bit_offset()?, field)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|(offset, _)| *offset);
        Ok(keyed.into_iter().map(|(_, field)| field).collect())
    }
}

/// A contiguous region of the address space.
#[derive(Debug, Default, Serialize)]
pub struct AddressBlock {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Block name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Base address.
    pub base_address: Option<ReferenceValue>,
    /// Size of the block in address units.
    pub block_range: Option<ReferenceValue>,
    /// Data width in bits.
    pub width: Option<ReferenceValue>,
    /// Conditional inclusion guard.
    pub is_present: Option<ReferenceValue>,
    /// Registers or memory.
    pub usage: AddressBlockUsage,
    /// Software access.
    pub access: Access,
    /// Volatility.
    pub volatile: Volatile,
    /// Registers in document order.
    pub registers: Vec<Register>,
}

impl AddressBlock {
    /// Base address of the block.
    pub fn base_address_value(&self) -> Result<u64> {
        require(&self.base_address, || format!("address block {}", self.name), "baseAddress")
    }

    /// Absolute address of `register`: block base plus register offset.
    pub fn register_address(&self, register: &Register) -> Result<u64> {
        self.base_address_value()?
            .checked_add(register.offset_bytes()?)
            .ok_or_else(|| IrError::Overflow {
                owner: format!("register {}", register.name),
                what: "address",
            })
    }

    /// Memory blocks only contribute to the address layout.
    pub fn is_memory(&self) -> bool {
        self.usage == AddressBlockUsage::Memory
    }

    /// Registers sorted by ascending offset.
    pub fn sorted_registers(&self) -> Result<Vec<&Register>> {
        let mut keyed = self
            .registers
            .iter()
            .map(|reg| Ok((reg.offset_bytes()?, reg)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|(offset, _)| *offset);
        Ok(keyed.into_iter().map(|(_, reg)| reg).collect())
    }
}

/// A memory map of the component.
#[derive(Debug, Default, Serialize)]
pub struct MemoryMap {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Map name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Bits per address unit.
    pub address_unit_bits: Option<u64>,
    /// Conditional inclusion guard.
    pub is_present: Option<ReferenceValue>,
    /// Address blocks in document order.
    pub address_blocks: Vec<AddressBlock>,
}

/// A named reset domain.
#[derive(Debug, Default, Serialize)]
pub struct ResetType {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Reset domain name.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Arbitrary vendor markup, kept as a generic element tree.
#[derive(Debug, Default, Serialize)]
pub struct VendorExtension {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Element name without namespace.
    pub tag: String,
    /// Text content.
    pub text: Option<String>,
    /// Attributes by name.
    pub attributes: BTreeMap<String, String>,
    /// Nested elements.
    pub children: Vec<VendorExtension>,
}

/// Vendor, library, name and version of a component.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Vlnv {
    /// Vendor.
    pub vendor: String,
    /// Library.
    pub library: String,
    /// Component name.
    pub name: String,
    /// Version.
    pub version: String,
}

/// Root of the IR tree.
#[derive(Debug, Default, Serialize)]
pub struct HwComponent {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Component name, same as `vlnv.name`.
    pub name: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Identity of the component.
    pub vlnv: Vlnv,
    /// Author.
    pub author: Option<String>,
    /// License text.
    pub license: Option<String>,
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Reset domains.
    pub reset_types: Vec<ResetType>,
    /// Memory maps.
    pub memory_maps: Vec<MemoryMap>,
    /// Vendor extensions.
    pub vendor_extensions: Vec<VendorExtension>,
}

impl HwComponent {
    /// Creates an empty component with the given identity.
    pub fn new(vlnv: Vlnv) -> Self {
        Self {
            name: vlnv.name.clone(),
            vlnv,
            ..Default::default()
        }
    }

    /// Memory map by name, or the first one when `name` is `None`.
    pub fn memory_map(&self, name: Option<&str>) -> Option<&MemoryMap> {
        match name {
            Some(name) => self.memory_maps.iter().find(|map| map.name == name),
            None => self.memory_maps.first(),
        }
    }

    /// Parameter by `parameterId`.
    pub fn parameter(&self, parameter_id: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|param| param.parameter_id == parameter_id)
    }

    /// Reset domain by name.
    pub fn reset_type(&self, name: &str) -> Option<&ResetType> {
        self.reset_types.iter().find(|reset| reset.name == name)
    }
}

impl_named_object!(
    Parameter,
    EnumeratedValue,
    RegisterField,
    Register,
    AddressBlock,
    MemoryMap,
    ResetType,
    HwComponent,
);

impl_object!(Reset, VendorExtension);

fn require(
    value: &Option<ReferenceValue>,
    owner: impl Fn() -> String,
    what: &'static str,
) -> Result<u64> {
    match value {
        Some(value) => value.require_u64(|| format!("{} {}", owner(), what)),
        None => Err(IrError::MissingValue {
            owner: owner(),
            what,
        }),
    }
}
