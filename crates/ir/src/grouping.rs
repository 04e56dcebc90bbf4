// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Clustering of registers into access words.
//!
//! Registers are sorted by byte offset and split into groups that share one
//! access word of `word_bytes` bytes. A new group starts whenever an offset
//! reaches past the current word. The new word start is the offset rounded
//! down to a multiple of 4, whatever the word width.

use crate::error::{IrError, Result};
use crate::model::{Register, RegisterField};

const WORD_ALIGN: u64 = 4;

/// Groups `items` by access word, using `offset_of` as the byte offset.
///
/// Every item appears in exactly one group and groups are sorted by offset.
pub fn group_by_word<T>(
    items: impl IntoIterator<Item = T>,
    word_bytes: u64,
    offset_of: impl Fn(&T) -> u64,
) -> Vec<Vec<T>> {
    let word_bytes = word_bytes.max(1);
    let mut keyed: Vec<(u64, T)> = items
        .into_iter()
        .map(|item| (offset_of(&item), item))
        .collect();
    keyed.sort_by_key(|(offset, _)| *offset);

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut low = 0u64;
    for (offset, item) in keyed {
        if offset >= low.saturating_add(word_bytes) {
            low = offset - offset % WORD_ALIGN;
            groups.push(Vec::new());
        } else if groups.is_empty() {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(item);
        }
    }
    groups
}

/// Groups the registers of one address block by access word.
///
/// Fails if a register offset is missing or not numeric.
pub fn group_registers(registers: &[Register], word_bytes: u64) -> Result<Vec<Vec<&Register>>> {
    let keyed = registers
        .iter()
        .map(|reg| Ok((reg.offset_bytes()?, reg)))
        .collect::<Result<Vec<_>>>()?;
    Ok(group_by_word(keyed, word_bytes, |(offset, _)| *offset)
        .into_iter()
        .map(|group| group.into_iter().map(|(_, reg)| reg).collect())
        .collect())
}

/// Bit position of `field` within the access word holding `register`.
pub fn word_bit_position(register: &Register, field: &RegisterField, word_bytes: u64) -> Result<u64> {
    let word_bytes = word_bytes.max(1);
    let shift = register.offset_bytes()? % word_bytes;
    let offset = field.bit_offset()?;
    shift
        .checked_mul(8)
        .and_then(|shift| offset.checked_add(shift))
        .ok_or_else(|| IrError::Overflow {
            owner: format!("field {}.{}", register.name, field.name),
            what: "bit position",
        })
}

/// Lowest and highest bit of `field` within the access word holding
/// `register`. A zero-width field gives `(low, low)`.
pub fn word_bit_range(
    register: &Register,
    field: &RegisterField,
    word_bytes: u64,
) -> Result<(u64, u64)> {
    let low = word_bit_position(register, field, word_bytes)?;
    let width = field.bit_width()?;
    let high = low
        .checked_add(width.saturating_sub(1))
        .ok_or_else(|| IrError::Overflow {
            owner: format!("field {}.{}", register.name, field.name),
            what: "bit range",
        })?;
    Ok((low, high))
}
