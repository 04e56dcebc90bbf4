// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::error::{IrError, Result};
use crate::id::{IirId, NodeMeta};
use crate::Object;
use serde::Serialize;

/// A literal datum as written in the source document.
#[derive(Debug, Serialize)]
pub struct Value {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,

    /// Raw text of the value.
    pub value: String,
}

impl Value {
    /// Wraps a literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            value: value.into(),
        }
    }

    /// Evaluates the literal as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        parse_literal(&self.value)
    }
}

impl Object for Value {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

/// A value that is either a literal or the identifier of a parameter.
///
/// Until resolution runs, `value` holds the identifier itself. Resolution
/// either replaces it with the parameter value and records the parameter in
/// `reference_object`, or clears `uuid` when no parameter matches.
#[derive(Debug, Serialize)]
pub struct ReferenceValue {
    /// Node identity.
    #[serde(flatten)]
    pub meta: NodeMeta,

    /// Parameter identifier this value may refer to.
    pub uuid: Option<String>,

    /// Current value: placeholder before resolution, literal after.
    pub value: String,

    /// Parameter the value was resolved from.
    pub reference_object: Option<IirId>,
}

impl ReferenceValue {
    /// Creates an unresolved value from document text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            meta: NodeMeta::new(),
            uuid: Some(text.clone()),
            value: text,
            reference_object: None,
        }
    }

    /// True once the value was replaced by a parameter value.
    pub fn is_resolved(&self) -> bool {
        self.reference_object.is_some()
    }

    /// Evaluates the current value as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        parse_literal(&self.value)
    }

    /// Evaluates the current value as a flag: a number is true when non-zero,
    /// otherwise `true` and `false` are accepted in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_u64() {
            Some(v) => Some(v != 0),
            None if self.value.trim().eq_ignore_ascii_case("true") => Some(true),
            None if self.value.trim().eq_ignore_ascii_case("false") => Some(false),
            None => None,
        }
    }

    /// Like [`ReferenceValue::as_u64`], failing with an error naming `owner`.
    pub fn require_u64(&self, owner: impl FnOnce() -> String) -> Result<u64> {
        self.as_u64().ok_or_else(|| IrError::InvalidLiteral {
            owner: owner(),
            text: self.value.clone(),
        })
    }
}

impl Object for ReferenceValue {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

/// Evaluates an IP-XACT numeric literal.
///
/// Accepts decimal (`4096`), C hex and binary (`0x1000`, `0b101`) and
/// Verilog-style sized or unsized literals (`'h1000`, `32'hDEAD_BEEF`,
/// `4'b1010`, `'d12`, `'o17`). Underscores are ignored.
pub fn parse_literal(text: &str) -> Option<u64> {
    let text: String = text.trim().chars().filter(|c| *c != '_').collect();
    if text.is_empty() {
        return None;
    }

    if let Some((width, rest)) = text.split_once('\'') {
        if !width.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let mut chars = rest.chars();
        let radix = match chars.next()?.to_ascii_lowercase() {
            'h' => 16,
            'd' => 10,
            'b' => 2,
            'o' => 8,
            _ => return None,
        };
        return u64::from_str_radix(chars.as_str(), radix).ok();
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).ok();
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_forms() {
        assert_eq!(parse_literal("4096"), Some(4096));
        assert_eq!(parse_literal(" 0x1000 "), Some(0x1000));
        assert_eq!(parse_literal("'h1000"), Some(0x1000));
        assert_eq!(parse_literal("32'hDEAD_BEEF"), Some(0xDEAD_BEEF));
        assert_eq!(parse_literal("4'b1010"), Some(10));
        assert_eq!(parse_literal("'o17"), Some(15));
        assert_eq!(parse_literal("0b11"), Some(3));
    }

    #[test]
    fn test_parse_literal_rejects_identifiers() {
        assert_eq!(parse_literal("uuid_5f2a"), None);
        assert_eq!(parse_literal(""), None);
        assert_eq!(parse_literal("x'h10"), None);
        assert_eq!(parse_literal("'q10"), None);
    }

    #[test]
    fn test_reference_value_placeholder() {
        let value = ReferenceValue::new("WIDTH_ID");
        assert_eq!(value.uuid.as_deref(), Some("WIDTH_ID"));
        assert_eq!(value.value, "WIDTH_ID");
        assert!(!value.is_resolved());

        let err = value.require_u64(|| "field TXE width".to_string()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field TXE width: 'WIDTH_ID' is not a numeric literal"
        );
    }

    #[test]
    fn test_reference_value_as_bool() {
        assert_eq!(ReferenceValue::new("0").as_bool(), Some(false));
        assert_eq!(ReferenceValue::new("1'b1").as_bool(), Some(true));
        assert_eq!(ReferenceValue::new(" TRUE ").as_bool(), Some(true));
        assert_eq!(ReferenceValue::new("false").as_bool(), Some(false));
        assert_eq!(ReferenceValue::new("id_txt_count").as_bool(), None);
    }
}
