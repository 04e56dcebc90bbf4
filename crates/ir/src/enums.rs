// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Keyword-valued properties of IR nodes.
//!
//! Every enum has an `Empty` variant used when the document does not give the
//! property, or gives a keyword we do not know.

use serde::Serialize;

macro_rules! ipxact_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $keyword:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            /// Not specified.
            #[default]
            Empty,
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// IP-XACT keyword of the variant, `None` for `Empty`.
            pub fn as_ipxact(self) -> Option<&'static str> {
                match self {
                    Self::Empty => None,
                    $(Self::$variant => Some($keyword),)*
                }
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                let text = text.trim();
                $(
                    if text.eq_ignore_ascii_case($keyword) {
                        return Self::$variant;
                    }
                )*
                Self::Empty
            }
        }
    };
}

ipxact_enum! {
    /// Usage of an enumerated value.
    EnumeratedValueUsage {
        /// Value is returned on reads.
        Read => "read",
        /// Value may be written.
        Write => "write",
        /// Both.
        ReadWrite => "read-write",
    }
}

ipxact_enum! {
    /// Software access to a block, register or field.
    Access {
        /// Read and write allowed.
        ReadWrite => "read-write",
        /// Read-only.
        ReadOnly => "read-only",
        /// Write-only.
        WriteOnly => "write-only",
        /// Readable, writable once.
        ReadWriteOnce => "read-writeOnce",
        /// Writable once, not readable.
        WriteOnce => "writeOnce",
    }
}

impl Access {
    /// Reads return the stored value.
    pub fn is_readable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadOnly | Self::ReadWriteOnce)
    }

    /// Writes have an effect.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Self::ReadWrite | Self::WriteOnly | Self::ReadWriteOnce | Self::WriteOnce
        )
    }

    /// Access was given in the document.
    pub fn is_set(self) -> bool {
        self != Self::Empty
    }
}

ipxact_enum! {
    /// Effect of a write on the stored value.
    ModifiedWriteValue {
        /// Writing 1 clears the bit.
        OneToClear => "oneToClear",
        /// Writing 1 sets the bit.
        OneToSet => "oneToSet",
        /// Writing 1 toggles the bit.
        OneToToggle => "oneToToggle",
        /// Writing 0 clears the bit.
        ZeroToClear => "zeroToClear",
        /// Writing 0 sets the bit.
        ZeroToSet => "zeroToSet",
        /// Writing 0 toggles the bit.
        ZeroToToggle => "zeroToToggle",
        /// Any write clears.
        Clear => "clear",
        /// Any write sets.
        Set => "set",
        /// Any write modifies.
        Modify => "modify",
    }
}

impl ModifiedWriteValue {
    /// Writes do something other than store the written value.
    pub fn has_side_effect(self) -> bool {
        self != Self::Empty
    }
}

ipxact_enum! {
    /// Effect of a read on the stored value.
    ReadAction {
        /// Reading clears.
        Clear => "clear",
        /// Reading sets.
        Set => "set",
        /// Reading modifies.
        Modify => "modify",
    }
}

impl ReadAction {
    /// Reads change the stored value.
    pub fn has_side_effect(self) -> bool {
        self != Self::Empty
    }
}

ipxact_enum! {
    /// Constraint for automated register tests.
    TestConstraint {
        /// No constraint.
        Unconstrained => "unconstrained",
        /// Value must be restored after test.
        Restore => "restore",
        /// Write back what was read.
        WriteAsRead => "writeAsRead",
        /// Do not write.
        ReadOnly => "readOnly",
    }
}

impl TestConstraint {
    /// Tests must respect a constraint.
    pub fn has_constraint(self) -> bool {
        !matches!(self, Self::Empty | Self::Unconstrained)
    }
}

ipxact_enum! {
    /// Legal values software may write.
    WriteValueConstraint {
        /// Write back what was read.
        WriteAsRead => "writeAsRead",
        /// Only enumerated values.
        UseEnumeratedValues => "useEnumeratedValues",
        /// Values within minimum and maximum.
        SetMinimumAndMaximumLimits => "setMinimumAndMaximumLimits",
    }
}

ipxact_enum! {
    /// Whether the value may change without software access.
    Volatile {
        /// Volatile.
        True => "true",
        /// Not volatile.
        False => "false",
    }
}

ipxact_enum! {
    /// Whether a field takes part in automated tests.
    Testable {
        /// Testable.
        True => "true",
        /// Not testable.
        False => "false",
    }
}

ipxact_enum! {
    /// Kind of content of an address block.
    AddressBlockUsage {
        /// Registers.
        Register => "register",
        /// Raw memory, layout only.
        Memory => "memory",
        /// Reserved space.
        Reserved => "reserved",
    }
}

ipxact_enum! {
    /// Declared type of a parameter.
    ParameterType {
        /// Single bit.
        Bit => "bit",
        /// 8-bit.
        Byte => "byte",
        /// 16-bit.
        ShortInt => "shortInt",
        /// 32-bit.
        Int => "int",
        /// 64-bit.
        LongInt => "longInt",
        /// Single precision.
        ShortReal => "shortReal",
        /// Double precision.
        Real => "real",
        /// Text.
        String => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(Access::from("Read-Write"), Access::ReadWrite);
        assert_eq!(Access::from("read-writeonce"), Access::ReadWriteOnce);
        assert_eq!(
            ModifiedWriteValue::from("oneToClear"),
            ModifiedWriteValue::OneToClear
        );
        assert_eq!(ParameterType::from("longInt"), ParameterType::LongInt);
        assert_eq!(AddressBlockUsage::from(" memory "), AddressBlockUsage::Memory);
    }

    #[test]
    fn test_unknown_keyword_is_empty() {
        assert_eq!(Access::from("sometimes"), Access::Empty);
        assert_eq!(Volatile::from(""), Volatile::Empty);
        assert_eq!(Access::Empty.as_ipxact(), None);
        assert_eq!(ReadAction::Clear.as_ipxact(), Some("clear"));
    }

    #[test]
    fn test_access_capabilities() {
        assert!(Access::ReadOnly.is_readable());
        assert!(!Access::ReadOnly.is_writable());
        assert!(Access::WriteOnce.is_writable());
        assert!(!Access::WriteOnce.is_readable());
        assert!(!Access::Empty.is_set());
        assert!(TestConstraint::Restore.has_constraint());
        assert!(!TestConstraint::Unconstrained.has_constraint());
    }
}
