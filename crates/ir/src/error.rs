// RegMap - IP-XACT Register Map Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use thiserror::Error;

/// Errors raised when IR content does not satisfy what a consumer needs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IrError {
    /// A value that must be numeric could not be evaluated.
    #[error("{owner}: '{text}' is not a numeric literal")]
    InvalidLiteral {
        /// Node holding the value, e.g. `register CTRL offset`.
        owner: String,
        /// Offending text.
        text: String,
    },
    /// A value required by a generator is absent.
    #[error("{owner}: missing {what}")]
    MissingValue {
        /// Node the value is missing from.
        owner: String,
        /// Name of the missing value.
        what: &'static str,
    },
    /// Address or bit position arithmetic left the 64-bit range.
    #[error("{owner}: {what} overflows 64 bits")]
    Overflow {
        /// Node whose value overflowed.
        owner: String,
        /// Name of the computed value.
        what: &'static str,
    },
    /// A rename mapped two siblings of one kind to the same name.
    #[error("Renaming gives two {kind}s named '{name}' in {parent}")]
    NameCollision {
        /// Kind of the siblings, e.g. `register`.
        kind: &'static str,
        /// Name both siblings converted to.
        name: String,
        /// Name of the node holding the siblings.
        parent: String,
    },
}

/// Result type for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;
