//! PCD datum types.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::string::String;
use core::fmt;

/// The storage type of a PCD value.
///
/// Declaration order matters: [`DatumType::is_valid`] is a range check from
/// [`DatumType::UInt8`] to [`DatumType::Pointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize)]
#[serde(from = "String")]
pub enum DatumType {
    /// `UINT8`
    UInt8,
    /// `UINT16`
    UInt16,
    /// `UINT32`
    UInt32,
    /// `UINT64`
    UInt64,
    /// `BOOLEAN`
    Boolean,
    /// `VOID*`: an ASCII string, unicode string or byte array.
    Pointer,
    /// Unrecognized datum type. Never valid.
    #[default]
    Unknown,
}

impl DatumType {
    /// Returns true for every datum type except [`DatumType::Unknown`].
    pub fn is_valid(self) -> bool {
        DatumType::UInt8 <= self && self <= DatumType::Pointer
    }

    /// Returns true for the four unsigned integer types.
    pub fn is_numeric(self) -> bool {
        DatumType::UInt8 <= self && self <= DatumType::UInt64
    }

    /// Case-insensitive lookup. Unrecognized names map to [`DatumType::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        [
            DatumType::UInt8,
            DatumType::UInt16,
            DatumType::UInt32,
            DatumType::UInt64,
            DatumType::Boolean,
            DatumType::Pointer,
        ]
        .into_iter()
        .find(|datum| datum.name().eq_ignore_ascii_case(name))
        .unwrap_or(DatumType::Unknown)
    }

    /// The name used in package declarations.
    pub fn name(self) -> &'static str {
        match self {
            DatumType::UInt8 => "UINT8",
            DatumType::UInt16 => "UINT16",
            DatumType::UInt32 => "UINT32",
            DatumType::UInt64 => "UINT64",
            DatumType::Boolean => "BOOLEAN",
            DatumType::Pointer => "VOID*",
            DatumType::Unknown => "UNKNOWN",
        }
    }

    /// The C type used for storage symbols.
    pub fn c_type(self) -> Option<&'static str> {
        match self {
            DatumType::UInt8 => Some("UINT8"),
            DatumType::UInt16 => Some("UINT16"),
            DatumType::UInt32 => Some("UINT32"),
            DatumType::UInt64 => Some("UINT64"),
            DatumType::Boolean => Some("BOOLEAN"),
            DatumType::Pointer => Some("VOID *"),
            DatumType::Unknown => None,
        }
    }

    /// The infix used in `_PCD_GET_MODE_<infix>_<name>` macros.
    pub fn mode_infix(self) -> Option<&'static str> {
        match self {
            DatumType::UInt8 => Some("8"),
            DatumType::UInt16 => Some("16"),
            DatumType::UInt32 => Some("32"),
            DatumType::UInt64 => Some("64"),
            DatumType::Boolean => Some("BOOL"),
            DatumType::Pointer => Some("PTR"),
            DatumType::Unknown => None,
        }
    }

    /// The suffix of the `LibPcdGet*` / `LibPcdSet*` library calls.
    pub fn library_suffix(self) -> Option<&'static str> {
        match self {
            DatumType::UInt8 => Some("8"),
            DatumType::UInt16 => Some("16"),
            DatumType::UInt32 => Some("32"),
            DatumType::UInt64 => Some("64"),
            DatumType::Boolean => Some("Bool"),
            DatumType::Pointer => Some("Ptr"),
            DatumType::Unknown => None,
        }
    }

    /// Storage size in bytes for fixed width types. `VOID*` sizes depend on the value.
    pub fn fixed_size(self) -> Option<u32> {
        match self {
            DatumType::UInt8 | DatumType::Boolean => Some(1),
            DatumType::UInt16 => Some(2),
            DatumType::UInt32 => Some(4),
            DatumType::UInt64 => Some(8),
            DatumType::Pointer | DatumType::Unknown => None,
        }
    }
}

impl From<&str> for DatumType {
    fn from(value: &str) -> Self {
        DatumType::from_name(value)
    }
}

impl From<String> for DatumType {
    fn from(value: String) -> Self {
        DatumType::from_name(&value)
    }
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_is_a_range_over_declaration_order() {
        assert!(DatumType::UInt8.is_valid());
        assert!(DatumType::Boolean.is_valid());
        assert!(DatumType::Pointer.is_valid());
        assert!(!DatumType::Unknown.is_valid());

        assert!(DatumType::UInt64.is_numeric());
        assert!(!DatumType::Boolean.is_numeric());
        assert!(!DatumType::Pointer.is_numeric());
    }

    #[test]
    fn names_are_matched_case_insensitively() {
        assert_eq!(DatumType::from_name("uint16"), DatumType::UInt16);
        assert_eq!(DatumType::from_name("Boolean"), DatumType::Boolean);
        assert_eq!(DatumType::from_name("void*"), DatumType::Pointer);
        assert_eq!(DatumType::from_name(" UINT64 "), DatumType::UInt64);
    }

    #[test]
    fn unrecognized_names_become_unknown() {
        assert_eq!(DatumType::from_name("UINT128"), DatumType::Unknown);
        assert_eq!(DatumType::from_name(""), DatumType::Unknown);
        assert_eq!(DatumType::from_name("VOID"), DatumType::Unknown);
        assert_eq!(DatumType::Unknown.c_type(), None);
        assert_eq!(DatumType::Unknown.mode_infix(), None);
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(DatumType::UInt8.fixed_size(), Some(1));
        assert_eq!(DatumType::UInt16.fixed_size(), Some(2));
        assert_eq!(DatumType::UInt32.fixed_size(), Some(4));
        assert_eq!(DatumType::UInt64.fixed_size(), Some(8));
        assert_eq!(DatumType::Boolean.fixed_size(), Some(1));
        assert_eq!(DatumType::Pointer.fixed_size(), None);
    }
}
