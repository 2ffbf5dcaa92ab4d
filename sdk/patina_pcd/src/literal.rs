//! Literal handling for PCD values.
//!
//! Values arrive from package and platform descriptions as raw text. This
//! module classifies that text, decides whether it is the zero value of its
//! datum type, converts `VOID*` strings to byte arrays and computes the byte
//! size a value occupies.
//!
//! `VOID*` values take one of three shapes:
//!
//! - `L"..."` unicode string, two bytes per UTF-16 code unit
//! - `"..."` ASCII string, one byte per character
//! - `{0x01, 0x02}` byte array, one byte per element
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{format, string::String, vec::Vec};
use num_traits::Num;

use crate::{
    datum::DatumType,
    error::{PcdError, PcdResult},
};

/// The syntactic shape of a `VOID*` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLiteral<'a> {
    /// `L"..."`, holding the text between the quotes.
    Unicode(&'a str),
    /// `"..."`, holding the text between the quotes.
    Ascii(&'a str),
    /// `{...}`, holding the text between the braces.
    ByteArray(&'a str),
}

impl<'a> PointerLiteral<'a> {
    /// Classifies a literal. Unicode is checked before ASCII since both end in a quote.
    pub fn classify(literal: &'a str) -> Option<Self> {
        let literal = literal.trim();
        if let Some(text) = literal.strip_prefix("L\"").and_then(|rest| rest.strip_suffix('"')) {
            return Some(PointerLiteral::Unicode(text));
        }
        if let Some(text) = literal.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            return Some(PointerLiteral::Ascii(text));
        }
        literal.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')).map(PointerLiteral::ByteArray)
    }

    /// Like [`PointerLiteral::classify`], but reports unknown shapes as an error.
    ///
    /// Byte array elements must each be a decimal or `0x` value that fits a byte.
    pub fn parse(literal: &'a str) -> PcdResult<Self> {
        let pointer =
            Self::classify(literal).ok_or_else(|| PcdError::InvalidPointerLiteral { literal: literal.into() })?;
        for element in pointer.elements() {
            if element.is_empty() {
                return Err(PcdError::InvalidPointerLiteral { literal: literal.trim().into() });
            }
            parse_unsigned::<u8>(element, DatumType::UInt8)?;
        }
        Ok(pointer)
    }

    /// Byte array elements, with surrounding whitespace removed. Empty for string shapes.
    fn elements(&self) -> Vec<&'a str> {
        match self {
            PointerLiteral::ByteArray(body) if !body.trim().is_empty() => body.split(',').map(str::trim).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of bytes the value occupies.
    pub fn size(&self) -> u32 {
        match self {
            PointerLiteral::Unicode(text) => text.encode_utf16().count() as u32 * 2,
            PointerLiteral::Ascii(text) => text.len() as u32,
            PointerLiteral::ByteArray(_) => self.elements().len() as u32,
        }
    }

    /// The bytes of a string shape. Byte arrays return `None`; their elements are kept verbatim.
    fn string_bytes(&self) -> Option<Vec<u8>> {
        match self {
            PointerLiteral::Unicode(text) => Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            PointerLiteral::Ascii(text) => Some(text.as_bytes().to_vec()),
            PointerLiteral::ByteArray(_) => None,
        }
    }

    /// Returns true for an empty string, or a byte array holding exactly one zero element.
    ///
    /// A byte array with more than one element is never null, even when every
    /// element is zero. An empty byte array is not null either.
    pub fn is_null(&self) -> bool {
        match self {
            PointerLiteral::Unicode(text) | PointerLiteral::Ascii(text) => text.is_empty(),
            PointerLiteral::ByteArray(_) => match self.elements().as_slice() {
                [single] => is_zero_element(single),
                _ => false,
            },
        }
    }
}

/// `(0x|0X)?0+`
fn is_zero_element(element: &str) -> bool {
    let digits = element.strip_prefix("0x").or_else(|| element.strip_prefix("0X")).unwrap_or(element);
    !digits.is_empty() && digits.bytes().all(|digit| digit == b'0')
}

/// Converts a `VOID*` literal to its `{0xhh, 0xhh}` byte array form.
///
/// Byte arrays are returned unchanged.
pub fn to_byte_array(literal: &str) -> PcdResult<String> {
    let pointer = PointerLiteral::parse(literal)?;
    match pointer.string_bytes() {
        Some(bytes) => Ok(render_bytes(&bytes)),
        None => Ok(literal.trim().into()),
    }
}

fn render_bytes(bytes: &[u8]) -> String {
    let body = bytes.iter().map(|byte| format!("0x{byte:02x}")).collect::<Vec<_>>().join(", ");
    format!("{{{body}}}")
}

/// Size in bytes of a `VOID*` literal. An empty literal is zero bytes.
pub fn pointer_size(literal: &str) -> PcdResult<u32> {
    if literal.trim().is_empty() {
        return Ok(0);
    }
    Ok(PointerLiteral::parse(literal)?.size())
}

/// Splits a numeric literal into its digits and radix.
fn split_radix(literal: &str) -> PcdResult<(&str, u32)> {
    let literal = literal.trim();
    let (digits, radix) = match literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (literal, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(PcdError::InvalidNumericLiteral { literal: literal.into() });
    }
    Ok((digits, radix))
}

/// Parses a decimal or `0x` hexadecimal literal into `T`.
///
/// Grammar failures are [`PcdError::InvalidNumericLiteral`]; well formed values
/// that do not fit are [`PcdError::ValueOutOfRange`].
pub fn parse_unsigned<T: Num>(literal: &str, datum: DatumType) -> PcdResult<T> {
    let (digits, radix) = split_radix(literal)?;
    T::from_str_radix(digits, radix)
        .map_err(|_| PcdError::ValueOutOfRange { literal: literal.trim().into(), datum: datum.name() })
}

/// Returns true if a well formed numeric literal has the value zero.
///
/// Works on the digits directly, so values of any width are accepted.
pub fn is_zero_numeric(literal: &str) -> PcdResult<bool> {
    let (digits, _) = split_radix(literal)?;
    Ok(digits.bytes().all(|digit| digit == b'0'))
}

/// Decides whether `literal` is the zero value of `datum`.
pub fn is_null_value(datum: DatumType, literal: &str) -> PcdResult<bool> {
    match datum {
        DatumType::UInt8 | DatumType::UInt16 | DatumType::UInt32 | DatumType::UInt64 => is_zero_numeric(literal),
        DatumType::Boolean => Ok(literal.trim().eq_ignore_ascii_case("false")),
        DatumType::Pointer => {
            let literal = literal.trim();
            if literal.is_empty() || literal == "\"\"" || literal == "L\"\"" {
                return Ok(true);
            }
            Ok(PointerLiteral::parse(literal)?.is_null())
        }
        DatumType::Unknown => Err(PcdError::InvalidDatumType { token: String::new() }),
    }
}

/// Parses a `TRUE` / `FALSE` literal, ignoring case.
pub fn parse_boolean(literal: &str) -> PcdResult<bool> {
    let literal = literal.trim();
    if literal.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(PcdError::InvalidBooleanLiteral { literal: literal.into() })
    }
}
