//! Error type for PCD token resolution and AutoGen generation.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::string::String;
use core::fmt;

/// Broad grouping of [`PcdError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A datum type, binding type or literal shape that is not usable. Fatal for the token.
    Classification,
    /// A literal that does not follow the numeric or boolean grammar.
    Parse,
    /// Ingested state that breaks a token invariant. Points at an upstream ingestion bug.
    Consistency,
    /// A request the registry declined without changing any state.
    Rejection,
    /// A token that is not present in the registry.
    Lookup,
}

/// Errors produced while validating, sizing or generating text for a PCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcdError {
    /// The token has no valid datum type.
    InvalidDatumType {
        /// Primary key of the token.
        token: String,
    },
    /// The binding type cannot be used to generate accessors.
    InvalidBindingType {
        /// Primary key of the token.
        token: String,
    },
    /// The binding type does not accept the token's datum type.
    BindingDatumMismatch {
        /// Primary key of the token.
        token: String,
        /// Binding type name.
        binding: &'static str,
        /// Datum type name.
        datum: &'static str,
    },
    /// A pointer literal is neither an ASCII string, a unicode string nor a byte array.
    InvalidPointerLiteral {
        /// The offending literal.
        literal: String,
    },
    /// A numeric literal does not follow the decimal or `0x` hexadecimal grammar.
    InvalidNumericLiteral {
        /// The offending literal.
        literal: String,
    },
    /// A boolean literal is neither `TRUE` nor `FALSE`.
    InvalidBooleanLiteral {
        /// The offending literal.
        literal: String,
    },
    /// A numeric literal does not fit the datum width.
    ValueOutOfRange {
        /// The offending literal.
        literal: String,
        /// Datum type name.
        datum: &'static str,
    },
    /// A pointer value is larger than the buffer reserved for it.
    ValueTooLarge {
        /// Primary key of the token.
        token: String,
        /// Size of the value in bytes.
        size: u32,
        /// Reserved size in bytes.
        max: u32,
    },
    /// The token has no sku 0 entry.
    MissingDefaultSku {
        /// Primary key of the token.
        token: String,
    },
    /// A sku id was supplied twice for the same token.
    DuplicateSku {
        /// Primary key of the token.
        token: String,
        /// The repeated sku id.
        sku: u32,
    },
    /// A token with the same primary key is already registered.
    DuplicateToken {
        /// Primary key of the token.
        token: String,
    },
    /// No token with the given primary key is registered.
    TokenNotFound {
        /// Primary key that was looked up.
        token: String,
    },
    /// A DynamicEx usage has no platform assigned token number.
    MissingTokenNumber {
        /// Primary key of the token.
        token: String,
    },
    /// A DynamicEx usage belongs to a token without a token space guid.
    MissingTokenSpace {
        /// Primary key of the token.
        token: String,
    },
    /// A usage instance was paired with a token it does not belong to.
    UsageTokenMismatch {
        /// Primary key recorded in the usage.
        usage: String,
        /// Primary key of the token it was paired with.
        token: String,
    },
    /// A guid string could not be parsed.
    InvalidGuid {
        /// The offending text.
        text: String,
    },
}

impl PcdError {
    /// Returns the class of the error.
    pub fn class(&self) -> ErrorClass {
        match self {
            PcdError::InvalidDatumType { .. }
            | PcdError::InvalidBindingType { .. }
            | PcdError::BindingDatumMismatch { .. }
            | PcdError::InvalidPointerLiteral { .. }
            | PcdError::ValueTooLarge { .. }
            | PcdError::MissingTokenNumber { .. }
            | PcdError::MissingTokenSpace { .. } => ErrorClass::Classification,
            PcdError::InvalidNumericLiteral { .. }
            | PcdError::InvalidBooleanLiteral { .. }
            | PcdError::ValueOutOfRange { .. }
            | PcdError::InvalidGuid { .. } => ErrorClass::Parse,
            PcdError::MissingDefaultSku { .. } | PcdError::UsageTokenMismatch { .. } => ErrorClass::Consistency,
            PcdError::DuplicateSku { .. } | PcdError::DuplicateToken { .. } => ErrorClass::Rejection,
            PcdError::TokenNotFound { .. } => ErrorClass::Lookup,
        }
    }
}

impl fmt::Display for PcdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcdError::InvalidDatumType { token } => write!(f, "PCD {token} has an unknown datum type"),
            PcdError::InvalidBindingType { token } => write!(f, "PCD {token} has an unknown binding type"),
            PcdError::BindingDatumMismatch { token, binding, datum } => {
                write!(f, "PCD {token}: {binding} does not accept datum type {datum}")
            }
            PcdError::InvalidPointerLiteral { literal } => write!(f, "Invalid VOID* literal: {literal}"),
            PcdError::InvalidNumericLiteral { literal } => write!(f, "Invalid numeric literal: {literal}"),
            PcdError::InvalidBooleanLiteral { literal } => write!(f, "Invalid BOOLEAN literal: {literal}"),
            PcdError::ValueOutOfRange { literal, datum } => write!(f, "Value {literal} does not fit in {datum}"),
            PcdError::ValueTooLarge { token, size, max } => {
                write!(f, "PCD {token}: value size {size} exceeds the maximum datum size {max}")
            }
            PcdError::MissingDefaultSku { token } => write!(f, "PCD {token} has no default (sku 0) value"),
            PcdError::DuplicateSku { token, sku } => write!(f, "PCD {token} already has a value for sku {sku}"),
            PcdError::DuplicateToken { token } => write!(f, "PCD {token} is already registered"),
            PcdError::TokenNotFound { token } => write!(f, "PCD {token} is not registered"),
            PcdError::MissingTokenNumber { token } => {
                write!(f, "PCD {token} is used as DynamicEx but has no platform token number")
            }
            PcdError::MissingTokenSpace { token } => {
                write!(f, "PCD {token} is used as DynamicEx but has no token space guid")
            }
            PcdError::UsageTokenMismatch { usage, token } => {
                write!(f, "Usage of PCD {usage} cannot be generated against PCD {token}")
            }
            PcdError::InvalidGuid { text } => write!(f, "Invalid guid: {text}"),
        }
    }
}

impl core::error::Error for PcdError {}

/// Result alias used throughout the crate.
pub type PcdResult<T> = Result<T, PcdError>;
