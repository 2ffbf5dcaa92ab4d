//! PCD tokens.
//!
//! A [`Token`] is the registry record of one PCD: its identity, datum type,
//! declared size, SKU values and the usage instances of every module that
//! consumes it. Validation and sizing of values live here since they depend
//! only on token state.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{collections::BTreeMap, format, string::String, vec, vec::Vec};
use core::fmt;
use uuid::Uuid;

use crate::{
    binding::{BindingSet, BindingType},
    datum::DatumType,
    error::{PcdError, PcdResult},
    guid::{self, NULL_TOKEN_SPACE},
    literal::{self, PointerLiteral},
    sku::{SkuInstance, SkuSet, ValueVariant},
    usage::UsageInstance,
};

/// Primary key of a token: its C name and optional token space guid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenKey {
    c_name: String,
    token_space: Option<Uuid>,
}

impl TokenKey {
    /// Creates a key from an already parsed token space guid.
    pub fn new(c_name: impl Into<String>, token_space: Option<Uuid>) -> Self {
        Self { c_name: c_name.into(), token_space }
    }

    /// Creates a key from a guid string in registry format.
    pub fn parse(c_name: impl Into<String>, token_space: Option<&str>) -> PcdResult<Self> {
        let token_space = token_space.map(guid::parse_guid).transpose()?;
        Ok(Self::new(c_name, token_space))
    }

    /// The C name of the PCD.
    pub fn c_name(&self) -> &str {
        &self.c_name
    }

    /// The token space guid, if any.
    pub fn token_space(&self) -> Option<&Uuid> {
        self.token_space.as_ref()
    }

    /// `<cName>_<guid with underscores>` or `<cName>_nullTokenSpaceGuid`.
    ///
    /// The guid part is always lower case, so keys built from differently cased
    /// guid text compare equal.
    pub fn primary_key(&self) -> String {
        match &self.token_space {
            Some(guid) => format!("{}_{}", self.c_name, guid::symbol_fragment(guid)),
            None => format!("{}_{}", self.c_name, NULL_TOKEN_SPACE),
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary_key())
    }
}

/// The registry record of one PCD.
#[derive(Debug, Clone)]
pub struct Token {
    key: TokenKey,
    token_number: u32,
    dynamic_ex_token_number: Option<u32>,
    supported_bindings: BindingSet,
    datum_type: DatumType,
    max_datum_size: u32,
    datum_size: Option<u32>,
    skus: SkuSet,
    consumers: BTreeMap<String, UsageInstance>,
}

impl Token {
    /// Creates a token with no SKU values and no consumers.
    ///
    /// `max_datum_size` is the declared size; zero when the declaration gives none.
    pub fn new(key: TokenKey, datum_type: DatumType, max_datum_size: u32) -> Self {
        Self {
            key,
            token_number: 0,
            dynamic_ex_token_number: None,
            supported_bindings: BindingSet::new(),
            datum_type,
            max_datum_size,
            datum_size: None,
            skus: SkuSet::new(),
            consumers: BTreeMap::new(),
        }
    }

    /// The primary key.
    pub fn key(&self) -> &TokenKey {
        &self.key
    }

    /// The C name of the PCD.
    pub fn c_name(&self) -> &str {
        self.key.c_name()
    }

    /// The token space guid, if any.
    pub fn token_space(&self) -> Option<&Uuid> {
        self.key.token_space()
    }

    /// Build assigned token number. Zero until the token is registered.
    pub fn token_number(&self) -> u32 {
        self.token_number
    }

    pub(crate) fn set_token_number(&mut self, number: u32) {
        self.token_number = number;
    }

    /// Platform assigned token number used by DynamicEx accesses.
    pub fn dynamic_ex_token_number(&self) -> Option<u32> {
        self.dynamic_ex_token_number
    }

    /// Records the platform assigned token number.
    pub fn set_dynamic_ex_token_number(&mut self, number: u32) {
        self.dynamic_ex_token_number = Some(number);
    }

    /// The datum type.
    pub fn datum_type(&self) -> DatumType {
        self.datum_type
    }

    /// Overrides the datum type. Clears any computed datum size.
    pub fn set_datum_type(&mut self, datum_type: DatumType) {
        self.datum_type = datum_type;
        self.datum_size = None;
    }

    /// The declared maximum size in bytes, zero if none was declared.
    pub fn max_datum_size(&self) -> u32 {
        self.max_datum_size
    }

    /// Overrides the declared maximum size. Clears any computed datum size.
    pub fn set_max_datum_size(&mut self, size: u32) {
        self.max_datum_size = size;
        self.datum_size = None;
    }

    /// The size computed by [`Token::compute_datum_size`], `None` until then.
    pub fn datum_size(&self) -> Option<u32> {
        self.datum_size
    }

    /// Records a binding type used for this token. Returns false if it was already recorded.
    pub fn add_binding_type(&mut self, binding: BindingType) -> bool {
        self.supported_bindings.insert(binding)
    }

    /// Every binding type recorded so far.
    pub fn supported_binding_types(&self) -> BindingSet {
        self.supported_bindings
    }

    /// Returns true if the token has been used as `Dynamic` or `DynamicEx`.
    pub fn is_dynamic(&self) -> bool {
        self.supported_bindings.has_dynamic()
    }

    /// Adds the value for a SKU.
    pub fn add_sku(&mut self, sku: SkuInstance) -> PcdResult<()> {
        self.skus
            .insert(sku)
            .map_err(|rejected| PcdError::DuplicateSku { token: self.key.primary_key(), sku: rejected.id })?;
        self.datum_size = None;
        Ok(())
    }

    /// The SKU values.
    pub fn skus(&self) -> &SkuSet {
        &self.skus
    }

    /// More than one SKU value.
    pub fn is_sku_enabled(&self) -> bool {
        self.skus.is_sku_enabled()
    }

    /// Any SKU is backed by an HII variable.
    pub fn is_hii_enabled(&self) -> bool {
        self.skus.iter().any(|sku| matches!(sku.value, ValueVariant::Hii(_)))
    }

    /// Any SKU is backed by the VPD region.
    pub fn is_vpd_enabled(&self) -> bool {
        self.skus.iter().any(|sku| matches!(sku.value, ValueVariant::Vpd(_)))
    }

    /// The value of sku 0.
    ///
    /// A token without sku 0 was ingested incompletely; this is reported as
    /// [`PcdError::MissingDefaultSku`] and never papered over with an empty value.
    pub fn default_sku(&self) -> PcdResult<&ValueVariant> {
        match self.skus.default_sku() {
            Some(sku) => Ok(&sku.value),
            None => {
                log::error!("PCD {} has no default sku value.", self.key);
                Err(PcdError::MissingDefaultSku { token: self.key.primary_key() })
            }
        }
    }

    /// The sku 0 literal, `None` when sku 0 is HII or VPD backed.
    pub fn default_literal(&self) -> PcdResult<Option<&str>> {
        Ok(self.default_sku()?.literal())
    }

    /// Decides whether `literal` is the zero value of this token's datum type.
    pub fn is_null_value(&self, literal: &str) -> PcdResult<bool> {
        if !self.datum_type.is_valid() {
            return Err(PcdError::InvalidDatumType { token: self.key.primary_key() });
        }
        literal::is_null_value(self.datum_type, literal)
    }

    /// Returns true when the token carries a value the PCD database must hold.
    pub fn has_default_value(&self) -> PcdResult<bool> {
        if self.is_sku_enabled() {
            return Ok(true);
        }
        if !self.is_dynamic() {
            return Ok(false);
        }
        match self.default_sku()? {
            ValueVariant::Hii(_) | ValueVariant::Vpd(_) => Ok(true),
            ValueVariant::Default(literal) => Ok(!self.is_null_value(literal)?),
        }
    }

    fn default_pointer_shape(&self) -> PcdResult<Option<PointerLiteral<'_>>> {
        if self.datum_type != DatumType::Pointer {
            return Ok(None);
        }
        Ok(self.default_literal()?.and_then(PointerLiteral::classify))
    }

    /// The sku 0 value is a `L"..."` string.
    pub fn is_unicode_string_type(&self) -> PcdResult<bool> {
        Ok(matches!(self.default_pointer_shape()?, Some(PointerLiteral::Unicode(_))))
    }

    /// The sku 0 value is a `"..."` string.
    pub fn is_ascii_string_type(&self) -> PcdResult<bool> {
        Ok(matches!(self.default_pointer_shape()?, Some(PointerLiteral::Ascii(_))))
    }

    /// The sku 0 value is a `{...}` byte array.
    pub fn is_byte_stream_type(&self) -> PcdResult<bool> {
        Ok(matches!(self.default_pointer_shape()?, Some(PointerLiteral::ByteArray(_))))
    }

    /// Candidate sizes of a `VOID*` token: the declared maximum followed by the
    /// size of every literal SKU value in SKU order.
    ///
    /// HII and VPD values are resolved at runtime and add no entry. Fixed width
    /// tokens return their single width.
    pub fn pointer_type_sizes(&self) -> PcdResult<Vec<u32>> {
        self.default_sku()?;
        match self.datum_type {
            DatumType::Unknown => Err(PcdError::InvalidDatumType { token: self.key.primary_key() }),
            DatumType::Pointer => {
                let mut sizes = vec![self.max_datum_size];
                for literal in self.skus.iter().filter_map(|sku| sku.value.literal()) {
                    sizes.push(literal::pointer_size(literal)?);
                }
                Ok(sizes)
            }
            datum => Ok(datum.fixed_size().into_iter().collect()),
        }
    }

    /// Computes and caches the size the value occupies: the fixed width, or for
    /// `VOID*` the largest of [`Token::pointer_type_sizes`].
    pub fn compute_datum_size(&mut self) -> PcdResult<u32> {
        let size = self.pointer_type_sizes()?.into_iter().max().unwrap_or(0);
        log::debug!("PCD {} datum size is {}.", self.key, size);
        self.datum_size = Some(size);
        Ok(size)
    }

    /// The buffer size reserved for a `VOID*` value: `max_size` when given,
    /// otherwise the declared size, otherwise the largest SKU value.
    pub fn effective_max_size(&self, max_size: u32) -> PcdResult<u32> {
        if max_size > 0 {
            return Ok(max_size);
        }
        if self.max_datum_size > 0 {
            return Ok(self.max_datum_size);
        }
        match self.datum_size {
            Some(size) => Ok(size),
            None => Ok(self.pointer_type_sizes()?.into_iter().max().unwrap_or(0)),
        }
    }

    /// Checks that `literal` is a well formed value of the datum type that fits
    /// its width, or for `VOID*`, the declared maximum size.
    ///
    /// `max_size` is the maximum declared by the usage; when it is zero the
    /// token's declared size applies. Without either, any well formed `VOID*`
    /// value is accepted and its storage follows the value size.
    pub fn validate_datum(&self, literal: &str, max_size: u32) -> PcdResult<()> {
        match self.datum_type {
            DatumType::UInt8 => literal::parse_unsigned::<u8>(literal, self.datum_type).map(|_| ()),
            DatumType::UInt16 => literal::parse_unsigned::<u16>(literal, self.datum_type).map(|_| ()),
            DatumType::UInt32 => literal::parse_unsigned::<u32>(literal, self.datum_type).map(|_| ()),
            DatumType::UInt64 => literal::parse_unsigned::<u64>(literal, self.datum_type).map(|_| ()),
            DatumType::Boolean => literal::parse_boolean(literal).map(|_| ()),
            DatumType::Pointer => {
                let size = literal::pointer_size(literal)?;
                let max = if max_size > 0 { max_size } else { self.max_datum_size };
                if max > 0 && size > max {
                    return Err(PcdError::ValueTooLarge { token: self.key.primary_key(), size, max });
                }
                Ok(())
            }
            DatumType::Unknown => Err(PcdError::InvalidDatumType { token: self.key.primary_key() }),
        }
    }

    /// Registers a module's usage of this token and records its binding type.
    ///
    /// Returns false, leaving the token unchanged, if a usage with the same
    /// identity is already registered or the usage belongs to another token.
    pub fn add_usage(&mut self, usage: UsageInstance) -> bool {
        if usage.token_key() != &self.key {
            log::warn!("Usage of PCD {} cannot be registered on PCD {}.", usage.token_key(), self.key);
            return false;
        }
        let id = usage.usage_key();
        if self.consumers.contains_key(&id) {
            log::warn!("PCD {} already has a usage registered for {}.", self.key, id);
            return false;
        }
        self.supported_bindings.insert(usage.binding_type());
        log::debug!("PCD {} used as {} by {}.", self.key, usage.binding_type(), id);
        self.consumers.insert(id, usage);
        true
    }

    /// The usage registered under a usage identity key.
    pub fn usage(&self, usage_key: &str) -> Option<&UsageInstance> {
        self.consumers.get(usage_key)
    }

    /// Every registered usage, ordered by usage identity key.
    pub fn usages(&self) -> impl Iterator<Item = &UsageInstance> {
        self.consumers.values()
    }

    /// Number of registered usages.
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }
}
