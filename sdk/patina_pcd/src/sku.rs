//! SKU values of a PCD.
//!
//! A token carries one value per SKU. Sku 0 is the default and must exist
//! before the token can be sized or generated. Each value is supplied either
//! as a literal, as the default of an HII variable, or as an offset into the
//! VPD region.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{string::String, vec::Vec};
use uuid::Uuid;

/// Id of the default SKU.
pub const DEFAULT_SKU_ID: u32 = 0;

/// An HII variable backing a dynamic PCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiiDefault {
    /// Name of the UEFI variable.
    pub variable_name: String,
    /// Vendor guid of the UEFI variable.
    pub variable_guid: Uuid,
    /// Offset of the value inside the variable.
    pub variable_offset: u32,
    /// Value used when the variable does not exist.
    pub default: String,
}

/// A location in the VPD region backing a dynamic PCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VpdRegion {
    /// Offset of the value inside the VPD region.
    pub offset: u32,
}

/// How the value for one SKU is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueVariant {
    /// A literal value.
    Default(String),
    /// The default of an HII variable.
    Hii(HiiDefault),
    /// A VPD region reference.
    Vpd(VpdRegion),
}

impl ValueVariant {
    /// The literal of a [`ValueVariant::Default`]. HII and VPD values are resolved at runtime.
    pub fn literal(&self) -> Option<&str> {
        match self {
            ValueVariant::Default(literal) => Some(literal),
            ValueVariant::Hii(_) | ValueVariant::Vpd(_) => None,
        }
    }

    /// Returns true for HII and VPD backed values.
    pub fn is_runtime_resolved(&self) -> bool {
        !matches!(self, ValueVariant::Default(_))
    }
}

/// The value of a PCD for one SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuInstance {
    /// Sku id, 0 for the default.
    pub id: u32,
    /// The value for this SKU.
    pub value: ValueVariant,
}

impl SkuInstance {
    /// Creates a sku instance.
    pub fn new(id: u32, value: ValueVariant) -> Self {
        Self { id, value }
    }
}

/// Ordered SKU values with at most one entry per sku id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuSet {
    skus: Vec<SkuInstance>,
}

impl SkuSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { skus: Vec::new() }
    }

    /// Appends a sku. Returns the rejected instance if its id is already present.
    pub fn insert(&mut self, sku: SkuInstance) -> Result<(), SkuInstance> {
        if self.get(sku.id).is_some() {
            return Err(sku);
        }
        self.skus.push(sku);
        Ok(())
    }

    /// Looks up the value for a sku id.
    pub fn get(&self, id: u32) -> Option<&SkuInstance> {
        self.skus.iter().find(|sku| sku.id == id)
    }

    /// The sku 0 entry, if present.
    pub fn default_sku(&self) -> Option<&SkuInstance> {
        self.get(DEFAULT_SKU_ID)
    }

    /// Iterates skus in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, SkuInstance> {
        self.skus.iter()
    }

    /// Number of skus.
    pub fn len(&self) -> usize {
        self.skus.len()
    }

    /// Returns true if no sku has been added.
    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }

    /// More than one sku means the value varies per SKU.
    pub fn is_sku_enabled(&self) -> bool {
        self.skus.len() > 1
    }
}

impl<'a> IntoIterator for &'a SkuSet {
    type Item = &'a SkuInstance;
    type IntoIter = core::slice::Iter<'a, SkuInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.skus.iter()
    }
}
