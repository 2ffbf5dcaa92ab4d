//! PCD binding types.
//!
//! The binding type decides when a PCD value becomes final: at compile time
//! (`FeatureFlag`, `FixedAtBuild`), at image patch time (`PatchableInModule`) or
//! at runtime through the PCD database (`Dynamic`, `DynamicEx`).
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::string::String;
use core::fmt;

/// How a PCD value is bound in a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize)]
#[serde(from = "String")]
pub enum BindingType {
    /// Compile time boolean switch.
    FeatureFlag,
    /// Compile time constant.
    FixedAtBuild,
    /// Module global that can be patched in the binary image.
    PatchableInModule,
    /// Runtime value looked up by token number.
    Dynamic,
    /// Runtime value looked up by token space guid and token number.
    DynamicEx,
    /// Unrecognized binding type. Never valid.
    #[default]
    Unknown,
}

const ALL: [BindingType; 5] = [
    BindingType::FeatureFlag,
    BindingType::FixedAtBuild,
    BindingType::PatchableInModule,
    BindingType::Dynamic,
    BindingType::DynamicEx,
];

impl BindingType {
    /// Returns true for every binding type except [`BindingType::Unknown`].
    pub fn is_valid(self) -> bool {
        BindingType::FeatureFlag <= self && self <= BindingType::DynamicEx
    }

    /// Returns true for `Dynamic` and `DynamicEx`.
    pub fn is_dynamic(self) -> bool {
        matches!(self, BindingType::Dynamic | BindingType::DynamicEx)
    }

    /// Case-insensitive lookup accepting both `FIXED_AT_BUILD` and `FixedAtBuild`
    /// spellings. Unrecognized names map to [`BindingType::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        ALL.into_iter()
            .find(|binding| binding.name().eq_ignore_ascii_case(name) || binding.item_name().eq_ignore_ascii_case(name))
            .unwrap_or(BindingType::Unknown)
    }

    /// The upper case name used in platform descriptions and generated comments.
    pub fn name(self) -> &'static str {
        match self {
            BindingType::FeatureFlag => "FEATURE_FLAG",
            BindingType::FixedAtBuild => "FIXED_AT_BUILD",
            BindingType::PatchableInModule => "PATCHABLE_IN_MODULE",
            BindingType::Dynamic => "DYNAMIC",
            BindingType::DynamicEx => "DYNAMIC_EX",
            BindingType::Unknown => "UNKNOWN",
        }
    }

    /// The item name used in module surface area documents.
    pub fn item_name(self) -> &'static str {
        match self {
            BindingType::FeatureFlag => "FeatureFlag",
            BindingType::FixedAtBuild => "FixedAtBuild",
            BindingType::PatchableInModule => "PatchableInModule",
            BindingType::Dynamic => "Dynamic",
            BindingType::DynamicEx => "DynamicEx",
            BindingType::Unknown => "Unknown",
        }
    }
}

impl From<&str> for BindingType {
    fn from(value: &str) -> Self {
        BindingType::from_name(value)
    }
}

impl From<String> for BindingType {
    fn from(value: String) -> Self {
        BindingType::from_name(&value)
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of binding types a token has been used with.
///
/// Membership only: inserting a binding type twice has no effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingSet(u8);

impl BindingSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    fn bit(binding: BindingType) -> u8 {
        1 << binding as u8
    }

    /// Adds a binding type. Returns false if it was already present.
    pub fn insert(&mut self, binding: BindingType) -> bool {
        let present = self.contains(binding);
        self.0 |= Self::bit(binding);
        !present
    }

    /// Returns true if the binding type is in the set.
    pub fn contains(&self, binding: BindingType) -> bool {
        self.0 & Self::bit(binding) != 0
    }

    /// Returns true if `Dynamic` or `DynamicEx` is in the set.
    pub fn has_dynamic(&self) -> bool {
        self.contains(BindingType::Dynamic) || self.contains(BindingType::DynamicEx)
    }

    /// Number of binding types in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if no binding type has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = BindingType> + '_ {
        ALL.into_iter().chain(core::iter::once(BindingType::Unknown)).filter(|binding| self.contains(*binding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn validity_and_dynamic_group() {
        assert!(BindingType::FeatureFlag.is_valid());
        assert!(BindingType::DynamicEx.is_valid());
        assert!(!BindingType::Unknown.is_valid());

        assert!(BindingType::Dynamic.is_dynamic());
        assert!(BindingType::DynamicEx.is_dynamic());
        assert!(!BindingType::PatchableInModule.is_dynamic());
        assert!(!BindingType::Unknown.is_dynamic());
    }

    #[test]
    fn both_spellings_are_recognized() {
        assert_eq!(BindingType::from_name("FIXED_AT_BUILD"), BindingType::FixedAtBuild);
        assert_eq!(BindingType::from_name("fixedatbuild"), BindingType::FixedAtBuild);
        assert_eq!(BindingType::from_name("dynamic_ex"), BindingType::DynamicEx);
        assert_eq!(BindingType::from_name("PatchableInModule"), BindingType::PatchableInModule);
        assert_eq!(BindingType::from_name("DYNAMIC_HII"), BindingType::Unknown);
    }

    #[test]
    fn binding_set_is_a_set() {
        let mut set = BindingSet::new();
        assert!(set.is_empty());
        assert!(set.insert(BindingType::FixedAtBuild));
        assert!(!set.insert(BindingType::FixedAtBuild));
        assert_eq!(set.len(), 1);
        assert!(!set.has_dynamic());

        assert!(set.insert(BindingType::DynamicEx));
        assert!(set.has_dynamic());
        assert_eq!(set.iter().collect::<Vec<_>>(), [BindingType::FixedAtBuild, BindingType::DynamicEx]);
    }
}
