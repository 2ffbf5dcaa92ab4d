//! Platform descriptions.
//!
//! A platform description is a YAML document listing the PCD tokens declared by
//! the platform's packages and the PCDs each module consumes:
//!
//! ```yaml
//! tokens:
//!   - name: PcdDebugPropertyMask
//!     token_space: 914AEBE7-4635-459B-AA1C-11E219B03A10
//!     datum_type: UINT8
//!     max_size: 1
//!     skus:
//!       - id: 0
//!         value: "0x0"
//! modules:
//!   - name: DxeCore
//!     package: MdeModulePkg
//!     arch: X64
//!     pcds:
//!       - name: PcdDebugPropertyMask
//!         token_space: 914AEBE7-4635-459B-AA1C-11E219B03A10
//!         binding: FixedAtBuild
//!         value: "0x2F"
//! ```
//!
//! Each sku entry gives exactly one of `value`, `hii` or `vpd`.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use std::{fmt, io::Read};

use serde::Deserialize;

use crate::{
    autogen::AutoGenConfig,
    binding::BindingType,
    datum::DatumType,
    error::PcdError,
    guid,
    registry::TokenRegistry,
    sku::{HiiDefault, SkuInstance, ValueVariant, VpdRegion},
    token::{Token, TokenKey},
    usage::{UsageIdentification, UsageInstance},
};

/// Errors produced while loading a platform description.
#[derive(Debug)]
pub enum DescriptionError {
    /// The document is not valid YAML or does not match the description schema.
    Yaml(serde_yaml::Error),
    /// A sku entry does not give exactly one value source.
    InvalidSku {
        /// Name of the token.
        token: String,
        /// Sku id of the entry.
        sku: u32,
    },
    /// The description is well formed but rejected by the registry.
    Pcd(PcdError),
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionError::Yaml(err) => write!(f, "invalid platform description: {err}"),
            DescriptionError::InvalidSku { token, sku } => {
                write!(f, "sku {sku} of {token} must have exactly one of value, hii or vpd")
            }
            DescriptionError::Pcd(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DescriptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DescriptionError::Yaml(err) => Some(err),
            DescriptionError::Pcd(err) => Some(err),
            DescriptionError::InvalidSku { .. } => None,
        }
    }
}

impl From<serde_yaml::Error> for DescriptionError {
    fn from(err: serde_yaml::Error) -> Self {
        DescriptionError::Yaml(err)
    }
}

impl From<PcdError> for DescriptionError {
    fn from(err: PcdError) -> Self {
        DescriptionError::Pcd(err)
    }
}

/// An HII variable backing a sku value.
#[derive(Debug, Clone, Deserialize)]
pub struct HiiDescription {
    pub variable_name: String,
    pub variable_guid: String,
    #[serde(default)]
    pub variable_offset: u32,
    #[serde(default)]
    pub default: String,
}

/// A VPD region location backing a sku value.
#[derive(Debug, Clone, Deserialize)]
pub struct VpdDescription {
    pub offset: u32,
}

/// The value of a token for one sku.
#[derive(Debug, Clone, Deserialize)]
pub struct SkuDescription {
    #[serde(default)]
    pub id: u32,
    pub value: Option<String>,
    pub hii: Option<HiiDescription>,
    pub vpd: Option<VpdDescription>,
}

impl SkuDescription {
    fn to_instance(&self, token: &str) -> Result<SkuInstance, DescriptionError> {
        let value = match (&self.value, &self.hii, &self.vpd) {
            (Some(literal), None, None) => ValueVariant::Default(literal.clone()),
            (None, Some(hii), None) => ValueVariant::Hii(HiiDefault {
                variable_name: hii.variable_name.clone(),
                variable_guid: guid::parse_guid(&hii.variable_guid)?,
                variable_offset: hii.variable_offset,
                default: hii.default.clone(),
            }),
            (None, None, Some(vpd)) => ValueVariant::Vpd(VpdRegion { offset: vpd.offset }),
            _ => return Err(DescriptionError::InvalidSku { token: token.into(), sku: self.id }),
        };
        Ok(SkuInstance::new(self.id, value))
    }
}

/// A token declared by a package.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenDescription {
    pub name: String,
    pub token_space: Option<String>,
    pub datum_type: DatumType,
    #[serde(default)]
    pub max_size: u32,
    pub dynamic_ex_token_number: Option<u32>,
    #[serde(default)]
    pub skus: Vec<SkuDescription>,
}

impl TokenDescription {
    fn to_token(&self) -> Result<Token, DescriptionError> {
        let key = TokenKey::parse(self.name.as_str(), self.token_space.as_deref())?;
        let mut token = Token::new(key, self.datum_type, self.max_size);
        if let Some(number) = self.dynamic_ex_token_number {
            token.set_dynamic_ex_token_number(number);
        }
        for sku in &self.skus {
            token.add_sku(sku.to_instance(&self.name)?)?;
        }
        Ok(token)
    }
}

/// A module's use of one PCD.
#[derive(Debug, Clone, Deserialize)]
pub struct PcdUsageDescription {
    pub name: String,
    pub token_space: Option<String>,
    pub binding: BindingType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub max_size: u32,
}

/// A module build and the PCDs it consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescription {
    pub name: String,
    pub guid: Option<String>,
    pub package: String,
    pub package_guid: Option<String>,
    #[serde(default)]
    pub version: String,
    pub arch: String,
    /// The module is a library instance.
    #[serde(default)]
    pub library: bool,
    #[serde(default)]
    pub pcds: Vec<PcdUsageDescription>,
}

impl ModuleDescription {
    /// The identity the module's usages are registered under.
    pub fn usage_id(&self) -> Result<UsageIdentification, DescriptionError> {
        let mut id = UsageIdentification::new(self.name.as_str(), self.package.as_str(), self.arch.as_str())
            .with_version(self.version.as_str());
        if let Some(text) = &self.guid {
            id = id.with_module_guid(guid::parse_guid(text)?);
        }
        if let Some(text) = &self.package_guid {
            id = id.with_package_guid(guid::parse_guid(text)?);
        }
        Ok(id)
    }

    /// `config` with the library flag of this module applied.
    pub fn autogen_config(&self, config: AutoGenConfig) -> AutoGenConfig {
        config.with_library(self.library)
    }
}

/// A complete platform description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformDescription {
    #[serde(default)]
    pub tokens: Vec<TokenDescription>,
    #[serde(default)]
    pub modules: Vec<ModuleDescription>,
}

impl PlatformDescription {
    /// Parses a description from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, DescriptionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a description from a YAML reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DescriptionError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Looks up a module by name, optionally restricted to one architecture.
    pub fn module(&self, name: &str, arch: Option<&str>) -> Option<&ModuleDescription> {
        self.modules
            .iter()
            .find(|module| module.name == name && arch.map_or(true, |arch| module.arch.eq_ignore_ascii_case(arch)))
    }

    /// Registers every token, then every module usage, in document order.
    ///
    /// Duplicate usages are skipped with a warning; every other rejection
    /// fails the load.
    pub fn build_registry(&self) -> Result<TokenRegistry, DescriptionError> {
        let mut registry = TokenRegistry::new();
        for description in &self.tokens {
            registry.add_token(description.to_token()?)?;
        }
        for module in &self.modules {
            let usage_id = module.usage_id()?;
            for pcd in &module.pcds {
                let key = TokenKey::parse(pcd.name.as_str(), pcd.token_space.as_deref())?;
                let usage = UsageInstance::new(key, usage_id.clone(), pcd.binding, pcd.value.as_str(), pcd.max_size);
                if !registry.register_usage(usage)? {
                    log::warn!("Skipped duplicate use of {} in {}.", pcd.name, module.name);
                }
            }
        }
        log::info!("Loaded {} PCDs used by {} modules.", registry.len(), self.modules.len());
        Ok(registry)
    }
}
