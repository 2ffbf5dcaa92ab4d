//! PCD token resolution and AutoGen generation
//!
//! This crate holds the Platform Configuration Database (PCD) model of a
//! firmware build. Tokens are registered in a [`TokenRegistry`] together with
//! their SKU values and the usage instance of every module that consumes them.
//! Once ingestion is complete the registry generates, per module, the
//! `AutoGen.h` declarations and `AutoGen.c` definitions that give C code access
//! to each PCD according to its binding type.
//!
//! ```
//! use patina_pcd::{
//!     AutoGenConfig, BindingType, DatumType, SkuInstance, Token, TokenKey, TokenRegistry, UsageIdentification,
//!     UsageInstance, ValueVariant,
//! };
//!
//! let key = TokenKey::parse("PcdDebugPropertyMask", Some("914AEBE7-4635-459B-AA1C-11E219B03A10")).unwrap();
//! let mut token = Token::new(key.clone(), DatumType::UInt8, 1);
//! token.add_sku(SkuInstance::new(0, ValueVariant::Default("0x0".into()))).unwrap();
//!
//! let mut registry = TokenRegistry::new();
//! registry.add_token(token).unwrap();
//!
//! let module = UsageIdentification::new("DxeCore", "MdeModulePkg", "X64");
//! registry.register_usage(UsageInstance::new(key, module.clone(), BindingType::FixedAtBuild, "0x2F", 1)).unwrap();
//!
//! let text = registry.module_autogen(&module.key(), &AutoGenConfig::new()).unwrap();
//! assert!(text.header.contains("#define _PCD_VALUE_PcdDebugPropertyMask  0x2F\r\n"));
//! ```
//!
//! ## Features
//!
//! - `std` (default): the YAML [`description`] loader and the `pcd_autogen`
//!   binary.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod autogen;
pub mod binding;
pub mod datum;
pub mod error;
pub mod guid;
pub mod literal;
pub mod registry;
pub mod sku;
pub mod token;
pub mod usage;

#[cfg(feature = "std")]
pub mod description;

pub use autogen::{AutoGenConfig, AutoGenText, LineEnding};
pub use binding::{BindingSet, BindingType};
pub use datum::DatumType;
pub use error::{ErrorClass, PcdError, PcdResult};
pub use registry::{DynamicTokenInfo, TokenRegistry};
pub use sku::{HiiDefault, SkuInstance, SkuSet, ValueVariant, VpdRegion, DEFAULT_SKU_ID};
pub use token::{Token, TokenKey};
pub use usage::{UsageIdentification, UsageInstance};
