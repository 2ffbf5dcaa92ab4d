//! The token registry of a build session.
//!
//! The registry is owned by the caller. It is filled while package and module
//! descriptions are ingested (`&mut TokenRegistry`) and then only read while
//! text is generated (`&TokenRegistry`), which lets several generators share it
//! once ingestion is complete.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{collections::BTreeMap, format, string::String, vec::Vec};
use uuid::Uuid;

use crate::{
    autogen::{join_lines, AutoGenConfig, AutoGenText},
    binding::BindingType,
    datum::DatumType,
    error::{PcdError, PcdResult},
    guid,
    token::{Token, TokenKey},
    usage::UsageInstance,
};

/// What the PCD database generator needs to know about a dynamic token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicTokenInfo {
    /// Primary key of the token.
    pub key: TokenKey,
    /// Build assigned token number.
    pub token_number: u32,
    /// Platform assigned token number, for DynamicEx tokens.
    pub dynamic_ex_token_number: Option<u32>,
    /// Datum type.
    pub datum_type: DatumType,
    /// Size of the value in bytes.
    pub datum_size: u32,
    /// Used as `DynamicEx` by at least one module.
    pub is_dynamic_ex: bool,
    /// More than one SKU value.
    pub sku_enabled: bool,
    /// Any SKU is backed by an HII variable.
    pub hii_enabled: bool,
    /// Any SKU is backed by the VPD region.
    pub vpd_enabled: bool,
    /// The database must hold an initial value.
    pub has_default_value: bool,
}

/// Tokens of one build session, keyed by primary key.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<TokenKey, Token>,
    next_token_number: u32,
}

impl TokenRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { tokens: BTreeMap::new(), next_token_number: 1 }
    }

    /// Adds a token and assigns it the next build token number.
    pub fn add_token(&mut self, mut token: Token) -> PcdResult<u32> {
        if self.tokens.contains_key(token.key()) {
            return Err(PcdError::DuplicateToken { token: token.key().primary_key() });
        }
        // A registry built through `Default` starts counting at zero.
        let number = self.next_token_number.max(1);
        self.next_token_number = number + 1;
        token.set_token_number(number);
        log::debug!("Registered PCD {} as token {}.", token.key(), number);
        self.tokens.insert(token.key().clone(), token);
        Ok(number)
    }

    /// Looks up a token.
    pub fn token(&self, key: &TokenKey) -> Option<&Token> {
        self.tokens.get(key)
    }

    /// Looks up a token for modification.
    pub fn token_mut(&mut self, key: &TokenKey) -> Option<&mut Token> {
        self.tokens.get_mut(key)
    }

    /// Looks up a token by its primary key string.
    pub fn find(&self, primary_key: &str) -> Option<&Token> {
        self.tokens.values().find(|token| token.key().primary_key() == primary_key)
    }

    /// Iterates tokens in build token number order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        let mut tokens: Vec<&Token> = self.tokens.values().collect();
        tokens.sort_by_key(|token| token.token_number());
        tokens.into_iter()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no token has been added.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Registers a usage on the token it refers to.
    ///
    /// Returns `Ok(false)` when the token already has a usage with the same
    /// identity; the token is left unchanged.
    pub fn register_usage(&mut self, usage: UsageInstance) -> PcdResult<bool> {
        let key = usage.token_key().clone();
        let token =
            self.tokens.get_mut(&key).ok_or_else(|| PcdError::TokenNotFound { token: key.primary_key() })?;
        Ok(token.add_usage(usage))
    }

    /// Generates the text for the usage of `key` by the module `usage_key`.
    pub fn generate(&self, key: &TokenKey, usage_key: &str, config: &AutoGenConfig) -> PcdResult<Option<AutoGenText>> {
        let token = self.tokens.get(key).ok_or_else(|| PcdError::TokenNotFound { token: key.primary_key() })?;
        token.usage(usage_key).map(|usage| usage.generate_autogen(token, config)).transpose()
    }

    /// Generates the complete PCD section of one module's AutoGen files.
    ///
    /// Fragments are emitted in build token number order, followed in the
    /// header by the token space guids referenced through DynamicEx. Driver
    /// builds also define those guids in the source.
    pub fn module_autogen(&self, usage_key: &str, config: &AutoGenConfig) -> PcdResult<AutoGenText> {
        let mut text = AutoGenText::default();
        let mut token_spaces: BTreeMap<String, Uuid> = BTreeMap::new();

        for token in self.tokens() {
            let Some(usage) = token.usage(usage_key) else {
                continue;
            };
            text.append(&usage.generate_autogen(token, config)?);
            if usage.binding_type() == BindingType::DynamicEx {
                if let Some(guid) = token.token_space() {
                    token_spaces.insert(guid::token_space_symbol(guid), *guid);
                }
            }
        }

        let mut declarations = Vec::new();
        let mut definitions = Vec::new();
        for (symbol, guid) in &token_spaces {
            declarations.push(format!("extern EFI_GUID {symbol};"));
            if !config.library {
                definitions.push(format!(
                    "GLOBAL_REMOVE_IF_UNREFERENCED EFI_GUID {symbol} = {};",
                    guid::c_initializer(guid)
                ));
            }
        }
        text.header.push_str(&join_lines(&declarations, config.line_ending));
        text.source.push_str(&join_lines(&definitions, config.line_ending));
        Ok(text)
    }

    /// Dynamic tokens in build token number order.
    pub fn dynamic_tokens(&self) -> PcdResult<Vec<DynamicTokenInfo>> {
        self.tokens()
            .filter(|token| token.is_dynamic())
            .map(|token| {
                let datum_size = match token.datum_size() {
                    Some(size) => size,
                    None => token.pointer_type_sizes()?.into_iter().max().unwrap_or(0),
                };
                Ok(DynamicTokenInfo {
                    key: token.key().clone(),
                    token_number: token.token_number(),
                    dynamic_ex_token_number: token.dynamic_ex_token_number(),
                    datum_type: token.datum_type(),
                    datum_size,
                    is_dynamic_ex: token.supported_binding_types().contains(BindingType::DynamicEx),
                    sku_enabled: token.is_sku_enabled(),
                    hii_enabled: token.is_hii_enabled(),
                    vpd_enabled: token.is_vpd_enabled(),
                    has_default_value: token.has_default_value()?,
                })
            })
            .collect()
    }
}
