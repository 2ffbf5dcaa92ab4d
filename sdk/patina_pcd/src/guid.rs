//! Token space guid helpers.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{format, string::String};
use r_efi::efi;
use uuid::Uuid;

use crate::error::{PcdError, PcdResult};

/// Key component used for tokens without a token space guid.
pub const NULL_TOKEN_SPACE: &str = "nullTokenSpaceGuid";

/// Parses a registry format guid (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, any case).
pub fn parse_guid(text: &str) -> PcdResult<Uuid> {
    Uuid::parse_str(text.trim()).map_err(|_| PcdError::InvalidGuid { text: text.into() })
}

/// Lower case guid text with `-` replaced by `_`, usable inside C identifiers.
pub fn symbol_fragment(guid: &Uuid) -> String {
    guid.hyphenated().encode_lower(&mut Uuid::encode_buffer()).replace('-', "_")
}

/// Name of the `EFI_GUID` symbol that scopes DynamicEx accesses.
pub fn token_space_symbol(guid: &Uuid) -> String {
    format!("_gPcd_TokenSpaceGuid_{}", symbol_fragment(guid))
}

/// Converts a UUID to an EFI GUID.
fn guid_from_uuid(uuid: &Uuid) -> efi::Guid {
    let (time_low, time_mid, time_hi, clock_seq_and_node) = uuid.as_fields();
    let node = [
        clock_seq_and_node[2],
        clock_seq_and_node[3],
        clock_seq_and_node[4],
        clock_seq_and_node[5],
        clock_seq_and_node[6],
        clock_seq_and_node[7],
    ];
    efi::Guid::from_fields(time_low, time_mid, time_hi, clock_seq_and_node[0], clock_seq_and_node[1], &node)
}

/// C initializer for an `EFI_GUID`, e.g. `{0x12345678, 0x1234, 0x1234, {0x12, ...}}`.
pub fn c_initializer(guid: &Uuid) -> String {
    let efi_guid = guid_from_uuid(guid);
    let (d1, d2, d3, d4, d5, node) = efi_guid.as_fields();
    format!(
        "{{0x{d1:08x}, 0x{d2:04x}, 0x{d3:04x}, {{0x{d4:02x}, 0x{d5:02x}, 0x{:02x}, 0x{:02x}, 0x{:02x}, 0x{:02x}, 0x{:02x}, 0x{:02x}}}}}",
        node[0], node[1], node[2], node[3], node[4], node[5]
    )
}
