//! Module usages of a PCD.
//!
//! A [`UsageInstance`] is one module's binding of a token to a binding type and
//! a configured value. It is responsible for generating the module's accessor
//! text for that token.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{format, string::String};
use uuid::Uuid;

use crate::{
    autogen::{AccessorTemplate, AutoGenConfig, AutoGenText, Setter, Storage},
    binding::BindingType,
    datum::DatumType,
    error::{PcdError, PcdResult},
    guid,
    literal,
    token::{Token, TokenKey},
};

/// Identity of a consuming module build: module, package, version and architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsageIdentification {
    /// Base name of the module.
    pub module_name: String,
    /// File guid of the module.
    pub module_guid: Option<Uuid>,
    /// Name of the package the module belongs to.
    pub package_name: String,
    /// Guid of the package.
    pub package_guid: Option<Uuid>,
    /// Module version.
    pub version: String,
    /// Target architecture, e.g. `X64`.
    pub arch: String,
}

impl UsageIdentification {
    /// Creates an identity without guids or version.
    pub fn new(module_name: impl Into<String>, package_name: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            package_name: package_name.into(),
            arch: arch.into(),
            ..Default::default()
        }
    }

    /// Sets the module guid.
    pub fn with_module_guid(mut self, guid: Uuid) -> Self {
        self.module_guid = Some(guid);
        self
    }

    /// Sets the package guid.
    pub fn with_package_guid(mut self, guid: Uuid) -> Self {
        self.package_guid = Some(guid);
        self
    }

    /// Sets the module version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The string the usage is registered under in its token.
    pub fn key(&self) -> String {
        let guid_text = |guid: &Option<Uuid>| match guid {
            Some(guid) => format!("{}", guid.hyphenated()),
            None => String::new(),
        };
        format!(
            "{}_{}_{}_{}_{}_{}",
            self.module_name,
            guid_text(&self.module_guid),
            self.package_name,
            guid_text(&self.package_guid),
            self.version,
            self.arch
        )
    }
}

/// One module's use of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageInstance {
    token_key: TokenKey,
    usage_id: UsageIdentification,
    binding_type: BindingType,
    datum: String,
    max_datum_size: u32,
}

impl UsageInstance {
    /// Creates a usage of the token identified by `token_key`.
    pub fn new(
        token_key: TokenKey,
        usage_id: UsageIdentification,
        binding_type: BindingType,
        datum: impl Into<String>,
        max_datum_size: u32,
    ) -> Self {
        Self { token_key, usage_id, binding_type, datum: datum.into(), max_datum_size }
    }

    /// Key of the token this usage belongs to.
    pub fn token_key(&self) -> &TokenKey {
        &self.token_key
    }

    /// The consuming module.
    pub fn usage_id(&self) -> &UsageIdentification {
        &self.usage_id
    }

    /// Registration key, see [`UsageIdentification::key`].
    pub fn usage_key(&self) -> String {
        self.usage_id.key()
    }

    /// The binding type chosen by the module.
    pub fn binding_type(&self) -> BindingType {
        self.binding_type
    }

    /// The configured literal.
    pub fn datum(&self) -> &str {
        &self.datum
    }

    /// The maximum size declared by the module, zero if none.
    pub fn max_datum_size(&self) -> u32 {
        self.max_datum_size
    }

    /// Generates the header and source fragments for this usage.
    ///
    /// `token` must be the token the usage belongs to. Unknown datum or binding
    /// types, and values that do not validate, fail the whole usage.
    pub fn generate_autogen(&self, token: &Token, config: &AutoGenConfig) -> PcdResult<AutoGenText> {
        let template = self.accessor_template(token)?;
        log::trace!(
            "Generating {} accessors of PCD {} for {}.",
            self.binding_type,
            token.key(),
            self.usage_id.module_name
        );
        Ok(template.render(config))
    }

    fn accessor_template(&self, token: &Token) -> PcdResult<AccessorTemplate> {
        if token.key() != &self.token_key {
            return Err(PcdError::UsageTokenMismatch {
                usage: self.token_key.primary_key(),
                token: token.key().primary_key(),
            });
        }

        let datum = token.datum_type();
        let (Some(c_type), Some(mode), Some(call)) = (datum.c_type(), datum.mode_infix(), datum.library_suffix()) else {
            return Err(PcdError::InvalidDatumType { token: token.key().primary_key() });
        };
        let name = token.c_name();
        let pointer = datum == DatumType::Pointer;

        let template = match self.binding_type {
            BindingType::FeatureFlag => {
                if datum != DatumType::Boolean {
                    return Err(PcdError::BindingDatumMismatch {
                        token: token.key().primary_key(),
                        binding: self.binding_type.name(),
                        datum: datum.name(),
                    });
                }
                token.validate_datum(&self.datum, self.max_datum_size)?;
                let symbol = format!("_gPcd_FixedAtBuild_{name}");
                AccessorTemplate {
                    name: name.into(),
                    binding: self.binding_type,
                    token_number: token.token_number(),
                    mode,
                    value: Some(self.value_text(datum)?),
                    patchable_size: None,
                    storage: Some(Storage { symbol: symbol.clone(), c_type, constant: true, array_len: None }),
                    getter: symbol,
                    setter: Setter::Rejected,
                }
            }
            BindingType::FixedAtBuild => {
                token.validate_datum(&self.datum, self.max_datum_size)?;
                let symbol = format!("_gPcd_FixedAtBuild_{name}");
                let value = self.value_text(datum)?;
                let (storage, getter) = if pointer {
                    let len = literal::pointer_size(&value)?;
                    (
                        Storage { symbol: symbol.clone(), c_type: "UINT8", constant: true, array_len: Some(len) },
                        format!("(VOID *){symbol}"),
                    )
                } else {
                    (Storage { symbol: symbol.clone(), c_type, constant: true, array_len: None }, symbol)
                };
                AccessorTemplate {
                    name: name.into(),
                    binding: self.binding_type,
                    token_number: token.token_number(),
                    mode,
                    value: Some(value),
                    patchable_size: None,
                    storage: Some(storage),
                    getter,
                    setter: Setter::Rejected,
                }
            }
            BindingType::PatchableInModule => {
                token.validate_datum(&self.datum, self.max_datum_size)?;
                let symbol = format!("_gPcd_BinaryPatch_{name}");
                let value = self.value_text(datum)?;
                if pointer {
                    let size = token.effective_max_size(self.max_datum_size)?.max(literal::pointer_size(&value)?);
                    AccessorTemplate {
                        name: name.into(),
                        binding: self.binding_type,
                        token_number: token.token_number(),
                        mode,
                        value: Some(value),
                        patchable_size: Some(size),
                        storage: Some(Storage {
                            symbol: symbol.clone(),
                            c_type: "UINT8",
                            constant: false,
                            array_len: Some(size),
                        }),
                        getter: format!("(VOID *){symbol}"),
                        setter: Setter::Buffer(format!(
                            "LibPatchPcdSetPtr ({symbol}, (UINTN)_PCD_PATCHABLE_{name}_SIZE, (SizeOfBuffer), (Buffer))"
                        )),
                    }
                } else {
                    AccessorTemplate {
                        name: name.into(),
                        binding: self.binding_type,
                        token_number: token.token_number(),
                        mode,
                        value: Some(value),
                        patchable_size: None,
                        storage: Some(Storage { symbol: symbol.clone(), c_type, constant: false, array_len: None }),
                        getter: symbol.clone(),
                        setter: Setter::Scalar(format!("({symbol} = (Value))")),
                    }
                }
            }
            BindingType::Dynamic => AccessorTemplate {
                name: name.into(),
                binding: self.binding_type,
                token_number: token.token_number(),
                mode,
                value: None,
                patchable_size: None,
                storage: None,
                getter: format!("LibPcdGet{call}(_PCD_TOKEN_{name})"),
                setter: if pointer {
                    Setter::Buffer(format!("LibPcdSet{call}(_PCD_TOKEN_{name}, (SizeOfBuffer), (Buffer))"))
                } else {
                    Setter::Scalar(format!("LibPcdSet{call}(_PCD_TOKEN_{name}, (Value))"))
                },
            },
            BindingType::DynamicEx => {
                let token_number = token
                    .dynamic_ex_token_number()
                    .ok_or_else(|| PcdError::MissingTokenNumber { token: token.key().primary_key() })?;
                let token_space = token
                    .token_space()
                    .map(guid::token_space_symbol)
                    .ok_or_else(|| PcdError::MissingTokenSpace { token: token.key().primary_key() })?;
                AccessorTemplate {
                    name: name.into(),
                    binding: self.binding_type,
                    token_number,
                    mode,
                    value: None,
                    patchable_size: None,
                    storage: None,
                    getter: format!("LibPcdGetEx{call}(&{token_space}, _PCD_TOKEN_{name})"),
                    setter: if pointer {
                        Setter::Buffer(format!(
                            "LibPcdSetEx{call}(&{token_space}, _PCD_TOKEN_{name}, (SizeOfBuffer), (Buffer))"
                        ))
                    } else {
                        Setter::Scalar(format!("LibPcdSetEx{call}(&{token_space}, _PCD_TOKEN_{name}, (Value))"))
                    },
                }
            }
            BindingType::Unknown => return Err(PcdError::InvalidBindingType { token: token.key().primary_key() }),
        };
        Ok(template)
    }

    /// The value substituted into `_PCD_VALUE_`.
    fn value_text(&self, datum: DatumType) -> PcdResult<String> {
        let literal = self.datum.trim();
        match datum {
            DatumType::UInt64 => Ok(format!("{literal}ULL")),
            DatumType::Boolean => Ok(if literal::parse_boolean(literal)? { "TRUE" } else { "FALSE" }.into()),
            DatumType::Pointer => match literal::to_byte_array(if literal.is_empty() { "\"\"" } else { literal })? {
                bytes if bytes == "{}" => Ok("{0x00}".into()),
                bytes => Ok(bytes),
            },
            _ => Ok(literal.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        autogen::LineEnding,
        sku::{SkuInstance, ValueVariant},
    };
    use indoc::indoc;

    const TOKEN_SPACE: &str = "914AEBE7-4635-459B-AA1C-11E219B03A10";

    fn lf() -> AutoGenConfig {
        AutoGenConfig::new().with_line_ending(LineEnding::Lf)
    }

    fn module() -> UsageIdentification {
        UsageIdentification::new("PlatformDxe", "MdeModulePkg", "X64").with_version("1.0")
    }

    fn token(name: &str, datum: DatumType, max: u32, default: &str) -> Token {
        let mut token = Token::new(TokenKey::parse(name, Some(TOKEN_SPACE)).unwrap(), datum, max);
        token.add_sku(SkuInstance::new(0, ValueVariant::Default(default.into()))).unwrap();
        token.set_token_number(7);
        token
    }

    fn usage(token: &Token, binding: BindingType, datum: &str, max: u32) -> UsageInstance {
        UsageInstance::new(token.key().clone(), module(), binding, datum, max)
    }

    #[test]
    fn usage_key_joins_every_component() {
        let guid = guid::parse_guid(TOKEN_SPACE).unwrap();
        let id = UsageIdentification::new("PcdDxe", "MdePkg", "IA32").with_module_guid(guid).with_version("0x10");
        assert_eq!(id.key(), "PcdDxe_914aebe7-4635-459b-aa1c-11e219b03a10_MdePkg__0x10_IA32");
        assert_ne!(id.key(), UsageIdentification::new("PcdDxe", "MdePkg", "X64").key());
    }

    #[test]
    fn feature_flag() {
        let token = token("PcdVerifyNodeInList", DatumType::Boolean, 1, "FALSE");
        let text = usage(&token, BindingType::FeatureFlag, "true", 1).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdVerifyNodeInList  7U
                #define _PCD_VALUE_PcdVerifyNodeInList  TRUE
                extern const BOOLEAN _gPcd_FixedAtBuild_PcdVerifyNodeInList;
                #define _PCD_GET_MODE_BOOL_PcdVerifyNodeInList  _gPcd_FixedAtBuild_PcdVerifyNodeInList
                //#define _PCD_SET_MODE_BOOL_PcdVerifyNodeInList  ASSERT(FALSE) // It is not allowed to set value for a FEATURE_FLAG PCD
            "}
        );
        assert_eq!(
            text.source,
            "GLOBAL_REMOVE_IF_UNREFERENCED const BOOLEAN _gPcd_FixedAtBuild_PcdVerifyNodeInList = _PCD_VALUE_PcdVerifyNodeInList;\n"
        );
    }

    #[test]
    fn feature_flag_requires_boolean() {
        let token = token("PcdMaxSize", DatumType::UInt32, 4, "0");
        let err = usage(&token, BindingType::FeatureFlag, "1", 4).generate_autogen(&token, &lf()).unwrap_err();
        assert!(matches!(err, PcdError::BindingDatumMismatch { binding: "FEATURE_FLAG", datum: "UINT32", .. }));
    }

    #[test]
    fn fixed_at_build_uint64_gets_width_suffix() {
        let token = token("PcdMaximumLength", DatumType::UInt64, 8, "0");
        let text = usage(&token, BindingType::FixedAtBuild, "0x100000000", 8).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdMaximumLength  7U
                #define _PCD_VALUE_PcdMaximumLength  0x100000000ULL
                extern const UINT64 _gPcd_FixedAtBuild_PcdMaximumLength;
                #define _PCD_GET_MODE_64_PcdMaximumLength  _gPcd_FixedAtBuild_PcdMaximumLength
                //#define _PCD_SET_MODE_64_PcdMaximumLength  ASSERT(FALSE) // It is not allowed to set value for a FIXED_AT_BUILD PCD
            "}
        );
    }

    #[test]
    fn only_uint64_gets_width_suffix() {
        let token = token("PcdMaximumLength", DatumType::UInt32, 4, "0");
        let text = usage(&token, BindingType::FixedAtBuild, "0x1000", 4).generate_autogen(&token, &lf()).unwrap();
        assert!(text.header.contains("#define _PCD_VALUE_PcdMaximumLength  0x1000\n"));
    }

    #[test]
    fn fixed_at_build_pointer_string_is_converted_to_an_array() {
        let token = token("PcdFirmwareVendor", DatumType::Pointer, 16, "L\"\"");
        let text = usage(&token, BindingType::FixedAtBuild, "L\"EDK\"", 16).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdFirmwareVendor  7U
                #define _PCD_VALUE_PcdFirmwareVendor  {0x45, 0x00, 0x44, 0x00, 0x4b, 0x00}
                extern const UINT8 _gPcd_FixedAtBuild_PcdFirmwareVendor[6];
                #define _PCD_GET_MODE_PTR_PcdFirmwareVendor  (VOID *)_gPcd_FixedAtBuild_PcdFirmwareVendor
                //#define _PCD_SET_MODE_PTR_PcdFirmwareVendor  ASSERT(FALSE) // It is not allowed to set value for a FIXED_AT_BUILD PCD
            "}
        );
        assert_eq!(
            text.source,
            "GLOBAL_REMOVE_IF_UNREFERENCED const UINT8 _gPcd_FixedAtBuild_PcdFirmwareVendor[6] = _PCD_VALUE_PcdFirmwareVendor;\n"
        );
    }

    #[test]
    fn fixed_at_build_byte_array_passes_through() {
        let token = token("PcdDefaultTerminalType", DatumType::Pointer, 4, "{0x0}");
        let text =
            usage(&token, BindingType::FixedAtBuild, "{0x1, 0x2, 0x3}", 4).generate_autogen(&token, &lf()).unwrap();
        assert!(text.header.contains("#define _PCD_VALUE_PcdDefaultTerminalType  {0x1, 0x2, 0x3}\n"));
        assert!(text.header.contains("extern const UINT8 _gPcd_FixedAtBuild_PcdDefaultTerminalType[3];\n"));
    }

    #[test]
    fn malformed_byte_array_fails_generation() {
        let token = token("PcdBootLogo", DatumType::Pointer, 0, "{0x0}");
        for (value, expected) in [
            ("{0x1FF, 0x2}", "ValueOutOfRange"),
            ("{0x1, zz}", "InvalidNumericLiteral"),
            ("{0x1,, 0x2}", "InvalidPointerLiteral"),
            ("{0x1, 0x2, }", "InvalidPointerLiteral"),
        ] {
            for binding in [BindingType::FixedAtBuild, BindingType::PatchableInModule] {
                let err = usage(&token, binding, value, 0).generate_autogen(&token, &lf()).unwrap_err();
                assert!(format!("{err:?}").starts_with(expected), "{value} as {binding}: {err:?}");
            }
        }
    }

    #[test]
    fn fixed_at_build_pointer_without_declared_max_follows_the_value() {
        let token = token("PcdPlatformName", DatumType::Pointer, 0, "\"ab\"");
        let text = usage(&token, BindingType::FixedAtBuild, "\"abcd\"", 0).generate_autogen(&token, &lf()).unwrap();
        assert!(text.header.contains("extern const UINT8 _gPcd_FixedAtBuild_PcdPlatformName[4];\n"));
    }

    #[test]
    fn empty_pointer_value_keeps_one_byte() {
        let token = token("PcdEmpty", DatumType::Pointer, 4, "\"\"");
        let text = usage(&token, BindingType::FixedAtBuild, "\"\"", 4).generate_autogen(&token, &lf()).unwrap();
        assert!(text.header.contains("#define _PCD_VALUE_PcdEmpty  {0x00}\n"));
        assert!(text.header.contains("extern const UINT8 _gPcd_FixedAtBuild_PcdEmpty[1];\n"));
    }

    #[test]
    fn patchable_scalar() {
        let token = token("PcdDebugPrintErrorLevel", DatumType::UInt32, 4, "0");
        let text =
            usage(&token, BindingType::PatchableInModule, "0x80000000", 4).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdDebugPrintErrorLevel  7U
                #define _PCD_VALUE_PcdDebugPrintErrorLevel  0x80000000
                extern UINT32 _gPcd_BinaryPatch_PcdDebugPrintErrorLevel;
                #define _PCD_GET_MODE_32_PcdDebugPrintErrorLevel  _gPcd_BinaryPatch_PcdDebugPrintErrorLevel
                #define _PCD_SET_MODE_32_PcdDebugPrintErrorLevel(Value)  (_gPcd_BinaryPatch_PcdDebugPrintErrorLevel = (Value))
            "}
        );
        assert_eq!(
            text.source,
            "GLOBAL_REMOVE_IF_UNREFERENCED UINT32 _gPcd_BinaryPatch_PcdDebugPrintErrorLevel = _PCD_VALUE_PcdDebugPrintErrorLevel;\n"
        );
    }

    #[test]
    fn patchable_pointer_is_sized_to_declared_max() {
        let token = token("PcdPlatformName", DatumType::Pointer, 0, "\"\"");
        let text =
            usage(&token, BindingType::PatchableInModule, "\"Qemu\"", 32).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdPlatformName  7U
                #define _PCD_VALUE_PcdPlatformName  {0x51, 0x65, 0x6d, 0x75}
                #define _PCD_PATCHABLE_PcdPlatformName_SIZE 32
                extern UINT8 _gPcd_BinaryPatch_PcdPlatformName[32];
                #define _PCD_GET_MODE_PTR_PcdPlatformName  (VOID *)_gPcd_BinaryPatch_PcdPlatformName
                #define _PCD_SET_MODE_PTR_PcdPlatformName(SizeOfBuffer, Buffer)  LibPatchPcdSetPtr (_gPcd_BinaryPatch_PcdPlatformName, (UINTN)_PCD_PATCHABLE_PcdPlatformName_SIZE, (SizeOfBuffer), (Buffer))
            "}
        );
        assert_eq!(
            text.source,
            "GLOBAL_REMOVE_IF_UNREFERENCED UINT8 _gPcd_BinaryPatch_PcdPlatformName[32] = _PCD_VALUE_PcdPlatformName;\n"
        );
    }

    #[test]
    fn patchable_pointer_larger_than_max_is_rejected() {
        let token = token("PcdPlatformName", DatumType::Pointer, 2, "\"\"");
        let err =
            usage(&token, BindingType::PatchableInModule, "\"Qemu\"", 0).generate_autogen(&token, &lf()).unwrap_err();
        assert_eq!(err, PcdError::ValueTooLarge { token: token.key().primary_key(), size: 4, max: 2 });
    }

    #[test]
    fn dynamic_uses_build_token_number() {
        let mut token = token("PcdConOutRow", DatumType::UInt32, 4, "25");
        token.set_dynamic_ex_token_number(0x30001);
        let text = usage(&token, BindingType::Dynamic, "", 4).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdConOutRow  7U
                #define _PCD_GET_MODE_32_PcdConOutRow  LibPcdGet32(_PCD_TOKEN_PcdConOutRow)
                #define _PCD_SET_MODE_32_PcdConOutRow(Value)  LibPcdSet32(_PCD_TOKEN_PcdConOutRow, (Value))
            "}
        );
        assert!(text.source.is_empty());
    }

    #[test]
    fn dynamic_pointer_setter_takes_a_buffer() {
        let token = token("PcdBootLogo", DatumType::Pointer, 16, "{0x0}");
        let text = usage(&token, BindingType::Dynamic, "", 16).generate_autogen(&token, &lf()).unwrap();
        assert!(text.header.contains(
            "#define _PCD_SET_MODE_PTR_PcdBootLogo(SizeOfBuffer, Buffer)  LibPcdSetPtr(_PCD_TOKEN_PcdBootLogo, (SizeOfBuffer), (Buffer))\n"
        ));
    }

    #[test]
    fn dynamic_ex_uses_platform_token_number_and_token_space() {
        let mut token = token("PcdSetupMode", DatumType::Boolean, 1, "FALSE");
        token.set_dynamic_ex_token_number(0x30001);
        let text = usage(&token, BindingType::DynamicEx, "", 1).generate_autogen(&token, &lf()).unwrap();
        assert_eq!(
            text.header,
            indoc! {"
                #define _PCD_TOKEN_PcdSetupMode  196609U
                #define _PCD_GET_MODE_BOOL_PcdSetupMode  LibPcdGetExBool(&_gPcd_TokenSpaceGuid_914aebe7_4635_459b_aa1c_11e219b03a10, _PCD_TOKEN_PcdSetupMode)
                #define _PCD_SET_MODE_BOOL_PcdSetupMode(Value)  LibPcdSetExBool(&_gPcd_TokenSpaceGuid_914aebe7_4635_459b_aa1c_11e219b03a10, _PCD_TOKEN_PcdSetupMode, (Value))
            "}
        );
        assert!(text.source.is_empty());
    }

    #[test]
    fn dynamic_ex_needs_platform_number_and_token_space() {
        let token_without_number = token("PcdSetupMode", DatumType::Boolean, 1, "FALSE");
        let err = usage(&token_without_number, BindingType::DynamicEx, "", 1)
            .generate_autogen(&token_without_number, &lf())
            .unwrap_err();
        assert!(matches!(err, PcdError::MissingTokenNumber { .. }));

        let mut null_space = Token::new(TokenKey::new("PcdSetupMode", None), DatumType::Boolean, 1);
        null_space.set_dynamic_ex_token_number(1);
        let err = UsageInstance::new(null_space.key().clone(), module(), BindingType::DynamicEx, "", 1)
            .generate_autogen(&null_space, &lf())
            .unwrap_err();
        assert!(matches!(err, PcdError::MissingTokenSpace { .. }));
    }

    #[test]
    fn unknown_types_fail_generation() {
        let unknown_datum = token("PcdBroken", DatumType::Unknown, 0, "0");
        for binding in [BindingType::FixedAtBuild, BindingType::Dynamic, BindingType::DynamicEx] {
            let err = usage(&unknown_datum, binding, "0", 0).generate_autogen(&unknown_datum, &lf()).unwrap_err();
            assert!(matches!(err, PcdError::InvalidDatumType { .. }));
        }

        let token = token("PcdBroken", DatumType::UInt8, 1, "0");
        let err = usage(&token, BindingType::Unknown, "0", 1).generate_autogen(&token, &lf()).unwrap_err();
        assert!(matches!(err, PcdError::InvalidBindingType { .. }));
    }

    #[test]
    fn malformed_value_fails_generation() {
        let token = token("PcdSerialBaud", DatumType::UInt32, 4, "0");
        let err =
            usage(&token, BindingType::FixedAtBuild, "115200baud", 4).generate_autogen(&token, &lf()).unwrap_err();
        assert!(matches!(err, PcdError::InvalidNumericLiteral { .. }));
        let err =
            usage(&token, BindingType::FixedAtBuild, "0x1FFFFFFFF", 4).generate_autogen(&token, &lf()).unwrap_err();
        assert!(matches!(err, PcdError::ValueOutOfRange { .. }));
    }

    #[test]
    fn generation_is_idempotent() {
        let token = token("PcdPlatformName", DatumType::Pointer, 16, "\"\"");
        let usage = usage(&token, BindingType::PatchableInModule, "L\"Qemu\"", 16);
        let first = usage.generate_autogen(&token, &AutoGenConfig::default()).unwrap();
        let second = usage.generate_autogen(&token, &AutoGenConfig::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.header.contains("\r\n"));
    }

    #[test]
    fn usage_must_match_token() {
        let other = token("PcdB", DatumType::UInt8, 1, "0");
        let token = token("PcdA", DatumType::UInt8, 1, "0");
        let err = usage(&other, BindingType::FixedAtBuild, "1", 1).generate_autogen(&token, &lf()).unwrap_err();
        assert!(matches!(err, PcdError::UsageTokenMismatch { .. }));
    }
}
