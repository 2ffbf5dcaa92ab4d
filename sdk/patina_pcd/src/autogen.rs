//! AutoGen text rendering.
//!
//! Every usage instance is turned into an [`AccessorTemplate`], a record of the
//! symbols, values and accessor bodies for one PCD in one module. A single
//! renderer turns that record into the header (`AutoGen.h`) and source
//! (`AutoGen.c`) fragments, so all of the literal text consumed by the
//! downstream compiler lives in this file.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{format, string::String, vec::Vec};

use crate::binding::BindingType;

/// Line terminator of generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum LineEnding {
    /// `\n`
    #[serde(alias = "lf", alias = "LF")]
    Lf,
    /// `\r\n`, the EDK II AutoGen convention.
    #[default]
    #[serde(alias = "crlf", alias = "CRLF")]
    CrLf,
}

impl LineEnding {
    /// The terminator text.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Settings for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(default)]
pub struct AutoGenConfig {
    /// Generating for a library instance. Libraries only declare storage; the
    /// module linking them defines it.
    pub library: bool,
    /// Line terminator of generated text.
    pub line_ending: LineEnding,
}

impl AutoGenConfig {
    /// Driver build with `\r\n` line endings.
    pub const fn new() -> Self {
        Self { library: false, line_ending: LineEnding::CrLf }
    }

    /// Sets whether the module is a library instance.
    pub const fn with_library(mut self, library: bool) -> Self {
        self.library = library;
        self
    }

    /// Sets the line terminator.
    pub const fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}

/// Generated header and source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoGenText {
    /// Declarations and accessor macros for `AutoGen.h`.
    pub header: String,
    /// Storage definitions for `AutoGen.c`.
    pub source: String,
}

impl AutoGenText {
    /// Appends another fragment pair.
    pub fn append(&mut self, other: &AutoGenText) {
        self.header.push_str(&other.header);
        self.source.push_str(&other.source);
    }
}

/// Storage symbol owned by the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Storage {
    pub symbol: String,
    pub c_type: &'static str,
    pub constant: bool,
    pub array_len: Option<u32>,
}

impl Storage {
    fn declarator(&self) -> String {
        let qualifier = if self.constant { "const " } else { "" };
        match self.array_len {
            Some(len) => format!("{qualifier}{} {}[{len}]", self.c_type, self.symbol),
            None => format!("{qualifier}{} {}", self.c_type, self.symbol),
        }
    }
}

/// The `_PCD_SET_MODE_` accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Setter {
    /// Setting is not allowed; the macro is emitted commented out.
    Rejected,
    /// `(Value)` parameter.
    Scalar(String),
    /// `(SizeOfBuffer, Buffer)` parameters.
    Buffer(String),
}

/// Everything needed to render the accessors of one usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AccessorTemplate {
    pub name: String,
    pub binding: BindingType,
    pub token_number: u32,
    pub mode: &'static str,
    pub value: Option<String>,
    pub patchable_size: Option<u32>,
    pub storage: Option<Storage>,
    pub getter: String,
    pub setter: Setter,
}

impl AccessorTemplate {
    /// Renders the header and source fragments.
    pub fn render(&self, config: &AutoGenConfig) -> AutoGenText {
        let name = &self.name;
        let mode = self.mode;
        let mut header = Vec::new();
        let mut source = Vec::new();

        header.push(format!("#define _PCD_TOKEN_{name}  {}U", self.token_number));
        if let (Some(value), false) = (&self.value, config.library) {
            header.push(format!("#define _PCD_VALUE_{name}  {value}"));
        }
        if let Some(size) = self.patchable_size {
            header.push(format!("#define _PCD_PATCHABLE_{name}_SIZE {size}"));
        }
        if let Some(storage) = &self.storage {
            header.push(format!("extern {};", storage.declarator()));
            if !config.library {
                source.push(format!("GLOBAL_REMOVE_IF_UNREFERENCED {} = _PCD_VALUE_{name};", storage.declarator()));
            }
        }
        header.push(format!("#define _PCD_GET_MODE_{mode}_{name}  {}", self.getter));
        header.push(match &self.setter {
            Setter::Rejected => format!(
                "//#define _PCD_SET_MODE_{mode}_{name}  ASSERT(FALSE) // It is not allowed to set value for a {} PCD",
                self.binding.name()
            ),
            Setter::Scalar(body) => format!("#define _PCD_SET_MODE_{mode}_{name}(Value)  {body}"),
            Setter::Buffer(body) => format!("#define _PCD_SET_MODE_{mode}_{name}(SizeOfBuffer, Buffer)  {body}"),
        });

        AutoGenText { header: join_lines(&header, config.line_ending), source: join_lines(&source, config.line_ending) }
    }
}

/// Joins lines, terminating each one.
pub(crate) fn join_lines(lines: &[String], line_ending: LineEnding) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push_str(line_ending.as_str());
    }
    text
}
