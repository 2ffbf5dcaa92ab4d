//! Executable for generating the PCD section of a module's AutoGen files.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use clap::Parser;
use log::{LevelFilter, Metadata, Record};
use patina_pcd::{description::PlatformDescription, AutoGenConfig};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, Write},
    path::PathBuf,
};

#[derive(Parser, Debug)]
struct Args {
    /// Path for the YAML platform description.
    input_path: PathBuf,
    /// Name of the module to generate for.
    #[arg(short, long, required_unless_present = "dynamic")]
    module: Option<String>,
    /// Architecture of the module, when the description builds it for more than one.
    #[arg(short, long)]
    arch: Option<String>,
    /// Optional path for a YAML generation config.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Optional path for the header output. If not specified, the header is printed to stdout.
    #[arg(long)]
    header_path: Option<PathBuf>,
    /// Optional path for the source output. If not specified, the source is printed to stdout.
    #[arg(long)]
    source_path: Option<PathBuf>,
    /// Print dynamic token inventory instead of module text.
    #[arg(long, default_value_t = false)]
    dynamic: bool,
    /// Increase log verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;
impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}
static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));

    let platform = PlatformDescription::from_reader(File::open(&args.input_path)?)?;
    let config = match &args.config {
        Some(path) => serde_yaml::from_reader::<File, AutoGenConfig>(File::open(path)?)?,
        None => AutoGenConfig::new(),
    };
    let registry = platform.build_registry()?;

    if args.dynamic {
        return write_inventory(&registry, &mut io::stdout());
    }

    let name = args.module.as_deref().unwrap_or_default();
    let module = platform
        .module(name, args.arch.as_deref())
        .ok_or_else(|| format!("module {} is not in {}", name, args.input_path.display()))?;
    let text = registry.module_autogen(&module.usage_id()?.key(), &module.autogen_config(config))?;

    // Write to standard out if no output file is specified.
    match args.header_path {
        Some(path) => fs::write(path, &text.header)?,
        None => io::stdout().write_all(text.header.as_bytes())?,
    };
    match args.source_path {
        Some(path) => fs::write(path, &text.source)?,
        None => io::stdout().write_all(text.source.as_bytes())?,
    };

    Ok(())
}

fn write_inventory<W: Write>(registry: &patina_pcd::TokenRegistry, out: &mut W) -> Result<(), Box<dyn Error>> {
    for info in registry.dynamic_tokens()? {
        let ex_number = info.dynamic_ex_token_number.map(|number| format!("{number:#x}")).unwrap_or_else(|| "-".into());
        writeln!(
            out,
            "{:>4} {:>10} {:<8} {:>4} sku={} hii={} vpd={} default={} {}",
            info.token_number,
            ex_number,
            info.datum_type.name(),
            info.datum_size,
            info.sku_enabled,
            info.hii_enabled,
            info.vpd_enabled,
            info.has_default_value,
            info.key,
        )?;
    }
    Ok(())
}
