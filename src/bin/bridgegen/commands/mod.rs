//! Command implementations

pub mod generate;
pub mod list;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::LayoutArgs;
use bridgegen::bindings::ScannerKind;
use bridgegen::util::config::{Config, CONFIG_FILE};

/// Resolve the working root and load the config with flag overrides applied.
pub(crate) fn load_config(args: &LayoutArgs) -> Result<(PathBuf, Config)> {
    let root = match args.root {
        Some(ref root) => root.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_or_default(&root.join(CONFIG_FILE)),
    };

    if let Some(ref entry) = args.entry {
        config.library.entry = entry.clone();
    }
    if !args.include_dirs.is_empty() {
        config.library.include_dirs = args.include_dirs.clone();
    }
    if let Some(ref scanner) = args.scanner {
        config.scan.scanner = scanner.parse::<ScannerKind>()?;
    }

    Ok((root, config))
}
