//! Configuration file support for bridgegen.
//!
//! Every library-specific constant of the generator lives here. The
//! defaults target libvips, so running without a config file reproduces
//! the stock `vips.c`/`vips.def` pair.
//!
//! The config file is looked up as `bridgegen.toml` in the working root
//! unless `--config` names one explicitly. Command-line flags take
//! precedence over config values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bindings::errors::BridgeError;
use crate::bindings::scanner::ScannerKind;
use crate::bindings::types::FixedBridge;

/// Default config file name, relative to the working root.
pub const CONFIG_FILE: &str = "bridgegen.toml";

/// Deprecated or unsupported libvips entry points that are never bridged.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    "vips_path_filename7",
    "vips_path_mode7",
    "vips_object_set_required",
    "vips_region_dump_all",
    "vips_format_get_type",
    "vips_format_map",
    "vips_format_for_file",
    "vips_format_for_name",
    "vips_format_read",
    "vips_format_write",
    "vips_operation_call_valist",
];

/// bridgegen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library layout settings
    pub library: LibraryConfig,

    /// Header scanning settings
    pub scan: ScanConfig,

    /// Output settings
    pub emit: EmitConfig,
}

/// Where the library's headers live and how they reference each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Name written to the `LIBRARY` line of the definition file
    pub name: String,

    /// Umbrella header included at the top of the generated source
    pub umbrella: String,

    /// Include prefix marking the library's own headers (`#include <vips/...>`)
    pub include_prefix: String,

    /// Entry header that seeds the include traversal
    pub entry: PathBuf,

    /// Directories searched, in order, to resolve included headers
    pub include_dirs: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            name: "vips".to_string(),
            umbrella: "vips/vips.h".to_string(),
            include_prefix: "vips/".to_string(),
            entry: PathBuf::from("include/vips/vips.h"),
            include_dirs: vec![PathBuf::from("include/vips")],
        }
    }
}

/// How exported declarations are found.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Marker line preceding each exported declaration
    pub annotation: String,

    /// Declaration scanner strategy
    pub scanner: ScannerKind,

    /// Function names that are never bridged (exact match)
    pub deny: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            annotation: "VIPS_API".to_string(),
            scanner: ScannerKind::default(),
            deny: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// What the generated files look like and where they go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Platform export marker prefixed to every wrapper
    pub export_marker: String,

    /// Suffix appended to the original name to form the wrapper name
    pub suffix: String,

    /// Generated C source file
    pub source: PathBuf,

    /// Generated module-definition file
    pub definition: PathBuf,

    /// Hand-written wrappers appended after the generated ones
    pub fixed: Vec<FixedBridge>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            export_marker: "__declspec(dllexport)".to_string(),
            suffix: "_bridge".to_string(),
            source: PathBuf::from("vips.c"),
            definition: PathBuf::from("vips.def"),
            fixed: default_fixed_bridges(),
        }
    }
}

/// The two arities of `vips_cache`, which dispatches through
/// `vips_call_split` and so never appears as a plain declaration.
pub fn default_fixed_bridges() -> Vec<FixedBridge> {
    vec![
        FixedBridge {
            original: "vips_cache_fixed".to_string(),
            return_type: "int".to_string(),
            params: "VipsImage *in, VipsImage **out, \
                     const char* max_tiles_in_name, int max_tiles_in, \
                     const char* tile_height_in_name, int tile_height_in, \
                     const char* tile_width_in_name, int tile_width_in"
                .to_string(),
            body: "return vips_call_split(\"cache\", \
                   max_tiles_in_name, max_tiles_in, \
                   tile_height_in_name, tile_height_in, \
                   tile_width_in_name, tile_width_in, NULL, in, out);"
                .to_string(),
        },
        FixedBridge {
            original: "vips_cache".to_string(),
            return_type: "int".to_string(),
            params: "VipsImage *in, VipsImage **out".to_string(),
            body: "return vips_call_split(\"cache\", NULL, in, out);".to_string(),
        },
    ]
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Check values that would otherwise produce malformed output.
    pub fn validate(&self) -> std::result::Result<(), BridgeError> {
        let annotation = self.scan.annotation.trim();
        if annotation.is_empty() || annotation.contains(char::is_whitespace) {
            return Err(BridgeError::InvalidAnnotation {
                annotation: self.scan.annotation.clone(),
            });
        }

        let suffix = &self.emit.suffix;
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(BridgeError::InvalidSuffix {
                suffix: suffix.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_target_vips() {
        let config = Config::default();
        assert_eq!(config.library.name, "vips");
        assert_eq!(config.library.entry, PathBuf::from("include/vips/vips.h"));
        assert_eq!(config.scan.annotation, "VIPS_API");
        assert_eq!(config.scan.deny.len(), 11);
        assert_eq!(config.emit.suffix, "_bridge");
        assert_eq!(config.emit.fixed.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[library]
name = "mylib"

[scan]
annotation = "MYLIB_API"
scanner = "token"
"#,
        )
        .unwrap();

        assert_eq!(config.library.name, "mylib");
        assert_eq!(config.library.umbrella, "vips/vips.h");
        assert_eq!(config.scan.annotation, "MYLIB_API");
        assert_eq!(config.scan.scanner, ScannerKind::Token);
        assert_eq!(config.emit.export_marker, "__declspec(dllexport)");
    }

    #[test]
    fn test_fixed_bridges_from_toml() {
        let config: Config = toml::from_str(
            r#"
[[emit.fixed]]
original = "foo_cache"
return_type = "int"
params = "int a"
body = "return foo_call(a);"
"#,
        )
        .unwrap();

        assert_eq!(config.emit.fixed.len(), 1);
        assert_eq!(config.emit.fixed[0].original, "foo_cache");
    }

    #[test]
    fn test_validate_rejects_bad_suffix() {
        let mut config = Config::default();
        config.emit.suffix = "-bridge".to_string();
        assert!(matches!(
            config.validate(),
            Err(BridgeError::InvalidSuffix { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_annotation() {
        let mut config = Config::default();
        config.scan.annotation = "VIPS API".to_string();
        assert!(matches!(
            config.validate(),
            Err(BridgeError::InvalidAnnotation { .. })
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);

        assert_eq!(Config::load_or_default(&path).library.name, "vips");

        std::fs::write(&path, "[library\nname = ").unwrap();
        assert_eq!(Config::load_or_default(&path).library.name, "vips");

        std::fs::write(&path, "[library]\nname = \"other\"\n").unwrap();
        assert_eq!(Config::load_or_default(&path).library.name, "other");
    }
}
