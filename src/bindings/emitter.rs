//! Bridge module emission.
//!
//! Assembles the generated C source and the module-definition file from the
//! bridge records of every header plus the hand-written fixed bridges.

use std::path::Path;

use super::errors::{BridgeError, Result};
use super::template::{BridgeTemplates, WrapperSlots};
use super::types::{BridgeRecord, FixedBridge};
use crate::util::fs::write_string;

/// Contents of the two generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    /// C source with every wrapper definition
    pub source: String,
    /// Module-definition file mapping original names to wrappers
    pub definition: String,
}

/// Emitter for a bridge module.
#[derive(Debug, Clone)]
pub struct BridgeEmitter {
    /// `LIBRARY` name in the definition file
    library: String,
    /// Header included at the top of the source
    umbrella: String,
    /// Appended to fixed bridge names
    suffix: String,
    templates: BridgeTemplates,
}

impl BridgeEmitter {
    pub fn new(
        library: impl Into<String>,
        umbrella: impl Into<String>,
        templates: BridgeTemplates,
    ) -> Self {
        BridgeEmitter {
            library: library.into(),
            umbrella: umbrella.into(),
            suffix: "_bridge".to_string(),
            templates,
        }
    }

    /// Set the wrapper name suffix used for fixed bridges.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Render a hand-written bridge through the wrapper template.
    pub fn render_fixed(&self, fixed: &FixedBridge) -> Result<BridgeRecord> {
        let bridge = format!("{}{}", fixed.original, self.suffix);
        let source = self.templates.wrapper(WrapperSlots {
            return_type: &fixed.return_type,
            declarator: &bridge,
            params: &fixed.params,
            body: &fixed.body,
        })?;

        Ok(BridgeRecord {
            original: fixed.original.clone(),
            bridge,
            source,
        })
    }

    /// Build both output files.
    ///
    /// Generated wrappers come first, in record order, followed by the fixed
    /// ones. Each fixed mapping appears exactly once, after the generated
    /// mappings.
    pub fn emit(&self, records: &[BridgeRecord], fixed: &[FixedBridge]) -> Result<EmittedFiles> {
        let fixed = fixed
            .iter()
            .map(|f| self.render_fixed(f))
            .collect::<Result<Vec<_>>>()?;

        let mut source = self.templates.source_header(&self.umbrella)?;
        let bodies: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
        source.push_str(&bodies.join("\n"));
        for record in &fixed {
            source.push('\n');
            source.push_str(&record.source);
        }
        source.push('\n');

        let mut definition = self.templates.def_header(&self.library)?;
        for record in records.iter().chain(&fixed) {
            definition.push_str(&self.templates.def_entry(&record.original, &record.bridge)?);
        }

        Ok(EmittedFiles { source, definition })
    }

    /// Write the emitted files, creating parent directories as needed.
    pub fn write(&self, files: &EmittedFiles, source_path: &Path, def_path: &Path) -> Result<()> {
        for (path, contents) in [(source_path, &files.source), (def_path, &files.definition)] {
            write_string(path, contents).map_err(|source| BridgeError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!("wrote {} ({} bytes)", path.display(), contents.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::config::default_fixed_bridges;
    use tempfile::TempDir;

    fn emitter() -> BridgeEmitter {
        BridgeEmitter::new(
            "vips",
            "vips/vips.h",
            BridgeTemplates::new("__declspec(dllexport)").unwrap(),
        )
    }

    fn record(name: &str) -> BridgeRecord {
        BridgeRecord {
            original: name.to_string(),
            bridge: format!("{}_bridge", name),
            source: format!("__declspec(dllexport) int {0}_bridge(void) {{return {0}();}}", name),
        }
    }

    #[test]
    fn test_source_layout() {
        let files = emitter()
            .emit(&[record("vips_a"), record("vips_b")], &default_fixed_bridges())
            .unwrap();

        let expected = "#include <vips/vips.h>\n\n\
            __declspec(dllexport) int vips_a_bridge(void) {return vips_a();}\n\
            __declspec(dllexport) int vips_b_bridge(void) {return vips_b();}\n\
            __declspec(dllexport) int vips_cache_fixed_bridge(";
        assert!(files.source.starts_with(expected), "{}", files.source);
        assert!(files.source.contains(
            "\n__declspec(dllexport) int vips_cache_bridge(VipsImage *in, VipsImage **out) \
             {return vips_call_split(\"cache\", NULL, in, out);}\n"
        ));
    }

    #[test]
    fn test_fixed_cache_bridge_matches_hand_written_form() {
        let files = emitter().emit(&[], &default_fixed_bridges()).unwrap();
        assert!(files.source.contains(
            "__declspec(dllexport) int vips_cache_fixed_bridge(VipsImage *in, VipsImage **out, \
             const char* max_tiles_in_name, int max_tiles_in, \
             const char* tile_height_in_name, int tile_height_in, \
             const char* tile_width_in_name, int tile_width_in) \
             {return vips_call_split(\"cache\", max_tiles_in_name, max_tiles_in, \
             tile_height_in_name, tile_height_in, tile_width_in_name, tile_width_in, NULL, in, out);}"
        ));
    }

    #[test]
    fn test_definition_lists_fixed_mappings_once() {
        let records: Vec<_> = ["vips_a", "vips_b", "vips_c"].iter().map(|n| record(n)).collect();
        let files = emitter().emit(&records, &default_fixed_bridges()).unwrap();

        assert_eq!(
            files.definition,
            "LIBRARY vips\nEXPORTS\n\
             \x20   vips_a = vips_a_bridge\n\
             \x20   vips_b = vips_b_bridge\n\
             \x20   vips_c = vips_c_bridge\n\
             \x20   vips_cache_fixed = vips_cache_fixed_bridge\n\
             \x20   vips_cache = vips_cache_bridge\n"
        );
    }

    #[test]
    fn test_write_outputs() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("gen").join("vips.c");
        let def = tmp.path().join("vips.def");

        let emitter = emitter();
        let files = emitter.emit(&[record("vips_a")], &[]).unwrap();
        emitter.write(&files, &source, &def).unwrap();

        assert_eq!(std::fs::read_to_string(&source).unwrap(), files.source);
        assert_eq!(std::fs::read_to_string(&def).unwrap(), files.definition);
    }

    #[test]
    fn test_write_failure_names_path() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let emitter = emitter();
        let files = emitter.emit(&[], &[]).unwrap();
        let err = emitter
            .write(&files, &blocker.join("vips.c"), &tmp.path().join("vips.def"))
            .unwrap_err();

        assert!(matches!(err, BridgeError::Write { .. }));
        assert!(err.to_string().contains("vips.c"));
    }
}
