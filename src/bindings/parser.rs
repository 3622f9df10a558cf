//! Annotated declaration parser.
//!
//! Walks a header line by line. Each line consisting solely of the export
//! annotation marks the next non-blank line as a candidate declaration; the
//! candidate is handed to a [`DeclarationScanner`] and, if it is bridgeable,
//! turned into a rendered wrapper plus an export mapping.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::args::translate;
use super::errors::BridgeError;
use super::scanner::DeclarationScanner;
use super::template::{BridgeTemplates, WrapperSlots};
use super::types::{BridgeRecord, FunctionDecl, ParsedHeader};
use crate::util::fs::read_lossy;

/// Function names that are never bridged. Matching is exact.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    names: HashSet<String>,
}

impl DenyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DenyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        DenyList {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parser producing bridge records from header text.
#[derive(Debug)]
pub struct BridgeParser {
    /// Marker line preceding exported declarations
    annotation: String,
    /// Declaration matching strategy
    scanner: Box<dyn DeclarationScanner>,
    /// Output formatting
    templates: BridgeTemplates,
    /// Functions to skip
    deny: DenyList,
    /// Appended to the original name to form the wrapper name
    suffix: String,
}

impl BridgeParser {
    /// Create a parser for declarations preceded by `annotation`.
    pub fn new(
        annotation: impl Into<String>,
        scanner: Box<dyn DeclarationScanner>,
        templates: BridgeTemplates,
    ) -> Self {
        BridgeParser {
            annotation: annotation.into(),
            scanner,
            templates,
            deny: DenyList::new(),
            suffix: "_bridge".to_string(),
        }
    }

    /// Set functions to exclude.
    pub fn with_deny_list(mut self, deny: DenyList) -> Self {
        self.deny = deny;
        self
    }

    /// Set the wrapper name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Parse a header file.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedHeader> {
        let content = read_lossy(path)
            .with_context(|| format!("failed to read header: {}", path.display()))?;

        self.parse_content(&content, path)
            .with_context(|| format!("failed to generate bridges for {}", path.display()))
    }

    /// Parse header content.
    pub fn parse_content(
        &self,
        content: &str,
        path: &Path,
    ) -> std::result::Result<ParsedHeader, BridgeError> {
        let mut header = ParsedHeader::new(path);
        let lines: Vec<&str> = content.lines().collect();

        let mut i = 0;
        while i < lines.len() {
            if lines[i].trim() == self.annotation {
                let mut j = i + 1;
                while j < lines.len() && lines[j].trim().is_empty() {
                    j += 1;
                }

                if let Some(decl) = lines.get(j).and_then(|line| self.scanner.scan(line)) {
                    if let Some(record) = self.bridge(&decl)? {
                        header.bridges.push(record);
                    }
                }

                // resume after the declaration, not the annotation
                i = j;
            }
            i += 1;
        }

        Ok(header)
    }

    /// Build the wrapper for one declaration, or `None` if it is excluded.
    fn bridge(&self, decl: &FunctionDecl) -> std::result::Result<Option<BridgeRecord>, BridgeError> {
        if self.deny.contains(&decl.name) {
            tracing::debug!("skipping deny-listed {}", decl.name);
            return Ok(None);
        }

        if decl.is_variadic() {
            tracing::debug!("skipping variadic {}", decl.name);
            return Ok(None);
        }

        let args = translate(&decl.params);
        let bridge = format!("{}{}", decl.name, self.suffix);

        let body = if decl.returns_value() {
            format!("return {}({});", decl.name, args.call_args)
        } else {
            format!("{}({});", decl.name, args.call_args)
        };

        let source = self.templates.wrapper(WrapperSlots {
            return_type: &decl.return_type,
            declarator: &decl.declarator(&bridge),
            params: &args.params,
            body: &body,
        })?;

        Ok(Some(BridgeRecord {
            original: decl.name.clone(),
            bridge,
            source,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::scanner::ScannerKind;

    fn parser() -> BridgeParser {
        BridgeParser::new(
            "VIPS_API",
            ScannerKind::Regex.build().unwrap(),
            BridgeTemplates::new("__declspec(dllexport)").unwrap(),
        )
        .with_deny_list(["vips_format_map", "vips_path_mode7"].into_iter().collect())
    }

    fn parse(content: &str) -> ParsedHeader {
        parser().parse_content(content, Path::new("test.h")).unwrap()
    }

    #[test]
    fn test_parse_simple_function() {
        let header = parse("VIPS_API\nint vips_init(const char *argv0);\n");

        assert_eq!(header.mappings(), vec!["vips_init,vips_init_bridge"]);
        assert_eq!(
            header.bodies(),
            vec!["__declspec(dllexport) int vips_init_bridge(const char *argv0) {return vips_init(argv0);}"]
        );
    }

    #[test]
    fn test_pointer_returning_void() {
        let header = parse("VIPS_API\nvoid *vips_foo(int a);\n");

        assert_eq!(header.mappings(), vec!["vips_foo,vips_foo_bridge"]);
        let body = header.bodies()[0];
        assert!(body.contains("void *vips_foo_bridge(int a)"));
        assert!(body.contains("vips_foo(a);"));
    }

    #[test]
    fn test_void_function_does_not_return() {
        let header = parse("VIPS_API\nvoid vips_shutdown(void);\n");

        assert_eq!(
            header.bodies(),
            vec!["__declspec(dllexport) void vips_shutdown_bridge(void) {vips_shutdown();}"]
        );
    }

    #[test]
    fn test_deny_listed_function_skipped() {
        let header = parse("VIPS_API\nvoid *vips_format_map(VSListMap2Fn fn, void *a, void *b);\n");
        assert!(header.bridges.is_empty());
    }

    #[test]
    fn test_deny_list_is_exact() {
        let header = parse("VIPS_API\nint vips_format_map_all(void);\n");
        assert_eq!(header.mappings(), vec!["vips_format_map_all,vips_format_map_all_bridge"]);
    }

    #[test]
    fn test_variadic_function_skipped() {
        let header = parse("VIPS_API\nint vips_copy(VipsImage *in, VipsImage **out, ...);\n");
        assert!(header.bridges.is_empty());
    }

    #[test]
    fn test_blank_lines_after_annotation() {
        let header = parse("VIPS_API\n\n   \nint vips_version(int flag);\n");
        assert_eq!(header.mappings(), vec!["vips_version,vips_version_bridge"]);
    }

    #[test]
    fn test_unannotated_declarations_ignored() {
        let content = "\
int vips_private(void);

VIPS_API
int vips_public(void);
GType vips_other_get_type(void);
";
        let header = parse(content);
        assert_eq!(header.mappings(), vec!["vips_public,vips_public_bridge"]);
    }

    #[test]
    fn test_non_matching_line_is_consumed() {
        let content = "\
VIPS_API
int vips_split(int a,
VIPS_API
int vips_next(void);
";
        let header = parse(content);
        assert_eq!(header.mappings(), vec!["vips_next,vips_next_bridge"]);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let content = "\
VIPS_API
int vips_b(void);
VIPS_API
int vips_a(void);
";
        let header = parse(content);
        assert_eq!(
            header.mappings(),
            vec!["vips_b,vips_b_bridge", "vips_a,vips_a_bridge"]
        );
    }

    #[test]
    fn test_annotation_at_end_of_file() {
        let header = parse("int x;\nVIPS_API\n\n");
        assert!(header.bridges.is_empty());
    }

    #[test]
    fn test_custom_suffix_and_token_scanner() {
        let parser = BridgeParser::new(
            "MYLIB_API",
            ScannerKind::Token.build().unwrap(),
            BridgeTemplates::new("__attribute__((visibility(\"default\")))").unwrap(),
        )
        .with_suffix("_export");

        let header = parser
            .parse_content("MYLIB_API\nchar **mylib_names(size_t *n);\n", Path::new("m.h"))
            .unwrap();

        assert_eq!(header.mappings(), vec!["mylib_names,mylib_names_export"]);
        assert_eq!(
            header.bodies(),
            vec!["__attribute__((visibility(\"default\"))) char **mylib_names_export(size_t *n) {return mylib_names(n);}"]
        );
    }
}
