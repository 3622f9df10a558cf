//! Type definitions for scanned declarations and generated bridges.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An exported C function declaration matched on a single header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Declared return type, without the pointer marker attached to the name
    pub return_type: String,

    /// Function name, without any pointer marker
    pub name: String,

    /// Number of `*` markers attached to the name (`void *vips_foo(...)`)
    pub pointer_depth: usize,

    /// Raw parameter text between the parentheses, trimmed
    pub params: String,
}

impl FunctionDecl {
    /// Whether the parameter list contains a variadic marker.
    pub fn is_variadic(&self) -> bool {
        self.params.contains("...")
    }

    /// Whether the function produces a value the wrapper must return.
    ///
    /// A pointer-returning function always does, even when the declared
    /// base type is `void`.
    pub fn returns_value(&self) -> bool {
        self.pointer_depth > 0 || self.return_type != "void"
    }

    /// The name as it appears in a declarator, pointer marker included.
    pub fn declarator(&self, name: &str) -> String {
        format!("{}{}", "*".repeat(self.pointer_depth), name)
    }
}

/// A generated wrapper and the export mapping that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRecord {
    /// Original library symbol
    pub original: String,

    /// Wrapper symbol
    pub bridge: String,

    /// Rendered wrapper definition
    pub source: String,
}

impl BridgeRecord {
    /// The `original,bridge` mapping record.
    pub fn mapping(&self) -> String {
        format!("{},{}", self.original, self.bridge)
    }
}

/// A hand-authored wrapper appended after the generated ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedBridge {
    /// Exported symbol name the wrapper stands in for
    pub original: String,

    /// Return type of the wrapper
    pub return_type: String,

    /// Wrapper parameter list
    pub params: String,

    /// Complete wrapper body, statements only
    pub body: String,
}

/// All bridges produced from one header.
#[derive(Debug, Clone, Default)]
pub struct ParsedHeader {
    /// Source file path
    pub source: PathBuf,

    /// Bridges in declaration order
    pub bridges: Vec<BridgeRecord>,
}

impl ParsedHeader {
    /// Create a new empty parsed header.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        ParsedHeader {
            source: source.into(),
            bridges: Vec::new(),
        }
    }

    /// Wrapper definitions in declaration order.
    pub fn bodies(&self) -> Vec<&str> {
        self.bridges.iter().map(|b| b.source.as_str()).collect()
    }

    /// `original,bridge` mapping records in declaration order.
    pub fn mappings(&self) -> Vec<String> {
        self.bridges.iter().map(BridgeRecord::mapping).collect()
    }

    /// Merge another parsed header into this one.
    pub fn merge(&mut self, other: ParsedHeader) {
        self.bridges.extend(other.bridges);
    }
}
