//! bridgegen - exported bridge wrappers for C libraries
//!
//! Scans a C library's public headers and generates wrapper functions
//! carrying an explicit export marker, together with a module-definition
//! file mapping each original symbol to its wrapper. The defaults target
//! libvips on Windows.

pub mod bindings;
pub mod ops;
pub mod util;

pub use bindings::{BridgeError, BridgeRecord, FunctionDecl, ParsedHeader};
pub use ops::{generate, GenerateOptions, GenerateReport};
pub use util::config::Config;
