//! Bridge generation for C libraries.
//!
//! This module provides header discovery, declaration scanning and code
//! emission for exporting a library's functions through generated wrappers.

pub mod args;
pub mod collect;
pub mod emitter;
pub mod errors;
pub mod parser;
pub mod scanner;
pub mod template;
pub mod types;

pub use args::{translate, TranslatedArgs};
pub use collect::{HeaderCollector, TraversalContext};
pub use emitter::{BridgeEmitter, EmittedFiles};
pub use errors::BridgeError;
pub use parser::{BridgeParser, DenyList};
pub use scanner::{DeclarationScanner, RegexScanner, ScannerKind, TokenScanner};
pub use template::{BridgeTemplates, Template};
pub use types::{BridgeRecord, FixedBridge, FunctionDecl, ParsedHeader};
