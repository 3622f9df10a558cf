//! Best-effort scanners for single-line C function declarations.
//!
//! Neither strategy understands the full C grammar. Both accept
//! `return_type [*]name(params);` where the parameter text contains no
//! parentheses, which covers the annotated declarations in library headers.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{BridgeError, Result};
use super::types::FunctionDecl;

/// Declaration pattern: return type, optionally pointer-prefixed name, and
/// parenthesized parameter text followed by `;`.
const DECLARATION_PATTERN: &str =
    r"^\s*([A-Za-z_][\w\s*]*)\s+(\**)([A-Za-z_]\w*)\s*\(([^)]*)\)\s*;";

/// Turns the line following an export annotation into a declaration.
pub trait DeclarationScanner: fmt::Debug {
    /// Which strategy this is.
    fn kind(&self) -> ScannerKind;

    /// Match a single line, returning `None` if it is not a declaration.
    fn scan(&self, line: &str) -> Option<FunctionDecl>;
}

/// Available scanner strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    /// Regular-expression scanner
    #[default]
    Regex,
    /// Minimal hand-written tokenizer
    Token,
}

impl ScannerKind {
    /// Build a scanner for this strategy.
    pub fn build(self) -> Result<Box<dyn DeclarationScanner>> {
        let scanner: Box<dyn DeclarationScanner> = match self {
            ScannerKind::Regex => Box::new(RegexScanner::new()?),
            ScannerKind::Token => Box::new(TokenScanner),
        };
        Ok(scanner)
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScannerKind::Regex => write!(f, "regex"),
            ScannerKind::Token => write!(f, "token"),
        }
    }
}

impl FromStr for ScannerKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "regex" => Ok(ScannerKind::Regex),
            "token" => Ok(ScannerKind::Token),
            _ => Err(BridgeError::UnknownScanner(s.to_string())),
        }
    }
}

/// Scanner backed by a single compiled regular expression.
#[derive(Debug, Clone)]
pub struct RegexScanner {
    pattern: Regex,
}

impl RegexScanner {
    pub fn new() -> Result<Self> {
        Ok(RegexScanner {
            pattern: Regex::new(DECLARATION_PATTERN)?,
        })
    }
}

impl DeclarationScanner for RegexScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Regex
    }

    fn scan(&self, line: &str) -> Option<FunctionDecl> {
        let cap = self.pattern.captures(line)?;

        let return_type = cap.get(1).map_or("", |m| m.as_str()).trim();
        let stars = cap.get(2).map_or("", |m| m.as_str());
        let name = cap.get(3).map_or("", |m| m.as_str());
        let params = cap.get(4).map_or("", |m| m.as_str()).trim();

        Some(FunctionDecl {
            return_type: return_type.to_string(),
            name: name.to_string(),
            pointer_depth: stars.len(),
            params: params.to_string(),
        })
    }
}

/// Scanner that walks the line by hand, without regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenScanner;

impl DeclarationScanner for TokenScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Token
    }

    fn scan(&self, line: &str) -> Option<FunctionDecl> {
        let semi = line.find(';')?;
        let decl = line[..semi].trim_end().strip_suffix(')')?;

        let open = decl.find('(')?;
        let params = &decl[open + 1..];
        if params.contains(['(', ')']) {
            return None;
        }

        let head = decl[..open].trim_end();
        let name_start = head
            .rfind(|c: char| !is_ident_char(c))
            .map_or(0, |i| i + head[i..].chars().next().map_or(1, char::len_utf8));
        let name = &head[name_start..];
        if !name.starts_with(is_ident_start) {
            return None;
        }

        let before = &head[..name_start];
        let ty = before.trim_end_matches('*');
        let pointer_depth = before.len() - ty.len();

        // the type must be separated from the declarator by whitespace
        if !ty.ends_with(char::is_whitespace) {
            return None;
        }

        let return_type = ty.trim();
        if !return_type.starts_with(is_ident_start)
            || !return_type
                .chars()
                .all(|c| is_ident_char(c) || c == '*' || c.is_whitespace())
        {
            return None;
        }

        Some(FunctionDecl {
            return_type: return_type.to_string(),
            name: name.to_string(),
            pointer_depth,
            params: params.trim().to_string(),
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
