//! Bridge generation error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during header scanning or bridge emission.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("entry header not found: {}", path.display())]
    EntryNotFound { path: PathBuf },

    #[error("invalid export annotation `{annotation}`")]
    InvalidAnnotation { annotation: String },

    #[error("invalid bridge suffix `{suffix}`")]
    InvalidSuffix { suffix: String },

    #[error("unknown declaration scanner `{0}`")]
    UnknownScanner(String),

    #[error("invalid scanner pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("template `{template}`: {message}")]
    Template { template: String, message: String },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BridgeError {
    pub(crate) fn template(template: &str, message: impl Into<String>) -> Self {
        BridgeError::Template {
            template: template.to_string(),
            message: message.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BridgeError::EntryNotFound { path } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context("the entry header seeds the include traversal")
                .with_suggestion(suggestions::ENTRY_NOT_FOUND),
            BridgeError::InvalidAnnotation { .. } => Diagnostic::error(self.to_string())
                .with_context("the annotation must be a single non-empty token")
                .with_suggestion(suggestions::CHECK_CONFIG),
            BridgeError::InvalidSuffix { .. } => Diagnostic::error(self.to_string())
                .with_context("the suffix must be a non-empty C identifier fragment")
                .with_suggestion(suggestions::CHECK_CONFIG),
            BridgeError::UnknownScanner(_) => Diagnostic::error(self.to_string())
                .with_context("available scanners: regex, token")
                .with_suggestion(suggestions::CHECK_CONFIG),
            BridgeError::Pattern(_) => Diagnostic::error(self.to_string())
                .with_suggestion(suggestions::CHECK_CONFIG),
            BridgeError::Template { template, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("while rendering the `{}` template", template))
                .with_suggestion(suggestions::CHECK_CONFIG),
            BridgeError::Write { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::OUTPUT_UNWRITABLE),
        }
    }
}

/// Result alias for bridge generation.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_not_found_diagnostic() {
        let err = BridgeError::EntryNotFound {
            path: PathBuf::from("include/vips/vips.h"),
        };
        let diag = err.to_diagnostic();

        assert!(diag.message.contains("include/vips/vips.h"));
        assert_eq!(diag.location, Some(PathBuf::from("include/vips/vips.h")));
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_unknown_scanner_lists_choices() {
        let diag = BridgeError::UnknownScanner("clang".into()).to_diagnostic();
        assert!(diag.context.iter().any(|c| c.contains("regex, token")));
    }
}
