//! Miette-based error diagnostics for CLI error presentation.
//!
//! Renders profile file failures with source code context, a labeled
//! span pointing at the problem, and a help suggestion.

use std::path::Path;

use miette::{Diagnostic, Report, SourceSpan};
use thiserror::Error;

/// Profile file error with source location context.
///
/// Displays the profile content with a labeled span pointing to the
/// problematic location, along with a help message.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(punter::profile))]
pub struct ProfileDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// The profile file content.
    #[source_code]
    pub src: String,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Help text with a suggestion for fixing the error.
    #[help]
    pub help: Option<String>,
}

/// Build a renderable report for a profile parse failure.
#[must_use]
pub fn profile_report(path: &Path, content: &str, source: &toml::de::Error) -> Report {
    let span: SourceSpan = source.span().map_or_else(
        || (0, 0).into(),
        |range| (range.start, range.end.saturating_sub(range.start)).into(),
    );
    Report::new(ProfileDiagnostic {
        message: format!("invalid profile at {}: {}", path.display(), source.message()),
        src: content.to_string(),
        span,
        help: Some("run `punter profile init --force` to regenerate a starter profile".into()),
    })
}
