//! JSON error diagnostics pointing into the offending source

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::error::Category;
use thiserror::Error;

/// What went wrong while decoding a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorKind {
    /// The text is not well-formed JSON (includes truncated input)
    Syntax,
    /// Well-formed JSON, but not the shape we expected
    Structure,
}

impl JsonErrorKind {
    fn describe(self) -> &'static str {
        match self {
            JsonErrorKind::Syntax => "not valid JSON",
            JsonErrorKind::Structure => "unexpected JSON structure",
        }
    }
}

/// JSON decode error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{filename} is {}: {message}", .kind.describe())]
#[diagnostic(code(sfdmu_export::json::decode))]
pub struct JsonSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    kind: JsonErrorKind,
    filename: String,

    /// The underlying serde_json message
    message: String,
}

impl JsonSyntaxError {
    /// Create a diagnostic from a serde_json error and the text it was decoding
    pub fn from_serde_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let kind = match err.classify() {
            Category::Data => JsonErrorKind::Structure,
            Category::Syntax | Category::Eof | Category::Io => JsonErrorKind::Syntax,
        };

        let offset = line_col_to_offset(source, err.line(), err.column());
        let message = err.to_string();
        let help = generate_help(kind, &message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..(offset + 1).min(source.len())),
            help,
            kind,
            filename: filename.to_string(),
            message,
        }
    }

    /// Structure error for a well-formed document, pointing at its first value
    pub fn unexpected_structure(message: impl Into<String>, source: &str, filename: &str) -> Self {
        let message = message.into();
        let offset = source.len() - source.trim_start().len();
        let help = generate_help(JsonErrorKind::Structure, &message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..(offset + 1).min(source.len())),
            help,
            kind: JsonErrorKind::Structure,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn kind(&self) -> JsonErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert a serde_json line/column (both 1-based, column counted in bytes)
/// to a byte offset clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();

    let offset = line_start + column.saturating_sub(1);
    if source.is_empty() {
        0
    } else {
        offset.min(source.len() - 1)
    }
}

/// Suggest a fix based on the serde_json message
fn generate_help(kind: JsonErrorKind, message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item of a list or object.".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The file ends early. Check for a missing closing '}' or ']'.".to_string());
    }

    if msg_lower.contains("key must be a string") {
        return Some("Object keys must be double-quoted: {\"tables\": [...]}".to_string());
    }

    if msg_lower.contains("missing field `url`") {
        return Some("Every entry under \"tables\" needs a \"url\" naming its CSV file.".to_string());
    }

    if kind == JsonErrorKind::Structure {
        return Some(
            "Expected an object like {\"tables\": [{\"url\": \"Account.csv\"}]}.".to_string(),
        );
    }

    None
}
