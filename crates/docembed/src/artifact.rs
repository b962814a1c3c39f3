//! Generated artifact model
//!
//! An artifact is a three-line script:
//!
//! ```text
//! // Auto-generated from README.md on 2024-05-01T12:00:00.000000+00:00
//! // Do not edit manually – run `docembed` instead.
//! window.__PCI_README__ = "# Title\n...";
//! ```
//!
//! The first two lines are provenance comments; the third assigns the
//! encoded document to the well-known global. [`Artifact::parse`] reads the
//! layout back so an existing file can be compared against its source.

use crate::error::{EmbedError, EmbedResult};
use crate::literal::{self, Escaping};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Default namespace the document is assigned into
pub const DEFAULT_NAMESPACE: &str = "window";

/// Default key under the namespace
pub const DEFAULT_KEY: &str = "__PCI_README__";

/// The single well-known access point an artifact assigns into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalTarget {
    /// Dotted path of the owning object (e.g. `window`, `globalThis.docs`)
    pub namespace: String,
    /// Property name under the namespace
    pub key: String,
}

impl GlobalTarget {
    /// Create a target, validating both parts as JavaScript identifiers
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> EmbedResult<Self> {
        let namespace = namespace.into();
        let key = key.into();

        if namespace.is_empty() || !namespace.split('.').all(is_identifier) {
            return Err(EmbedError::config(format!(
                "namespace `{namespace}` is not a dotted path of identifiers"
            )));
        }
        if !is_identifier(&key) {
            return Err(EmbedError::config(format!(
                "key `{key}` is not a valid identifier"
            )));
        }

        Ok(Self { namespace, key })
    }
}

impl Default for GlobalTarget {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl fmt::Display for GlobalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// A rendered-ready artifact for one source document
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Generation instant recorded in the banner
    pub generated_at: DateTime<Utc>,
    /// Source file name shown in the banner
    pub source_name: String,
    /// Command shown in the "do not edit" banner line
    pub regenerate_command: String,
    /// Global the document is assigned into
    pub target: GlobalTarget,
    /// Encoded string literal, quotes included
    literal: String,
}

impl Artifact {
    /// Build an artifact by encoding `text` with the given escaping
    pub fn new(
        text: &str,
        escaping: Escaping,
        generated_at: DateTime<Utc>,
        source_name: impl Into<String>,
        regenerate_command: impl Into<String>,
        target: GlobalTarget,
    ) -> EmbedResult<Self> {
        let source_name = source_name.into();
        let regenerate_command = regenerate_command.into();
        ensure_single_line("source name", &source_name)?;
        ensure_single_line("regenerate_command", &regenerate_command)?;

        Ok(Self {
            generated_at,
            source_name,
            regenerate_command,
            target,
            literal: literal::encode(text, escaping)?,
        })
    }

    /// Banner timestamp, RFC 3339 with microseconds and a `+00:00` offset
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    /// First banner line up to (not including) the timestamp
    pub fn provenance_prefix(&self) -> String {
        format!("// Auto-generated from {} on ", self.source_name)
    }

    /// Second banner line, without trailing newline
    pub fn regenerate_line(&self) -> String {
        format!(
            "// Do not edit manually – run `{}` instead.",
            self.regenerate_command
        )
    }

    /// The assignment statement, without trailing newline
    pub fn assignment_line(&self) -> String {
        format!("{} = {};", self.target, self.literal)
    }

    /// Render the complete file content
    pub fn render(&self) -> String {
        format!(
            "{}{}\n{}\n{}\n",
            self.provenance_prefix(),
            self.timestamp(),
            self.regenerate_line(),
            self.assignment_line()
        )
    }

    /// Parse the content of a previously generated artifact
    pub fn parse(content: &str) -> EmbedResult<ParsedArtifact> {
        let mut lines = content.lines();

        let provenance = lines
            .next()
            .filter(|l| l.starts_with("//"))
            .ok_or_else(|| EmbedError::malformed("missing provenance comment"))?;
        lines
            .next()
            .filter(|l| l.starts_with("//"))
            .ok_or_else(|| EmbedError::malformed("missing regeneration comment"))?;
        let assignment = lines
            .next()
            .ok_or_else(|| EmbedError::malformed("missing assignment statement"))?;
        if lines.any(|l| !l.trim().is_empty()) {
            return Err(EmbedError::malformed(
                "unexpected content after assignment statement",
            ));
        }

        let (lhs, rhs) = assignment
            .split_once(" = ")
            .ok_or_else(|| EmbedError::malformed("assignment has no `=`"))?;
        let literal = rhs
            .trim_end()
            .strip_suffix(';')
            .ok_or_else(|| EmbedError::malformed("assignment is not terminated with `;`"))?;
        let (namespace, key) = lhs.trim().rsplit_once('.').ok_or_else(|| {
            EmbedError::malformed(format!("`{lhs}` is not a namespaced global"))
        })?;
        let target = GlobalTarget::new(namespace, key)
            .map_err(|e| EmbedError::malformed(e.to_string()))?;

        Ok(ParsedArtifact {
            generated_at: provenance
                .rsplit_once(" on ")
                .map(|(_, ts)| ts.trim().to_string()),
            target,
            payload: literal::decode(literal)?,
        })
    }
}

/// An artifact read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    /// Timestamp text from the provenance line, if present
    pub generated_at: Option<String>,
    /// Global the file assigns into
    pub target: GlobalTarget,
    /// Decoded document text
    pub payload: String,
}

/// Reject values that would end a `//` comment early
///
/// Covers every JavaScript line terminator, not just `\n`.
pub(crate) fn ensure_single_line(field: &str, value: &str) -> EmbedResult<()> {
    if value
        .chars()
        .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
    {
        return Err(EmbedError::config(format!(
            "{field} must fit on one line, got {value:?}"
        )));
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
