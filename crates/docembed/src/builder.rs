//! EmbedBuilder - main API for generating artifacts
//!
//! The builder reads the source document, renders the artifact and writes it
//! in one synchronous pass. Nothing is written until the source has been read
//! and validated, so a missing or non-UTF-8 source leaves the destination
//! untouched.

use crate::artifact::{Artifact, GlobalTarget};
use crate::config::{EmbedConfig, DEFAULT_REGENERATE_COMMAND};
use crate::error::{EmbedError, EmbedResult};
use crate::literal::Escaping;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of a successful [`EmbedBuilder::build`]
#[derive(Debug, Clone)]
pub struct EmbedOutput {
    /// Resolved source path
    pub source_path: PathBuf,
    /// Resolved artifact path
    pub output_path: PathBuf,
    /// Artifact path relative to the project root, for display
    pub display_path: PathBuf,
    /// Size of the written artifact
    pub bytes_written: usize,
    /// Timestamp recorded in the banner
    pub generated_at: DateTime<Utc>,
}

/// Outcome of [`EmbedBuilder::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The artifact embeds the current source into the configured target
    UpToDate,
    /// The artifact exists but no longer matches
    Stale { reason: String },
    /// There is no artifact at the output path
    Missing,
}

impl Freshness {
    /// Whether the artifact needs regenerating
    pub fn is_current(&self) -> bool {
        matches!(self, Freshness::UpToDate)
    }
}

/// Builder for configuring and running an embed
///
/// # Example
///
/// ```no_run
/// use docembed::EmbedBuilder;
///
/// let output = EmbedBuilder::new()
///     .root(".")
///     .source("README.md")
///     .output("assets/js/readme-data.js")
///     .build()
///     .expect("failed to embed README");
/// println!("wrote {}", output.display_path.display());
/// ```
#[derive(Debug, Clone)]
pub struct EmbedBuilder {
    /// Project root that relative paths resolve against
    pub root: PathBuf,
    /// Source document
    pub source: PathBuf,
    /// Artifact path
    pub output: PathBuf,
    /// Global the document is assigned into
    pub target: GlobalTarget,
    /// Non-ASCII handling in the literal
    pub escaping: Escaping,
    /// Command shown in the banner
    pub regenerate_command: String,
}

impl EmbedBuilder {
    /// Create a builder with the default paths and target
    pub fn new() -> Self {
        let config = EmbedConfig::default();
        Self {
            root: PathBuf::from("."),
            source: config.source,
            output: config.output,
            target: GlobalTarget::default(),
            escaping: config.escaping,
            regenerate_command: DEFAULT_REGENERATE_COMMAND.to_string(),
        }
    }

    /// Create a builder from a loaded config
    pub fn from_config(root: impl Into<PathBuf>, config: &EmbedConfig) -> EmbedResult<Self> {
        Ok(Self {
            root: root.into(),
            source: config.source.clone(),
            output: config.output.clone(),
            target: config.target()?,
            escaping: config.escaping,
            regenerate_command: config.regenerate_command.clone(),
        })
    }

    /// Set the project root
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = path.into();
        self
    }

    /// Set the source document
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = path.into();
        self
    }

    /// Set the artifact path
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Set the global target
    pub fn target(mut self, target: GlobalTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the escaping mode
    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Set the command shown in the banner
    pub fn regenerate_command(mut self, command: impl Into<String>) -> Self {
        self.regenerate_command = command.into();
        self
    }

    /// Source path resolved against the root
    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.source)
    }

    /// Artifact path resolved against the root
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    /// Artifact path relative to the root, as shown to users
    pub fn display_path(&self) -> PathBuf {
        let output = self.output_path();
        output
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or(output)
    }

    /// Read the source document as UTF-8
    pub fn read_source(&self) -> EmbedResult<String> {
        let path = self.source_path();
        let bytes = fs::read(&path).map_err(|source| EmbedError::ReadSource {
            path: path.clone(),
            source,
        })?;

        String::from_utf8(bytes).map_err(|e| EmbedError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
            path,
        })
    }

    /// Render the artifact for the current source with a fixed timestamp
    pub fn render_at(&self, generated_at: DateTime<Utc>) -> EmbedResult<String> {
        let text = self.read_source()?;
        Ok(self.artifact(&text, generated_at)?.render())
    }

    /// Generate the artifact and write it to the output path
    pub fn build(self) -> EmbedResult<EmbedOutput> {
        let source_path = self.source_path();
        let output_path = self.output_path();

        let text = self.read_source()?;
        tracing::debug!("read {} bytes from {}", text.len(), source_path.display());

        let generated_at = Utc::now();
        let rendered = self.artifact(&text, generated_at)?.render();

        fs::write(&output_path, &rendered).map_err(|source| EmbedError::WriteOutput {
            path: output_path.clone(),
            source,
        })?;
        tracing::info!(
            "embedded {} into {} as {}",
            source_path.display(),
            output_path.display(),
            self.target
        );

        Ok(EmbedOutput {
            display_path: self.display_path(),
            source_path,
            output_path,
            bytes_written: rendered.len(),
            generated_at,
        })
    }

    /// Compare the existing artifact with the current source without writing
    pub fn check(&self) -> EmbedResult<Freshness> {
        let text = self.read_source()?;
        let output_path = self.output_path();

        let existing = match fs::read_to_string(&output_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Freshness::Missing),
            Err(source) => {
                return Err(EmbedError::ReadArtifact {
                    path: output_path,
                    source,
                })
            }
        };

        let parsed = match Artifact::parse(&existing) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("{} does not parse: {}", output_path.display(), e);
                return Ok(Freshness::Stale {
                    reason: "not a generated artifact".to_string(),
                });
            }
        };

        if parsed.target != self.target {
            return Ok(Freshness::Stale {
                reason: format!("assigns {} instead of {}", parsed.target, self.target),
            });
        }
        if parsed.payload != text {
            return Ok(Freshness::Stale {
                reason: "source has changed".to_string(),
            });
        }

        // Everything but the timestamp must match what `build` would write.
        let expected = self.artifact(&text, Utc::now())?;
        let mut lines = existing.lines();
        let provenance = lines.next().unwrap_or_default();
        let regenerate = lines.next().unwrap_or_default();
        let assignment = lines.next().unwrap_or_default();

        let freshness = if assignment != expected.assignment_line() {
            Freshness::Stale {
                reason: "literal encoding has changed".to_string(),
            }
        } else if !provenance.starts_with(&expected.provenance_prefix())
            || regenerate != expected.regenerate_line()
        {
            Freshness::Stale {
                reason: "banner has changed".to_string(),
            }
        } else {
            Freshness::UpToDate
        };

        Ok(freshness)
    }

    fn artifact(&self, text: &str, generated_at: DateTime<Utc>) -> EmbedResult<Artifact> {
        let source_name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string());

        Artifact::new(
            text,
            self.escaping,
            generated_at,
            source_name,
            self.regenerate_command.clone(),
            self.target.clone(),
        )
    }
}

impl Default for EmbedBuilder {
    fn default() -> Self {
        Self::new()
    }
}
