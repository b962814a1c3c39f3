//! docembed: inline a Markdown document into a generated script
//!
//! Documentation pages that are opened straight from disk cannot `fetch()`
//! the project README. docembed reads the README once at build time and
//! writes a small script that assigns its full text to a well-known global:
//!
//! ```text
//! README.md ──read──▶ text ──encode──▶ "literal" ──render──▶ readme-data.js
//!                                                             // banner
//!                                                             window.__PCI_README__ = "…";
//! ```
//!
//! The artifact is fully derived and overwritten on every run. Decoding the
//! literal always yields the exact source text.
//!
//! # Usage
//!
//! ```no_run
//! // Same as running `docembed` at the project root with no config
//! docembed::embed("README.md", "assets/js/readme-data.js").expect("embed failed");
//! ```

pub mod artifact;
pub mod builder;
pub mod config;
pub mod error;
pub mod literal;

use std::path::Path;

pub use artifact::{Artifact, GlobalTarget, ParsedArtifact};
pub use builder::{EmbedBuilder, EmbedOutput, Freshness};
pub use config::{find_project_root, EmbedConfig, CONFIG_FILE_NAME};
pub use error::{EmbedError, EmbedResult};
pub use literal::Escaping;

/// Embed `source` into a script at `dest` using the default target
///
/// Paths are used as given. The destination's parent directory must exist.
pub fn embed(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> EmbedResult<EmbedOutput> {
    EmbedBuilder::new()
        .source(source.as_ref())
        .output(dest.as_ref())
        .build()
}
