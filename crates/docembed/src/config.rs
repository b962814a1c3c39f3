//! Project configuration
//!
//! A project may carry a `docembed.toml` at its root. Every field is
//! optional; a missing file means the built-in defaults, which embed
//! `README.md` into `assets/js/readme-data.js` as `window.__PCI_README__`.

use crate::artifact::{ensure_single_line, GlobalTarget, DEFAULT_KEY, DEFAULT_NAMESPACE};
use crate::error::{EmbedError, EmbedResult};
use crate::literal::Escaping;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "docembed.toml";

/// Default source document, relative to the project root
pub const DEFAULT_SOURCE: &str = "README.md";

/// Default artifact path, relative to the project root
pub const DEFAULT_OUTPUT: &str = "assets/js/readme-data.js";

/// Default command shown in the artifact banner
pub const DEFAULT_REGENERATE_COMMAND: &str = "docembed";

/// Contents of `docembed.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    /// Source document, relative to the project root
    pub source: PathBuf,
    /// Generated artifact, relative to the project root
    pub output: PathBuf,
    /// Object the document is assigned into
    pub namespace: String,
    /// Property name under `namespace`
    pub key: String,
    /// Non-ASCII handling in the literal
    pub escaping: Escaping,
    /// Command shown in the banner
    pub regenerate_command: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            namespace: DEFAULT_NAMESPACE.to_string(),
            key: DEFAULT_KEY.to_string(),
            escaping: Escaping::default(),
            regenerate_command: DEFAULT_REGENERATE_COMMAND.to_string(),
        }
    }
}

impl EmbedConfig {
    /// Parse config from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load config from an explicit file
    pub fn load(path: impl AsRef<Path>) -> EmbedResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EmbedError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| EmbedError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `docembed.toml` from `root`, or the defaults if it is absent
    pub fn load_or_default(root: impl AsRef<Path>) -> EmbedResult<Self> {
        let path = root.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values that TOML typing cannot express
    pub fn validate(&self) -> EmbedResult<()> {
        self.target()?;
        ensure_single_line("regenerate_command", &self.regenerate_command)?;
        if self.source.as_os_str().is_empty() {
            return Err(EmbedError::config("source path is empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(EmbedError::config("output path is empty"));
        }
        Ok(())
    }

    /// The global the artifact assigns into
    pub fn target(&self) -> EmbedResult<GlobalTarget> {
        GlobalTarget::new(self.namespace.clone(), self.key.clone())
    }
}

/// Find the project root for `start`
///
/// Walks upward to the first directory containing `docembed.toml`. Falls
/// back to `start` itself when no ancestor has one.
pub fn find_project_root(start: impl AsRef<Path>) -> PathBuf {
    let start = start.as_ref();
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir.join(CONFIG_FILE_NAME).is_file() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }

    start.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EmbedConfig::default();
        assert_eq!(config.source, PathBuf::from("README.md"));
        assert_eq!(config.output, PathBuf::from("assets/js/readme-data.js"));
        assert_eq!(config.target().unwrap().to_string(), "window.__PCI_README__");
        assert_eq!(config.escaping, Escaping::Ascii);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EmbedConfig::from_toml(
            r#"
            output = "site/readme.js"
            escaping = "utf8"
            "#,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("site/readme.js"));
        assert_eq!(config.escaping, Escaping::Utf8);
        assert_eq!(config.source, PathBuf::from("README.md"));
        assert_eq!(config.key, "__PCI_README__");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(EmbedConfig::from_toml("sorce = \"README.md\"").is_err());
        assert!(EmbedConfig::from_toml("escaping = \"latin1\"").is_err());
    }

    #[test]
    fn test_load_validates_identifiers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "key = \"not-an-ident\"\n").unwrap();

        let err = EmbedConfig::load(&path).unwrap_err();
        assert!(matches!(err, EmbedError::Config(_)));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = EmbedConfig::load_or_default(tmp.path()).unwrap();
        assert_eq!(config, EmbedConfig::default());
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = tmp.path().join("docs").join("guide");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), tmp.path().to_path_buf());
    }

    #[test]
    fn test_load_rejects_multiline_regenerate_command() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "regenerate_command = \"make\\ndocs\"\n").unwrap();

        let err = EmbedConfig::load(&path).unwrap_err();
        assert!(matches!(err, EmbedError::Config(_)));
    }

    #[test]
    fn test_parse_error_keeps_location() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "source = \"README.md\"\noutput = 3\n").unwrap();

        let err = EmbedConfig::load(&path).unwrap_err();
        assert!(matches!(err, EmbedError::ConfigParse { .. }));
        let msg = err.to_string();
        assert!(msg.contains(CONFIG_FILE_NAME));
        assert!(msg.contains("line 2"), "{msg}");
    }

    #[test]
    fn test_find_project_root_prefers_nearest_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let inner = tmp.path().join("packages").join("site");
        fs::create_dir_all(inner.join("docs")).unwrap();
        fs::write(inner.join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(find_project_root(inner.join("docs")), inner);
    }

    #[test]
    fn test_find_project_root_falls_back_to_start() {
        // Relative start: the walk ends at the crate directory, which has
        // no config file.
        let start = Path::new("no-such-dir").join("nested");
        assert!(!Path::new(CONFIG_FILE_NAME).exists());

        assert_eq!(find_project_root(&start), start);
    }
}
