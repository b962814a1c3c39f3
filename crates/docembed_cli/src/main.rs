//! `docembed` - regenerate the embedded README script
//!
//! Run with no arguments from anywhere inside the project. The project root is
//! the nearest ancestor holding `docembed.toml`, or the current directory.
//! Logging goes to stderr and is controlled by `DOCEMBED_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use docembed::{find_project_root, EmbedBuilder, EmbedConfig, Freshness};
use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Parser, Debug)]
#[command(
    name = "docembed",
    version,
    about = "Embed README.md into a script so docs pages can load it offline"
)]
struct Cli {
    /// Project root (default: nearest ancestor with docembed.toml, else the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file to use instead of <root>/docembed.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source document (overrides the config)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Artifact path (overrides the config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit non-zero if the artifact is missing or stale instead of writing it
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("DOCEMBED_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = env::current_dir().context("resolving current directory")?;
    let root = match cli.root {
        Some(root) => cwd.join(root),
        None => find_project_root(&cwd),
    };
    tracing::debug!("project root: {}", root.display());

    let config = match cli.config {
        Some(path) => EmbedConfig::load(cwd.join(path))?,
        None => EmbedConfig::load_or_default(&root)?,
    };

    let mut builder = EmbedBuilder::from_config(&root, &config)?;
    if let Some(source) = cli.source {
        builder = builder.source(cwd.join(source));
    }
    if let Some(output) = cli.output {
        builder = builder.output(cwd.join(output));
    }

    if cli.check {
        return check(&builder);
    }

    let source = builder.source.clone();
    let output = builder
        .build()
        .with_context(|| format!("embedding {}", source.display()))?;

    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    status(
        "Embedded",
        Color::Green,
        &format!("{} into {}", source_name, output.display_path.display()),
    )?;

    Ok(ExitCode::SUCCESS)
}

fn check(builder: &EmbedBuilder) -> Result<ExitCode> {
    let path = builder.display_path();
    let freshness = builder
        .check()
        .with_context(|| format!("checking {}", path.display()))?;

    match freshness {
        Freshness::UpToDate => {
            status("up to date", Color::Green, &path.display().to_string())?;
            Ok(ExitCode::SUCCESS)
        }
        Freshness::Stale { reason } => {
            status(
                "stale",
                Color::Yellow,
                &format!("{} ({})", path.display(), reason),
            )?;
            Ok(ExitCode::FAILURE)
        }
        Freshness::Missing => {
            status("missing", Color::Red, &path.display().to_string())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print `<label> <message>` to stdout with a bold colored label
fn status(label: &str, color: Color, message: &str) -> io::Result<()> {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stdout, "{label}")?;
    stdout.reset()?;
    writeln!(stdout, " {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["docembed"]).unwrap();
        assert!(cli.root.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.check);
    }

    #[test]
    fn test_positional_arguments_rejected() {
        assert!(Cli::try_parse_from(["docembed", "README.md"]).is_err());
    }
}
