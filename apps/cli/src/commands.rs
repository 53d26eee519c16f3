//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use folder2md_core::{BuildConfig, BuildReport, ProgressReporter, build_document};
use folder2md_shared::{AppConfig, FileContent, FilterConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// folder2md: turn a source tree into a single Markdown document.
#[derive(Parser)]
#[command(
    name = "folder2md",
    version,
    about = "Render a directory tree and the contents of its files as one Markdown document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.folder2md/folder2md.toml.
    #[arg(long, env = "FOLDER2MD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write the folder structure and file contents of ROOT to OUTPUT.
    Build {
        /// Directory to traverse.
        root: PathBuf,

        /// Markdown file to write; `.md` is appended when it has no extension.
        output: PathBuf,

        /// Extensions to embed: `all` or a comma-separated list (e.g. `py,yaml,sh`).
        #[arg(short, long)]
        ext: Option<String>,

        /// Skip directories whose path contains this substring (repeatable).
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,

        /// Only directories whose path contains this substring produce output.
        #[arg(short, long)]
        marker: Option<String>,

        /// Drop the built-in exclusions (CLAM, .venv, __pycache__, .git).
        #[arg(long)]
        no_default_excludes: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "folder2md=info",
        1 => "folder2md=debug",
        _ => "folder2md=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Build {
            root,
            output,
            ext,
            exclude,
            marker,
            no_default_excludes,
        } => {
            let overrides = FilterOverrides {
                ext,
                exclude,
                marker,
                no_default_excludes,
            };
            cmd_build(config_path.as_deref(), root, &output, overrides)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Build flags layered over the loaded config.
#[derive(Debug, Default)]
struct FilterOverrides {
    ext: Option<String>,
    exclude: Vec<String>,
    marker: Option<String>,
    no_default_excludes: bool,
}

fn resolve_app_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

fn resolve_filter(mut config: AppConfig, overrides: FilterOverrides) -> Result<FilterConfig> {
    if let Some(ext) = overrides.ext {
        config.defaults.extensions = ext;
    }
    if overrides.no_default_excludes {
        config.filters.hard_excludes.clear();
    }
    config.filters.exclude_patterns.extend(overrides.exclude);
    if overrides.marker.is_some() {
        config.filters.subtree_marker = overrides.marker;
    }

    Ok(FilterConfig::try_from(&config)?)
}

/// Append `.md` to an output path that has no extension.
fn with_markdown_extension(output: &Path) -> PathBuf {
    if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.with_extension("md")
    }
}

fn cmd_build(
    config_path: Option<&Path>,
    root: PathBuf,
    output: &Path,
    overrides: FilterOverrides,
) -> Result<()> {
    let app_config = resolve_app_config(config_path)?;
    let filter = resolve_filter(app_config, overrides)?;

    let config = BuildConfig {
        root,
        output: with_markdown_extension(output),
        filter,
    };

    info!(
        root = %config.root.display(),
        output = %config.output.display(),
        extensions = %config.filter.extensions,
        "rendering folder"
    );

    let reporter = CliProgress::new();
    let report = build_document(&config, &reporter)
        .inspect_err(|_| reporter.spinner.finish_and_clear())?;

    let stats = &report.stats;
    println!();
    println!("  Document written!");
    println!("  Path:        {}", report.output.display());
    println!("  Directories: {}", stats.directories_written);
    println!("  Files:       {} listed, {} embedded", stats.files_listed, stats.files_embedded);
    if stats.undecodable + stats.read_failures > 0 {
        println!(
            "  Skipped:     {} undecodable, {} unreadable",
            stats.undecodable, stats.read_failures
        );
    }
    println!("  Time:        {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn directory(&self, path: &Path, _level: usize) {
        self.spinner.set_message(path.display().to_string());
    }

    fn file_embedded(&self, rel_path: &Path, content: &FileContent) {
        if !content.is_text() {
            self.spinner
                .println(format!("  placeholder written for {}", rel_path.display()));
        }
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_markdown_extension() {
        assert_eq!(with_markdown_extension(Path::new("docs/models")), PathBuf::from("docs/models.md"));
        assert_eq!(with_markdown_extension(Path::new("docs/deer.md")), PathBuf::from("docs/deer.md"));
        assert_eq!(with_markdown_extension(Path::new("out.txt")), PathBuf::from("out.txt"));
    }

    #[test]
    fn parses_build_command() {
        let cli = Cli::try_parse_from([
            "folder2md",
            "build",
            "./trima/healnet/models",
            "docs/trima_models",
            "--ext",
            "py,yaml,sh,md",
            "-x",
            "legacy",
            "--exclude",
            "scratch",
            "--marker",
            "models",
        ])
        .expect("parse");

        match cli.command {
            Command::Build {
                root,
                output,
                ext,
                exclude,
                marker,
                no_default_excludes,
            } => {
                assert_eq!(root, PathBuf::from("./trima/healnet/models"));
                assert_eq!(output, PathBuf::from("docs/trima_models"));
                assert_eq!(ext.as_deref(), Some("py,yaml,sh,md"));
                assert_eq!(exclude, vec!["legacy".to_string(), "scratch".to_string()]);
                assert_eq!(marker.as_deref(), Some("models"));
                assert!(!no_default_excludes);
            }
            Command::Config { .. } => panic!("expected build command"),
        }
    }

    #[test]
    fn flags_override_config_values() {
        let mut app = AppConfig::default();
        app.filters.exclude_patterns = vec!["web/src/core/sse".into()];

        let filter = resolve_filter(
            app,
            FilterOverrides {
                ext: Some("ts,tsx".into()),
                exclude: vec!["web/src/app/landing".into()],
                marker: Some("web/src".into()),
                no_default_excludes: true,
            },
        )
        .expect("resolve");

        assert!(filter.extensions.allows("tsx"));
        assert!(!filter.extensions.allows("py"));
        assert!(filter.hard_excludes.is_empty());
        assert_eq!(filter.exclude_patterns, vec!["web/src/core/sse", "web/src/app/landing"]);
        assert_eq!(filter.subtree_marker.as_deref(), Some("web/src"));
    }

    #[test]
    fn config_values_survive_without_flags() {
        let mut app = AppConfig::default();
        app.defaults.extensions = "py".into();
        app.filters.subtree_marker = Some("src".into());

        let filter = resolve_filter(app, FilterOverrides::default()).expect("resolve");
        assert!(filter.extensions.allows("py"));
        assert_eq!(filter.hard_excludes.len(), 4);
        assert_eq!(filter.subtree_marker.as_deref(), Some("src"));
    }

    #[test]
    fn invalid_extension_flag_is_an_error() {
        let result = resolve_filter(
            AppConfig::default(),
            FilterOverrides {
                ext: Some(",".into()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }
}
