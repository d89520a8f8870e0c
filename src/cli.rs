//! Command-line interface for yamlcheck.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::check::Runner;
use crate::config::{self, Config, DEFAULT_CONFIG_NAMES};
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default configuration written by `yamlcheck init`.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Lint YAML files: detect syntax errors and report rule issues.
#[derive(Parser)]
#[command(name = "yamlcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint YAML files
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to configuration file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Show suppressed issues in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Analyze files in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "yamlcheck.yaml")]
    pub output: PathBuf,
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over `--verbose`.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Find a configuration file in `dir`.
fn discover_config(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load the configuration given on the command line, a discovered one, or
/// the defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => discover_config(Path::new(".")),
    };

    let config = match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading configuration");
            Config::parse_file(&p)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?
        }
        None => Config::default(),
    };

    config::validate(&config)?;
    Ok(config)
}

/// Collect YAML files under `root`.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories, but not the root itself
            !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !config.has_yaml_extension(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) {
            tracing::debug!(path = %path.display(), "excluded by configuration");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config)?
    } else {
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let fail_on = config.fail_on;
    let runner = Runner::new().config(config).parallel(args.parallel);
    let result = runner.run(&files);
    let passed = !result.has_failures(fail_on);

    let path_str = args.path.to_string_lossy().to_string();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        Format::Json => report::write_json(&mut out, &path_str, &result, passed)?,
        Format::Sarif => report::write_sarif(&mut out, &abs_path, &result)?,
        Format::Pretty => {
            report::write_pretty(&mut out, &path_str, &result, passed, args.show_suppressed)?
        }
    }
    out.flush()?;

    if passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: yamlcheck lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_is_valid_config() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_collect_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("charts/templates")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join("a.yaml"), "a: 1\n").unwrap();
        std::fs::write(root.join("b.yml"), "b: 1\n").unwrap();
        std::fs::write(root.join("c.json"), "{}").unwrap();
        std::fs::write(root.join("charts/templates/d.yaml"), "d: 1\n").unwrap();
        std::fs::write(root.join(".git/e.yaml"), "e: 1\n").unwrap();

        let config = Config {
            excluded_paths: vec!["charts/templates/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(root, &config).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_run_init_writes_template() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("nested/yamlcheck.yaml");
        let args = InitArgs {
            output: output.clone(),
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert!(Config::parse_file(&output).is_ok());
        // Refuses to overwrite
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_discover_config() {
        let temp = TempDir::new().unwrap();
        assert!(discover_config(temp.path()).is_none());
        std::fs::write(temp.path().join(".yamlcheck.yml"), "fail_on: warning\n").unwrap();
        assert_eq!(
            discover_config(temp.path()),
            Some(temp.path().join(".yamlcheck.yml"))
        );
    }
}
