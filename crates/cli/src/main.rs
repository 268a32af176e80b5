//! ghprojects command-line tool.
//!
//! Provides subcommands for reconciling settings between the GitHub Projects
//! CLI config and the editor settings, generating branch names for issues,
//! ranking existing branches against an issue, and generating / validating
//! the tool's own configuration file.

mod branch;
mod settings;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ghprojects_core::config::AppConfig;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// ghprojects command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "ghprojects",
    version,
    about = "Sync GitHub Projects settings and manage issue branches"
)]
struct Cli {
    /// Path to the TOML configuration file [default: ~/.config/ghprojects/config.toml].
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare and reconcile CLI and editor settings.
    Settings {
        #[command(subcommand)]
        action: settings::SettingsAction,
    },

    /// Generate and rank branch names.
    Branch {
        #[command(subcommand)]
        action: branch::BranchAction,
    },

    /// Manage the ghprojects configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./ghprojects.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);

    init_logging(cli.verbose, &config_path);

    match run(cli, &config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins, then `--verbose`, then `logging.level` from the config.
fn init_logging(verbose: bool, config_path: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose {
            "debug".to_string()
        } else {
            AppConfig::load_or_default(config_path)
                .map(|config| config.logging.level)
                .unwrap_or_else(|_| "warn".to_string())
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli, config_path: &Path) -> Result<()> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init { output } => cmd_init(&output),
            ConfigAction::Validate => cmd_validate(config_path),
        },
        Commands::Settings { action } => {
            let config = load_config(config_path)?;
            settings::run_settings(action, &config)
        }
        Commands::Branch { action } => {
            let config = load_config(config_path)?;
            branch::run_branch(action, &config)
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_and_validate(path).context("failed to load configuration file")
}

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create config directory")?;
        }
    }
    std::fs::write(output, AppConfig::default_template())
        .context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!("Default configuration written to {}", output.display()))
    );
    println!();
    println!("Next steps:");
    println!("  1. Point [cli_config] and [editor] at your settings files if needed");
    println!(
        "  2. Validate with: ghprojects config validate --config {}",
        output.display()
    );
    println!(
        "  3. Compare settings: ghprojects settings diff --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  {}", style::success("TOML structure is valid"));

    match config.validate() {
        Ok(()) => println!("  {}", style::success("All values are valid")),
        Err(e) => {
            println!("  {}", style::error(&format!("Validation error: {}", e)));
            anyhow::bail!("configuration validation failed");
        }
    }

    let cli_store = config.cli_store().context("failed to locate CLI config")?;
    let editor_store = config
        .editor_store(None)
        .context("failed to locate editor settings")?;

    println!();
    println!("{}", style::header("Configuration summary"));
    println!("  CLI config     : {}", cli_store.path().display());
    println!(
        "  Editor settings: {} ({})",
        editor_store.path().display(),
        editor_store.target()
    );
    println!("  Branch pattern : {}", config.branch.pattern);
    println!("  Max length     : {}", config.branch.max_length);
    println!(
        "  Default user   : {}",
        config.branch.user.as_deref().unwrap_or("-")
    );

    Ok(())
}
