//! Item Model Migrator CLI
//!
//! Upgrade a resource pack directory in place. Designed to run both by hand
//! and as a CI action step, where the pack path arrives in
//! `INPUT_INPUT_PATH` and the result is appended to `GITHUB_OUTPUT`.

use anyhow::Context;
use clap::Parser;
use item_model_migrator::fetch::DEFAULT_CLIENT_VERSION;
use item_model_migrator::{MigrationConfig, MigrationReport, Migrator};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "item-model-migrator")]
#[command(author, version, about = "Upgrade Minecraft resource packs to the item model format", long_about = None)]
struct Cli {
    /// Resource pack directory (containing assets/); INPUT_INPUT_PATH takes precedence
    input: Option<PathBuf>,

    /// Client jar to extract missing vanilla textures from
    #[arg(long, env = "CLIENT_JAR_PATH")]
    client_jar: Option<PathBuf>,

    /// Game version of the client jar to download
    #[arg(long, default_value = DEFAULT_CLIENT_VERSION)]
    client_version: String,

    /// Directory for downloaded client jars
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Never download or read a client jar
    #[arg(long)]
    offline: bool,

    /// Only convert item definitions, leave models and textures alone
    #[arg(long)]
    convert_only: bool,
}

impl Cli {
    /// The pack directory. A non-empty `INPUT_INPUT_PATH` wins over the argument.
    fn input_path(&self) -> Option<PathBuf> {
        std::env::var_os("INPUT_INPUT_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.input.clone())
    }

    fn config(&self) -> MigrationConfig {
        let mut config = if self.convert_only {
            MigrationConfig::conversion_only()
        } else {
            MigrationConfig::default()
        };
        config = config.with_client_version(&self.client_version);
        if let Some(jar) = &self.client_jar {
            config = config.with_client_jar(jar);
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if self.offline {
            config = config.offline();
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let Some(input) = cli.input_path() else {
        println!("::error::Input paths are required");
        return ExitCode::FAILURE;
    };
    info!("Input directory: {}", input.display());

    let success = match migrate(input, cli.config()) {
        Ok(_) => true,
        Err(e) => {
            error!("{:#}", e);
            false
        }
    };

    if let Err(e) = write_github_output(success) {
        error!("{:#}", e);
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn migrate(input: PathBuf, config: MigrationConfig) -> anyhow::Result<MigrationReport> {
    Migrator::with_config(&input, config)
        .run()
        .with_context(|| format!("Error processing directory {}", input.display()))
}

/// Append `success=<bool>` to the file named by `GITHUB_OUTPUT`, if set.
fn write_github_output(success: bool) -> anyhow::Result<()> {
    let Some(path) = std::env::var_os("GITHUB_OUTPUT") else {
        return Ok(());
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open GITHUB_OUTPUT {:?}", path))?;
    writeln!(file, "success={}", success)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_env_wins_over_argument() {
        let cli = Cli::parse_from(["item-model-migrator", "from-arg"]);

        std::env::set_var("INPUT_INPUT_PATH", "from-env");
        assert_eq!(cli.input_path(), Some(PathBuf::from("from-env")));

        std::env::set_var("INPUT_INPUT_PATH", "");
        assert_eq!(cli.input_path(), Some(PathBuf::from("from-arg")));

        std::env::remove_var("INPUT_INPUT_PATH");
        assert_eq!(cli.input_path(), Some(PathBuf::from("from-arg")));
        assert_eq!(Cli::parse_from(["item-model-migrator"]).input_path(), None);
    }
}
