//! CLI module for Fleetwatch
//!
//! Command-line interface definitions and handlers for the fleet
//! monitoring console.
//!
//! # Commands
//!
//! - `watch` - Run the live console (poll + event stream)
//! - `services` - List services with health and worker counts
//! - `service` - Show one service in detail
//! - `overview` - Show the fleet-wide rollup
//! - `worker` - Dispatch worker commands (spawn, stop, evict)
//! - `stop-all` - Stop every worker under one manager
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Run the live console against a remote backend
//! fleetwatch watch --endpoint http://fleet.internal:8000
//!
//! # One-shot queries
//! fleetwatch services --json
//! fleetwatch service ocr
//!
//! # Worker control
//! fleetwatch worker spawn ocr gpu-0
//! fleetwatch worker evict ocr gpu-0 --yes
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod query;
pub mod watch;
pub mod worker;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{ConfigError, ConsoleConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Fleetwatch - Fleet Monitoring Console
#[derive(Parser, Debug)]
#[command(
    name = "fleetwatch",
    version,
    about = "Realtime monitoring console for worker fleets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live console
    Watch(WatchArgs),
    /// List services
    Services(ServicesArgs),
    /// Show one service in detail
    Service(ServiceArgs),
    /// Show the fleet-wide overview
    Overview(OverviewArgs),
    /// Dispatch worker commands
    #[command(subcommand)]
    Worker(WorkerCommands),
    /// Stop every worker under one manager
    StopAll(StopAllArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FLEETWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable the event stream (poll only)
    #[arg(long)]
    pub no_stream: bool,

    /// Disable polling (event stream only)
    #[arg(long)]
    pub no_poll: bool,
}

#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service id
    pub service_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug)]
pub struct OverviewArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum WorkerCommands {
    /// Spawn a worker
    Spawn(WorkerActionArgs),
    /// Stop a worker
    Stop(WorkerActionArgs),
    /// Forcibly evict a worker (destructive)
    Evict(WorkerActionArgs),
}

#[derive(Args, Debug)]
pub struct WorkerActionArgs {
    /// Service id
    pub service_id: String,

    /// Worker alias within the service
    pub alias: String,

    /// Skip the confirmation prompt (evict only)
    #[arg(short, long)]
    pub yes: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug)]
pub struct StopAllArgs {
    /// Worker manager id (same as its service id)
    pub manager_id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override backend endpoint
    #[arg(short, long, env = "FLEETWATCH_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with the shared override layering.
///
/// Missing config files fall back to defaults (an explicit path that
/// does not exist is not an error for one-shot commands); environment
/// variables and the endpoint flag apply on top.
pub fn load_config_with_overrides(
    path: &Path,
    endpoint: Option<&str>,
) -> Result<ConsoleConfig, ConfigError> {
    let mut config = if path.exists() {
        ConsoleConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ConsoleConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(endpoint) = endpoint {
        config.connection.endpoint = endpoint.to_string();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_watch_defaults() {
        let cli = Cli::try_parse_from(["fleetwatch", "watch"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.config, PathBuf::from("fleetwatch.toml"));
                assert!(!args.no_stream);
                assert!(!args.no_poll);
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_watch_with_endpoint() {
        let cli =
            Cli::try_parse_from(["fleetwatch", "watch", "-e", "http://10.0.0.2:8000"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.endpoint.as_deref(), Some("http://10.0.0.2:8000"));
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_services_json() {
        let cli = Cli::try_parse_from(["fleetwatch", "services", "--json"]).unwrap();
        match cli.command {
            Commands::Services(args) => assert!(args.json),
            _ => panic!("Expected Services command"),
        }
    }

    #[test]
    fn test_cli_parse_service_requires_id() {
        assert!(Cli::try_parse_from(["fleetwatch", "service"]).is_err());

        let cli = Cli::try_parse_from(["fleetwatch", "service", "ocr"]).unwrap();
        match cli.command {
            Commands::Service(args) => assert_eq!(args.service_id, "ocr"),
            _ => panic!("Expected Service command"),
        }
    }

    #[test]
    fn test_cli_parse_worker_spawn() {
        let cli = Cli::try_parse_from(["fleetwatch", "worker", "spawn", "ocr", "gpu-0"]).unwrap();
        match cli.command {
            Commands::Worker(WorkerCommands::Spawn(args)) => {
                assert_eq!(args.service_id, "ocr");
                assert_eq!(args.alias, "gpu-0");
                assert!(!args.yes);
            }
            _ => panic!("Expected Worker Spawn command"),
        }
    }

    #[test]
    fn test_cli_parse_worker_evict_with_yes() {
        let cli =
            Cli::try_parse_from(["fleetwatch", "worker", "evict", "ocr", "gpu-0", "--yes"])
                .unwrap();
        match cli.command {
            Commands::Worker(WorkerCommands::Evict(args)) => assert!(args.yes),
            _ => panic!("Expected Worker Evict command"),
        }
    }

    #[test]
    fn test_cli_parse_stop_all() {
        let cli = Cli::try_parse_from(["fleetwatch", "stop-all", "ocr", "-y"]).unwrap();
        match cli.command {
            Commands::StopAll(args) => {
                assert_eq!(args.manager_id, "ocr");
                assert!(args.yes);
            }
            _ => panic!("Expected StopAll command"),
        }
    }

    #[test]
    fn test_cli_parse_overview() {
        let cli = Cli::try_parse_from(["fleetwatch", "overview"]).unwrap();
        assert!(matches!(cli.command, Commands::Overview(_)));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        // Not asserting the exact endpoint: env-override tests elsewhere
        // in this binary may be toggling FLEETWATCH_* concurrently.
        let config =
            load_config_with_overrides(Path::new("/nonexistent/fleetwatch.toml"), None).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_endpoint_flag_wins() {
        let config = load_config_with_overrides(
            Path::new("/nonexistent/fleetwatch.toml"),
            Some("http://10.1.1.1:8000"),
        )
        .unwrap();
        assert_eq!(config.connection.endpoint, "http://10.1.1.1:8000");
    }

    #[test]
    fn test_load_config_invalid_endpoint_rejected() {
        let result = load_config_with_overrides(
            Path::new("/nonexistent/fleetwatch.toml"),
            Some("not a url"),
        );
        assert!(result.is_err());
    }
}
