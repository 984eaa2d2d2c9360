//! Config command handlers

use crate::cli::ConfigInitArgs;

/// The example configuration written by `config init`.
const EXAMPLE_CONFIG: &str = include_str!("../../fleetwatch.example.toml");

/// Write a starter configuration file.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        )
        .into());
    }

    std::fs::write(&args.output, EXAMPLE_CONFIG)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
