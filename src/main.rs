use clap::Parser;
use fleetwatch::cli::{
    handle_completions, handle_config_init, query, watch, worker, Cli, Commands, ConfigCommands,
    WorkerCommands,
};
use fleetwatch::cli::worker::WorkerAction;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => watch::run_watch(&args).await,
        Commands::Services(args) => match query::handle_services(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Service(args) => match query::handle_service(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Overview(args) => match query::handle_overview(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Worker(cmd) => {
            let (action, args) = match cmd {
                WorkerCommands::Spawn(args) => (WorkerAction::Spawn, args),
                WorkerCommands::Stop(args) => (WorkerAction::Stop, args),
                WorkerCommands::Evict(args) => (WorkerAction::Evict, args),
            };
            match worker::handle_worker_command(action, &args).await {
                Ok(output) => {
                    println!("{}", output);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Commands::StopAll(args) => match worker::handle_stop_all(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
