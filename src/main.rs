use clap::Parser;
use mediavault::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediavault=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, title }) => {
            mediavault::cli::init::run(path, title).await?;
        }
        Some(Commands::Serve { host, port }) => {
            mediavault::cli::serve::run(&cli.config, host, port).await?;
        }
        Some(Commands::Migrate { command }) => {
            mediavault::cli::migrate::run(&cli.config, command).await?;
        }
        Some(Commands::User { command }) => {
            mediavault::cli::user::run(&cli.config, command).await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
