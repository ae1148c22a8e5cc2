use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchcast::app::AppContext;
use matchcast::cli::{commands, Cli, Commands, ConfigAction};
use matchcast::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        commands::config_init(cli.config.as_deref(), force)?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { allow_empty_start } => {
            let ctx = AppContext::new(config)?;
            commands::serve(ctx, allow_empty_start).await?;
        }
        Commands::Fetch { url, day } => {
            let ctx = AppContext::new(config)?;
            commands::fetch(&ctx, url.as_deref(), day.as_deref()).await?;
        }
        Commands::Parse { path, day } => {
            commands::parse_file(&config, &path, day.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&config)?,
            ConfigAction::Init { .. } => {}
        },
    }

    Ok(())
}
