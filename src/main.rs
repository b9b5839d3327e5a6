use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trickle::app::AppContext;
use trickle::cli::{commands, Cli, Commands};
use trickle::config::Config;
use trickle::daemon::{Daemon, DaemonConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Add { name, url } => {
            commands::add_feed(&ctx, &name, &url)?;
        }
        Commands::Remove { name } => {
            commands::remove_feed(&ctx, &name)?;
        }
        Commands::Update => {
            commands::update_feeds(&ctx).await?;
        }
        Commands::Status => {
            commands::show_status(&ctx)?;
        }
        Commands::List => {
            commands::list_feeds(&ctx)?;
        }
        Commands::Watch {
            interval,
            no_initial_update,
        } => {
            let mut watch = ctx.config.watch.clone();
            if let Some(interval) = interval {
                watch.interval = interval;
            }
            if no_initial_update {
                watch.update_on_start = false;
            }

            let daemon_config = DaemonConfig::try_from(&watch)?;
            Daemon::new(Arc::new(ctx), daemon_config).run().await?;
        }
    }

    Ok(())
}
