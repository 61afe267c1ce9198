mod app;
mod cli;
mod commands;
mod config;
mod conversation;
mod core;
mod display;
mod extract;
mod gallery;
mod input;
mod providers;
mod session;
mod web;

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::Application;
use crate::cli::{Args, Command};
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::SitegenError;
use crate::gallery::Gallery;
use crate::gallery::sqlite::SqliteGallery;
use crate::providers::LLMProvider;
use crate::providers::cached::CachedProvider;
use crate::providers::factory::ProviderFactory;

fn init_tracing(command: &Command) {
    let default_directives = match command {
        Command::Serve { .. } => "sitegen=info,tower_http=info",
        _ => "sitegen=warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Opens the gallery when a database is configured. A store that cannot be
/// reached disables the gallery instead of stopping the program.
async fn connect_gallery(config: &Config, args: &Args) -> Option<Gallery> {
    let env = |name: &str| std::env::var(name).ok();
    let Some(url) = config.resolve_database_url(args.database_url.as_deref(), env) else {
        tracing::info!("no gallery database configured, gallery disabled");
        return None;
    };

    match SqliteGallery::connect(&url).await {
        Ok(store) => Some(Gallery::new(
            Arc::new(store),
            Duration::from_secs(config.gallery.listing_ttl_secs),
        )),
        Err(e) => {
            tracing::error!("failed to open gallery at {}: {}", url, e);
            None
        }
    }
}

async fn run(args: Args) -> Result<(), SitegenError> {
    let config = Config::load(args.config.as_deref())?;

    let resolved = config.resolve_provider(
        args.provider.as_deref(),
        args.model.as_deref(),
        |name| std::env::var(name).ok(),
    )?;
    tracing::info!(provider = ?resolved.provider, model = %resolved.model, "using provider");

    let mut provider: Arc<dyn LLMProvider> = ProviderFactory::new().create(&resolved)?;
    if config.completion.cache_ttl_secs > 0 {
        provider = Arc::new(CachedProvider::new(
            provider,
            Duration::from_secs(config.completion.cache_ttl_secs),
        ));
    }

    match &args.command {
        Command::Serve { bind } => {
            let gallery = connect_gallery(&config, &args).await;
            let bind = bind.as_deref().unwrap_or(&config.server.bind);
            web::serve(web::AppState::new(provider, gallery), bind).await
        }
        Command::Chat => {
            let gallery = connect_gallery(&config, &args).await;
            Application::new(provider, gallery, create_command_registry())
                .run_chat()
                .await
        }
        Command::Generate {
            description,
            output,
        } => {
            Application::new(provider, None, create_command_registry())
                .run_generate(description.as_deref(), output.as_deref())
                .await
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.command);

    if let Err(e) = run(args).await {
        tracing::debug!("exiting with error: {:?}", e);
        display::display_error(&e.user_message());
        std::process::exit(1);
    }
}
