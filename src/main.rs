use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use serenity::all::{Client, ClientBuilder, GatewayIntents, Http};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use daft::commands::{self, Music, youtube::YtDlp};
use daft::config::{Config, Mode};
use daft::discord::Handler;
use daft::player::GuildPlayers;
use daft::slash::{Registry, install};

type Error = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daft=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();
    let config = Config::parse();

    let registry = commands::registry(Music {
        players: Arc::new(GuildPlayers::new()),
        library: config.music_dir.clone(),
        resolver: Arc::new(YtDlp::new(config.ytdl.clone())),
    });

    match config.mode {
        Some(mode @ Mode::Install { .. }) => {
            let http = application_http(&config.token).await?;
            install::install(&http, &registry, mode.guild()).await?;
        }
        Some(mode @ Mode::Uninstall { .. }) => {
            let http = application_http(&config.token).await?;
            install::uninstall(&http, mode.guild()).await?;
        }
        None => run(&config.token, registry).await?,
    }

    Ok(())
}

/// REST client that knows its application id, which command endpoints need
async fn application_http(token: &str) -> Result<Http, Error> {
    let http = Http::new(token);
    let application = http.get_current_application_info().await?;
    http.set_application_id(application.id);
    Ok(http)
}

async fn run(token: &str, registry: Registry) -> Result<(), Error> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let client_builder =
        Client::builder(token, intents).event_handler(Handler::new(Arc::new(registry)));
    let mut client = build_client(client_builder).await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await.map_err(Into::into)
}

async fn build_client(client_builder: ClientBuilder) -> Result<Client, Error> {
    #[cfg(feature = "voice")]
    {
        use songbird::SerenityInit;

        Ok(client_builder.register_songbird().await?)
    }

    #[cfg(not(feature = "voice"))]
    {
        Ok(client_builder.await?)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
