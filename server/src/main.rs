use clap::Parser;
use log::{error, info};
use server::api;
use server::config::ServerConfig;
use server::network::NotificationServer;
use server::service::GameService;
use server::store::{FileStore, GameStore, MemoryStore};
use shared::WordList;
use std::future::IntoFuture;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ServerConfig::parse();

    let dictionary = WordList::load(&config.words)?;
    info!(
        "Loaded {} words from {}",
        dictionary.len(),
        config.words.display()
    );

    let store: Arc<dyn GameStore> = match &config.data_dir {
        Some(dir) => {
            info!("Persisting games under {}", dir.display());
            Arc::new(FileStore::open(dir)?)
        }
        None => {
            info!("Keeping games in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let mut notifier = NotificationServer::new(
        &config.notify_addr(),
        config.max_subscribers,
        config.subscriber_timeout(),
    )
    .await?;

    let service = GameService::new(store, Arc::new(dictionary))
        .with_rack_policy(config.rack_policy())
        .with_notifier(notifier.sender());
    let app = api::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(config.http_addr()).await?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    let notify_handle = tokio::spawn(async move { notifier.run().await });

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("HTTP server failed: {}", e);
            }
        }
        result = notify_handle => {
            match result {
                Ok(Err(e)) => error!("Notification server failed: {}", e),
                Err(e) => error!("Notification task panicked: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
