use clap::{Parser, Subcommand};
use client::api::ApiClient;
use client::network::UpdateListener;
use client::rendering::render_view;
use client::session::Session;
use log::{info, warn};
use shared::{PlayerId, WordList};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the game server
    #[arg(short = 's', long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// UDP address of the notification server
    #[arg(short = 'n', long, default_value = "127.0.0.1:3001")]
    notify: String,

    /// Player slot, 1 or 2
    #[arg(short = 'p', long, default_value = "1")]
    player: PlayerId,

    /// Secret identifying you; the first token used for a slot owns it
    #[arg(short = 't', long)]
    token: String,

    /// Display name shown to the opponent
    #[arg(long)]
    name: Option<String>,

    /// Word list used to preview scores before submitting
    #[arg(short = 'w', long)]
    words: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the game once
    Show { game: String },
    /// Play interactively
    Play { game: String },
    /// Print the game every time it changes
    Watch { game: String },
}

async fn subscribe(addr: &str) -> Option<UpdateListener> {
    let mut listener = match UpdateListener::new(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Cannot listen for updates: {}", e);
            return None;
        }
    };

    match listener.subscribe().await {
        Ok(_) => Some(listener),
        Err(e) => {
            warn!("Update subscription failed: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let api = ApiClient::new(&args.server, &args.token, args.name.as_deref());

    match args.command {
        Command::Show { game } => {
            let view = api.fetch_game(&game, args.player).await?;
            println!("{}", render_view(&view, args.player, None));
        }

        Command::Play { game } => {
            let dictionary = match &args.words {
                Some(path) => {
                    let words = WordList::load(path)?;
                    info!("Loaded {} words for previews", words.len());
                    Some(words)
                }
                None => None,
            };

            let mut session = Session::join(api, &game, args.player, dictionary).await?;
            let listener = subscribe(&args.notify).await;
            session.run(listener).await?;
        }

        Command::Watch { game } => {
            let mut listener = UpdateListener::new(&args.notify).await?;
            listener.subscribe().await?;

            let view = api.fetch_game(&game, args.player).await?;
            println!("{}", render_view(&view, args.player, None));

            loop {
                tokio::select! {
                    update = listener.next_update() => {
                        if update? == game {
                            let view = api.fetch_game(&game, args.player).await?;
                            println!("{}", render_view(&view, args.player, None));
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        listener.unsubscribe().await?;
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
