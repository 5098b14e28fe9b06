//! Interactive play session for one player slot of one game

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::game::MoveDraft;
use crate::input::{parse_command, Command, HELP};
use crate::network::UpdateListener;
use crate::rendering::render_view;
use log::{info, warn};
use shared::{GameView, PlayerId, WordList};
use tokio::io::{AsyncBufReadExt, BufReader};

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Message(String),
    Redraw,
    Quit,
}

pub struct Session {
    api: ApiClient,
    game: String,
    player: PlayerId,
    dictionary: Option<WordList>,
    view: GameView,
    draft: MoveDraft,
}

impl Session {
    pub fn new(
        api: ApiClient,
        game: &str,
        player: PlayerId,
        dictionary: Option<WordList>,
        view: GameView,
    ) -> Self {
        let draft = MoveDraft::from_view(&view);
        Self {
            api,
            game: game.to_string(),
            player,
            dictionary,
            view,
            draft,
        }
    }

    pub async fn join(
        api: ApiClient,
        game: &str,
        player: PlayerId,
        dictionary: Option<WordList>,
    ) -> Result<Self, ClientError> {
        let view = api.fetch_game(game, player).await?;
        if !view.authenticated {
            warn!("Player {} of {} belongs to someone else, spectating", player, game);
        }
        Ok(Self::new(api, game, player, dictionary, view))
    }

    pub fn view(&self) -> &GameView {
        &self.view
    }

    pub fn draft(&self) -> &MoveDraft {
        &self.draft
    }

    /// Fetches the game again; pending tiles are dropped
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.view = self.api.fetch_game(&self.game, self.player).await?;
        self.draft = MoveDraft::from_view(&self.view);
        Ok(())
    }

    pub fn screen(&self) -> String {
        let mut screen = render_view(&self.view, self.player, Some(&self.draft));

        if let (Some(dictionary), false) = (&self.dictionary, self.draft.is_empty()) {
            let preview = match self.draft.preview(dictionary) {
                Ok(preview) => format!("{} points ({})", preview.score, preview.words.join(", ")),
                Err(e) => e.to_string(),
            };
            screen.push_str("\nPreview: ");
            screen.push_str(&preview);
        }

        screen
    }

    /// Applies a command that needs no network round trip
    ///
    /// Returns None for commands that must go through [`Session::handle`].
    pub fn apply_local(&mut self, command: Command) -> Option<Result<Flow, ClientError>> {
        let flow = match command {
            Command::Action(action) => match self.draft.apply(action) {
                Ok(()) => Ok(Flow::Redraw),
                Err(e) => Err(e.into()),
            },
            Command::Clear => {
                self.draft.clear();
                Ok(Flow::Redraw)
            }
            Command::Help => Ok(Flow::Message(HELP.to_string())),
            Command::Quit => Ok(Flow::Quit),
            Command::Submit | Command::Refresh => return None,
        };
        Some(flow)
    }

    pub async fn handle(&mut self, command: Command) -> Result<Flow, ClientError> {
        if let Some(flow) = self.apply_local(command) {
            return flow;
        }

        match command {
            Command::Refresh => {
                self.refresh().await?;
                Ok(Flow::Redraw)
            }
            Command::Submit => {
                let request = self.draft.to_request(self.player, self.dictionary.as_ref());
                let response = self.api.submit_move(&self.game, &request).await?;
                info!("Scored {} with {}", response.score, response.words.join(", "));
                self.refresh().await?;
                Ok(Flow::Message(format!(
                    "{} points for {}",
                    response.score,
                    response.words.join(", ")
                )))
            }
            _ => Ok(Flow::Continue),
        }
    }

    /// Reads commands from stdin until `quit` or end of input, redrawing
    /// whenever the opponent moves
    pub async fn run(&mut self, mut listener: Option<UpdateListener>) -> Result<(), ClientError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", self.screen());

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let outcome = match parse_command(&line) {
                        Ok(command) => self.handle(command).await,
                        Err(e) => Err(e),
                    };
                    match outcome {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Redraw) => println!("{}", self.screen()),
                        Ok(Flow::Message(message)) => println!("{}\n{}", self.screen(), message),
                        Ok(Flow::Continue) => {}
                        Err(e) => println!("{}", e),
                    }
                }
                update = next_update(&mut listener) => {
                    match update {
                        Ok(game) if game == self.game => {
                            self.refresh().await?;
                            println!("{}", self.screen());
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Update channel failed, continuing without it: {}", e);
                            listener = None;
                        }
                    }
                }
            }
        }

        if let Some(listener) = listener.as_mut() {
            listener.unsubscribe().await?;
        }
        Ok(())
    }
}

async fn next_update(listener: &mut Option<UpdateListener>) -> Result<String, ClientError> {
    match listener {
        Some(listener) => listener.next_update().await,
        None => std::future::pending().await,
    }
}
