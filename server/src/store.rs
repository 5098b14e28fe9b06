//! Persistence interface for games
//!
//! The service only ever talks to a `GameStore`. Two backends exist: a plain
//! in-memory map, and a directory of JSON documents fronted by a
//! write-through cache. Both are synchronous; the service calls them from
//! the blocking thread pool.

use crate::error::StoreError;
use crate::game::{Game, GameId};
use log::{debug, error};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Key-value storage of games by id
///
/// Implementations must give read-your-writes within one process. Callers
/// serialize access per game id themselves.
pub trait GameStore: Send + Sync {
    fn get(&self, id: &GameId) -> Result<Option<Game>, StoreError>;
    fn set(&self, id: &GameId, game: &Game) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, Game>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    fn get(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        Ok(games.get(id).cloned())
    }

    fn set(&self, id: &GameId, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.insert(id.clone(), game.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per game under `<root>/games/`
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    cache: MemoryStore,
}

impl FileStore {
    /// Opens the store, creating `<root>/games` if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = root.as_ref().join("games");
        fs::create_dir_all(&dir)?;
        debug!("File store rooted at {}", dir.display());

        Ok(Self {
            dir,
            cache: MemoryStore::new(),
        })
    }

    fn path_for(&self, id: &GameId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl GameStore for FileStore {
    fn get(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        if let Some(game) = self.cache.get(id)? {
            return Ok(Some(game));
        }

        let text = match fs::read_to_string(self.path_for(id)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                error!("Failed to read game {}: {}", id, e);
                return Err(e.into());
            }
        };

        let game: Game = serde_json::from_str(&text)?;
        self.cache.set(id, &game)?;
        Ok(Some(game))
    }

    fn set(&self, id: &GameId, game: &Game) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(game)?;
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        self.cache.set(id, game)
    }
}
