//! Per-game exclusive read-modify-write over a `GameStore`
//!
//! Every operation holds the lock of its game id from load to persist, so
//! two moves on the same game are linearized while different games proceed
//! in parallel. A lock entry lives only while someone holds or waits for it.
//! Store calls run on the blocking pool since `FileStore` does file I/O.

use crate::error::{GameError, StoreError};
use crate::game::{Game, GameId, RackPolicy, Submission};
use crate::network::GameMessage;
use crate::store::GameStore;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Dictionary, GameView, MoveRequest, MoveResponse, PlayerId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};

pub type SharedDictionary = Arc<dyn Dictionary + Send + Sync>;

type LockMap = StdMutex<HashMap<GameId, Arc<Mutex<()>>>>;

/// Exclusive hold on one game id
///
/// Dropping it releases the game and forgets the entry when nobody else is
/// waiting on it.
struct GameLock<'a> {
    locks: &'a LockMap,
    id: GameId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameLock<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

pub struct GameService {
    store: Arc<dyn GameStore>,
    dictionary: SharedDictionary,
    rack_policy: RackPolicy,
    locks: LockMap,
    rng: StdMutex<StdRng>,
    notifier: Option<mpsc::UnboundedSender<GameMessage>>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, dictionary: SharedDictionary) -> Self {
        Self {
            store,
            dictionary,
            rack_policy: RackPolicy::default(),
            locks: StdMutex::new(HashMap::new()),
            rng: StdMutex::new(StdRng::from_entropy()),
            notifier: None,
        }
    }

    pub fn with_rack_policy(mut self, rack_policy: RackPolicy) -> Self {
        self.rack_policy = rack_policy;
        self
    }

    /// Replaces the random source with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdMutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Sends a `Packet::Update` broadcast after every committed move
    pub fn with_notifier(mut self, notifier: mpsc::UnboundedSender<GameMessage>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    async fn lock_game(&self, id: &GameId) -> GameLock<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.clone()).or_default())
        };

        let guard = lock.lock_owned().await;
        GameLock {
            locks: &self.locks,
            id: id.clone(),
            guard: Some(guard),
        }
    }

    /// Number of game ids currently locked or awaited
    pub fn active_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    async fn load(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        let store = Arc::clone(&self.store);
        let id = id.clone();
        tokio::task::spawn_blocking(move || store.get(&id)).await?
    }

    async fn save(&self, id: &GameId, game: &Game) -> Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        let id = id.clone();
        let game = game.clone();
        tokio::task::spawn_blocking(move || store.set(&id, &game)).await?
    }

    /// Loads the game, creating it on first sight, binds `identity` to the
    /// slot if it is still free and returns the caller's view
    pub async fn join_or_fetch(
        &self,
        id: &GameId,
        identity: &str,
        player: PlayerId,
        name: &str,
    ) -> Result<GameView, GameError> {
        let _lock = self.lock_game(id).await;

        let (mut game, mut dirty) = match self.load(id).await? {
            Some(game) => (game, false),
            None => {
                info!("Creating game {}", id);
                (self.with_rng(|rng| Game::new(rng)), true)
            }
        };

        if game.bind_identity(player, identity, name) {
            info!("Player {} of game {} joined as {}", player, id, name);
            dirty = true;
        }

        if dirty {
            self.save(id, &game).await?;
        }

        debug!("Serving game {} to player {}", id, player);
        Ok(game.view(player, identity))
    }

    /// Validates and commits a move, then notifies subscribers
    ///
    /// Rejections come in this order: unknown game, invalid player, wrong
    /// turn, identity mismatch (including no identity), then the move itself.
    pub async fn submit_move(
        &self,
        id: &GameId,
        identity: Option<&str>,
        request: MoveRequest,
    ) -> Result<MoveResponse, GameError> {
        let _lock = self.lock_game(id).await;

        let mut game = self.load(id).await?.ok_or(GameError::GameNotFound)?;
        let (player, submission) = Submission::from_request(request)?;

        let outcome = self.with_rng(|rng| {
            game.apply_move(
                player,
                identity,
                &submission,
                self.dictionary.as_ref(),
                self.rack_policy,
                rng,
            )
        });

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Rejected move in game {} by player {}: {}", id, player, e);
                return Err(e);
            }
        };

        if outcome.claimed_score != i64::from(outcome.score) {
            warn!(
                "Player {} of game {} claimed {} points, awarded {}",
                player, id, outcome.claimed_score, outcome.score
            );
        }

        self.save(id, &game).await?;
        self.notify(id);

        Ok(MoveResponse {
            score: outcome.score,
            words: outcome.words,
        })
    }

    fn notify(&self, id: &GameId) {
        if let Some(notifier) = &self.notifier {
            if notifier.send(GameMessage::game_updated(id.as_str())).is_err() {
                warn!("Notification channel closed, update for {} dropped", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use shared::{Letter, MoveError, Packet, Position, WordList};
    use std::collections::BTreeMap;

    struct Fixture {
        service: Arc<GameService>,
        store: Arc<MemoryStore>,
        updates: mpsc::UnboundedReceiver<GameMessage>,
        id: GameId,
    }

    fn letters(s: &str) -> Vec<Letter> {
        s.chars().filter_map(Letter::new).collect()
    }

    fn at(x: usize, y: usize) -> shared::Index {
        Position::new(x, y).unwrap().to_index()
    }

    /// Service with game "table" created, both slots bound and known racks
    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let dictionary: SharedDictionary = Arc::new(WordList::from_words(["CAT", "CATS", "AT"]));
        let (tx, updates) = mpsc::unbounded_channel();
        let service = GameService::new(store.clone(), dictionary)
            .with_seed(7)
            .with_notifier(tx);

        let id = GameId::parse("table").unwrap();
        service
            .join_or_fetch(&id, "token-1", PlayerId::One, "ada")
            .await
            .unwrap();
        service
            .join_or_fetch(&id, "token-2", PlayerId::Two, "bob")
            .await
            .unwrap();

        let mut game = store.get(&id).unwrap().unwrap();
        game.players.one.rack = letters("CATSXYZ");
        game.players.two.rack = letters("EEEEEEE");
        store.set(&id, &game).unwrap();

        Fixture {
            service: Arc::new(service),
            store,
            updates,
            id,
        }
    }

    fn cat_request(player: &str) -> MoveRequest {
        let mut placement = BTreeMap::new();
        placement.insert(at(6, 7), Letter::new('C').unwrap());
        placement.insert(at(7, 7), Letter::new('A').unwrap());
        placement.insert(at(8, 7), Letter::new('T').unwrap());
        MoveRequest {
            player: player.to_string(),
            letters: placement,
            score: 10,
            letters_on_hand: letters("SXYZ"),
        }
    }

    #[tokio::test]
    async fn test_first_join_creates_and_binds() {
        let store = Arc::new(MemoryStore::new());
        let service = GameService::new(store.clone(), Arc::new(WordList::default())).with_seed(1);
        let id = GameId::parse("fresh").unwrap();

        let view = service
            .join_or_fetch(&id, "token", PlayerId::One, "ada")
            .await
            .unwrap();
        assert!(view.authenticated);
        assert_eq!(view.rack.len(), shared::RACK_SIZE);
        assert_eq!(view.players.one.name, "ada");
        assert_eq!(view.players.two.name, "anonymous");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_binding_is_never_overwritten() {
        let f = fixture().await;

        let view = f
            .service
            .join_or_fetch(&f.id, "intruder", PlayerId::One, "eve")
            .await
            .unwrap();
        assert!(!view.authenticated);
        assert!(view.rack.is_empty());
        assert_eq!(view.players.one.name, "ada");

        let game = f.store.get(&f.id).unwrap().unwrap();
        assert_eq!(game.players.one.identity.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn test_fetch_existing_game_does_not_persist() {
        let f = fixture().await;
        let before = serde_json::to_string(&f.store.get(&f.id).unwrap()).unwrap();

        f.service
            .join_or_fetch(&f.id, "token-1", PlayerId::One, "ada")
            .await
            .unwrap();

        let after = serde_json::to_string(&f.store.get(&f.id).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_valid_move_persists_and_notifies_once() {
        let mut f = fixture().await;

        let response = f
            .service
            .submit_move(&f.id, Some("token-1"), cat_request("1"))
            .await
            .unwrap();
        assert_eq!(response.score, 10);
        assert_eq!(response.words, vec!["CAT".to_string()]);

        let game = f.store.get(&f.id).unwrap().unwrap();
        assert_eq!(game.players.one.score, 10);
        assert_eq!(game.current_turn, PlayerId::Two);

        match f.updates.try_recv() {
            Ok(GameMessage::BroadcastPacket { packet, .. }) => {
                assert_eq!(
                    packet,
                    Packet::Update {
                        game_id: "table".to_string()
                    }
                );
            }
            other => panic!("Unexpected message {:?}", other),
        }
        assert!(f.updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rejected_moves_leave_store_identical() {
        let mut f = fixture().await;
        let before = serde_json::to_string(&f.store.get(&f.id).unwrap()).unwrap();

        let wrong_turn = f
            .service
            .submit_move(&f.id, Some("token-2"), cat_request("2"))
            .await;
        assert!(matches!(wrong_turn, Err(GameError::NotYourTurn)));

        let wrong_token = f
            .service
            .submit_move(&f.id, Some("token-2"), cat_request("1"))
            .await;
        assert!(matches!(wrong_token, Err(GameError::Unauthorized)));

        let mut unknown = cat_request("1");
        unknown.letters.insert(at(9, 7), Letter::new('X').unwrap());
        unknown.letters_on_hand = letters("SYZ");
        let result = f.service.submit_move(&f.id, Some("token-1"), unknown).await;
        match result {
            Err(GameError::InvalidMove(MoveError::WordsNotInDictionary { words })) => {
                assert_eq!(words, vec!["CATX".to_string()]);
            }
            other => panic!("Unexpected result {:?}", other),
        }

        let after = serde_json::to_string(&f.store.get(&f.id).unwrap()).unwrap();
        assert_eq!(before, after);
        assert!(f.updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_game_and_player() {
        let f = fixture().await;
        let missing = GameId::parse("nowhere").unwrap();

        let result = f
            .service
            .submit_move(&missing, Some("token-1"), cat_request("1"))
            .await;
        assert!(matches!(result, Err(GameError::GameNotFound)));

        let result = f.service.submit_move(&f.id, Some("token-1"), cat_request("3")).await;
        assert!(matches!(result, Err(GameError::InvalidPlayer)));
    }

    #[tokio::test]
    async fn test_unknown_game_is_reported_before_player() {
        let f = fixture().await;
        let missing = GameId::parse("nowhere").unwrap();

        let result = f.service.submit_move(&missing, Some("t"), cat_request("3")).await;
        assert!(matches!(result, Err(GameError::GameNotFound)));
    }

    #[tokio::test]
    async fn test_turn_is_checked_before_identity() {
        let f = fixture().await;

        let result = f.service.submit_move(&f.id, None, cat_request("2")).await;
        assert!(matches!(result, Err(GameError::NotYourTurn)));

        let result = f.service.submit_move(&f.id, None, cat_request("1")).await;
        assert!(matches!(result, Err(GameError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_lock_entries_are_released() {
        let f = fixture().await;
        assert_eq!(f.service.active_locks(), 0);

        for i in 0..100 {
            let ghost = GameId::parse(&format!("ghost{}", i)).unwrap();
            let result = f
                .service
                .submit_move(&ghost, Some("token-1"), cat_request("1"))
                .await;
            assert!(matches!(result, Err(GameError::GameNotFound)));
        }
        assert_eq!(f.service.active_locks(), 0);
        assert_eq!(f.store.len(), 1);

        f.service
            .submit_move(&f.id, Some("token-1"), cat_request("1"))
            .await
            .unwrap();
        assert_eq!(f.service.active_locks(), 0);
    }

    #[tokio::test]
    async fn test_file_store_backs_the_service() {
        let root = std::env::temp_dir().join(format!("wordfeud-service-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let store = Arc::new(crate::store::FileStore::open(&root).unwrap());
        let service = GameService::new(store.clone(), Arc::new(WordList::default())).with_seed(9);
        let id = GameId::parse("on-disk").unwrap();

        let view = service
            .join_or_fetch(&id, "token-1", PlayerId::One, "ada")
            .await
            .unwrap();
        assert!(view.authenticated);
        assert!(root.join("games").join("on-disk.json").exists());
        assert_eq!(service.active_locks(), 0);

        let reopened = crate::store::FileStore::open(&root).unwrap();
        let game = reopened.get(&id).unwrap().unwrap();
        assert_eq!(game.players.one.identity.as_deref(), Some("token-1"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_claimed_score_is_advisory() {
        let f = fixture().await;
        let mut request = cat_request("1");
        request.score = 999;

        let response = f
            .service
            .submit_move(&f.id, Some("token-1"), request)
            .await
            .unwrap();
        assert_eq!(response.score, 10);
        assert_eq!(f.store.get(&f.id).unwrap().unwrap().players.one.score, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_are_linearized() {
        let mut f = fixture().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&f.service);
                let id = f.id.clone();
                tokio::spawn(async move { service.submit_move(&id, Some("token-1"), cat_request("1")).await })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(GameError::NotYourTurn) => {}
                Err(e) => panic!("Unexpected error {:?}", e),
            }
        }
        assert_eq!(accepted, 1);

        let game = f.store.get(&f.id).unwrap().unwrap();
        assert_eq!(game.players.one.score, 10);
        assert!(f.updates.try_recv().is_ok());
        assert!(f.updates.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_create_one_game() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(
            GameService::new(store.clone(), Arc::new(WordList::default())).with_seed(3),
        );
        let id = GameId::parse("race").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let id = id.clone();
                tokio::spawn(async move {
                    service
                        .join_or_fetch(&id, &format!("token-{}", i), PlayerId::One, "racer")
                        .await
                })
            })
            .collect();

        let mut authenticated = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().authenticated {
                authenticated += 1;
            }
        }
        assert_eq!(authenticated, 1);
        assert_eq!(store.len(), 1);
    }
}
