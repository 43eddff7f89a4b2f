use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex},
};

use chrono::Utc;

use crate::{
    domain::{
        GameId, PaginatedResponse, Pagination, PlayerId, RepoError, RepoRetrieveError,
        RepoUpdateError, TelegramId,
        access::AdminPolicy,
        game::{Game, GameQuery, GameRepository, GameUpdate, NewGame},
        player::{NewPlayer, Player, PlayerRepository, PlayerUpdate},
        role::{GameStatus, Role},
        seat::{Seat, SeatNumber},
        user::{TelegramUser, UserRepository},
    },
    ports::avatar::{AvatarStorage, AvatarStorageError, DEFAULT_AVATAR_NAME},
};

pub const ADMIN: TelegramId = TelegramId(1);
pub const STRANGER: TelegramId = TelegramId(2);

pub fn admin_policy() -> AdminPolicy {
    AdminPolicy::new(ADMIN)
}

#[derive(Default)]
struct MockState {
    players: BTreeMap<PlayerId, Player>,
    games: BTreeMap<GameId, Game>,
    users: Vec<TelegramUser>,
    next_id: i64,
    failing: bool,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for every repository.
#[derive(Clone, Default)]
pub struct MockClubRepository {
    state: Arc<Mutex<MockState>>,
}

#[allow(unused)]
impl MockClubRepository {
    /// Makes every following call fail with a storage error.
    pub fn fail_storage(&self) {
        self.state.lock().unwrap().failing = true;
    }

    pub fn add_player(&self, nickname: &str) -> Player {
        let mut state = self.state.lock().unwrap();
        let id = PlayerId(state.next_id());
        let player = Player {
            id,
            full_name: None,
            nickname: Some(nickname.to_string()),
            avatar_path: None,
        };
        state.players.insert(id, player.clone());
        player
    }

    pub fn add_draft_game(&self) -> Game {
        let mut state = self.state.lock().unwrap();
        let id = GameId(state.next_id());
        let game = Game {
            id,
            status: GameStatus::Draft,
            result: None,
            created_at: Utc::now(),
            comments: String::new(),
            seats: Vec::new(),
            first_killed: None,
            best_move: None,
        };
        state.games.insert(id, game.clone());
        game
    }

    /// A draft game with fresh players seated in order: 1 don, 2 sheriff,
    /// 3-4 mafia, the rest civilians.
    pub fn add_seated_game(&self, players: usize) -> Game {
        let mut game = self.add_draft_game();
        for i in 1..=players {
            let role = match i {
                1 => Role::Don,
                2 => Role::Sheriff,
                3 | 4 => Role::Mafia,
                _ => Role::Civilian,
            };
            let player = self.add_player(&format!("player{}", i));
            let number = SeatNumber::new(i as i64).expect("seat in range");
            game.seats.push(Seat::new(number, player, role));
        }
        self.put_game(game.clone());
        game
    }

    pub fn put_game(&self, game: Game) {
        self.state.lock().unwrap().games.insert(game.id, game);
    }

    pub fn game(&self, id: GameId) -> Option<Game> {
        self.state.lock().unwrap().games.get(&id).cloned()
    }

    pub fn player(&self, id: PlayerId) -> Option<Player> {
        self.state.lock().unwrap().players.get(&id).cloned()
    }

    fn check(&self) -> Result<(), String> {
        if self.state.lock().unwrap().failing {
            Err("disk on fire".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockClubRepository {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let id = PlayerId(state.next_id());
        let player = Player {
            id,
            full_name: player.full_name,
            nickname: player.nickname,
            avatar_path: None,
        };
        state.players.insert(id, player.clone());
        Ok(player)
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        self.player(player_id).ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_players(
        &self,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Player>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        let ended_games = |id: PlayerId| {
            state
                .games
                .values()
                .filter(|g| g.status == GameStatus::Ended && g.seat_of(id).is_some())
                .count()
        };
        let mut players: Vec<Player> = state.players.values().cloned().collect();
        players.sort_by_key(|p| (std::cmp::Reverse(ended_games(p.id)), p.id));
        Ok(PaginatedResponse {
            total_count: players.len(),
            items: pagination.apply(players),
        })
    }

    async fn update_player(
        &self,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let player = state
            .players
            .get_mut(&player_id)
            .ok_or(RepoUpdateError::NotFound)?;
        if let Some(nickname) = update.nickname {
            player.nickname = Some(nickname);
        }
        if let Some(avatar_path) = update.avatar_path {
            player.avatar_path = Some(avatar_path);
        }
        let player = player.clone();
        for game in state.games.values_mut() {
            for seat in game.seats.iter_mut().filter(|s| s.player.id == player_id) {
                seat.player = player.clone();
            }
        }
        Ok(())
    }

    async fn delete_player(&self, player_id: PlayerId) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        state
            .players
            .remove(&player_id)
            .ok_or(RepoUpdateError::NotFound)?;
        for game in state.games.values_mut().filter(|g| g.is_draft()) {
            if game.seat_of(player_id).is_some() {
                game.seats.retain(|s| s.player.id != player_id);
                game.first_killed = None;
                game.best_move = None;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GameRepository for MockClubRepository {
    async fn create_game(&self, game: NewGame) -> Result<Game, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let id = GameId(state.next_id());
        let game = Game {
            id,
            status: GameStatus::Draft,
            result: None,
            created_at: game.created_at,
            comments: game.comments,
            seats: Vec::new(),
            first_killed: None,
            best_move: None,
        };
        state.games.insert(id, game.clone());
        Ok(game)
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        self.game(game_id).ok_or(RepoRetrieveError::NotFound)
    }

    async fn query_games(&self, query: GameQuery) -> Result<PaginatedResponse<Game>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        let mut games: Vec<Game> = state
            .games
            .values()
            .filter(|g| query.status.is_none_or(|status| g.status == status))
            .filter(|g| query.player_id.is_none_or(|id| g.seat_of(id).is_some()))
            .cloned()
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(PaginatedResponse {
            total_count: games.len(),
            items: query.pagination.apply(games),
        })
    }

    async fn get_last_draft_game(&self) -> Result<Option<Game>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .games
            .values()
            .filter(|g| g.is_draft())
            .max_by_key(|g| (g.created_at, g.id))
            .cloned())
    }

    async fn replace_seats(&self, game_id: GameId, seats: &[Seat]) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let game = state
            .games
            .get_mut(&game_id)
            .ok_or(RepoUpdateError::NotFound)?;
        game.seats = seats.to_vec();
        game.first_killed = None;
        game.best_move = None;
        Ok(())
    }

    async fn set_first_killed(
        &self,
        game_id: GameId,
        seat: SeatNumber,
    ) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let game = state
            .games
            .get_mut(&game_id)
            .ok_or(RepoUpdateError::NotFound)?;
        game.first_killed = Some(seat);
        Ok(())
    }

    async fn set_best_move(
        &self,
        game_id: GameId,
        seats: &[SeatNumber],
    ) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let game = state
            .games
            .get_mut(&game_id)
            .ok_or(RepoUpdateError::NotFound)?;
        game.best_move = Some(seats.to_vec());
        Ok(())
    }

    async fn update_game(
        &self,
        game_id: GameId,
        update: GameUpdate,
    ) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let game = state
            .games
            .get_mut(&game_id)
            .ok_or(RepoUpdateError::NotFound)?;
        if let Some(status) = update.status {
            game.status = status;
        }
        if let Some(result) = update.result {
            game.result = Some(result);
        }
        if let Some(comments) = update.comments {
            game.comments = comments;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepository for MockClubRepository {
    async fn get_user(&self, telegram_id: TelegramId) -> Result<TelegramUser, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.telegram_id == telegram_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn save_user(&self, user: TelegramUser) -> Result<(), RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        self.state.lock().unwrap().users.push(user);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<TelegramUser>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        Ok(self.state.lock().unwrap().users.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockAvatarStorage {
    pub files: Arc<Mutex<BTreeSet<String>>>,
}

#[allow(unused)]
impl MockAvatarStorage {
    pub fn with_files(names: &[&str]) -> Self {
        let storage = Self::default();
        storage
            .files
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| n.to_string()));
        storage
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AvatarStorage for MockAvatarStorage {
    async fn list_avatar_names(&self) -> Result<Vec<String>, AvatarStorageError> {
        Ok(self.files.lock().unwrap().iter().cloned().collect())
    }

    async fn create_avatar(
        &self,
        _bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<String, AvatarStorageError> {
        if file_name == DEFAULT_AVATAR_NAME {
            return Err(AvatarStorageError::ReservedName);
        }
        self.files.lock().unwrap().insert(file_name.to_string());
        Ok(format!("img/avatars/{}", file_name))
    }

    async fn delete_avatar(&self, file_name: &str) -> Result<(), AvatarStorageError> {
        if file_name == DEFAULT_AVATAR_NAME {
            return Err(AvatarStorageError::ReservedName);
        }
        if self.files.lock().unwrap().remove(file_name) {
            Ok(())
        } else {
            Err(AvatarStorageError::NotFound)
        }
    }
}
