use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    GameId, PaginatedResponse, Pagination, PlayerId, RepoError, RepoRetrieveError,
    RepoUpdateError,
    player::Player,
    role::{
        BLACK_TEAM_SIZE, CIVILIAN_COUNT, DON_COUNT, GameResult, GameStatus, MAFIA_COUNT,
        MAX_PLAYERS, MIN_PLAYERS, Role, SHERIFF_COUNT, Team,
    },
    seat::{Seat, SeatNumber},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub status: GameStatus,
    pub result: Option<GameResult>,
    pub created_at: DateTime<Utc>,
    pub comments: String,
    pub seats: Vec<Seat>,
    pub first_killed: Option<SeatNumber>,
    pub best_move: Option<Vec<SeatNumber>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameRuleViolation {
    #[error("Game is already ended")]
    AlreadyEnded,
    #[error("Can't end game with no result")]
    MissingResult,
    #[error("Players seat numbers are not valid")]
    DuplicateSeatNumbers,
    #[error("Some player is duplicated in game")]
    DuplicatePlayers,
    #[error("Can't end game with {0} players")]
    InvalidPlayerCount(usize),
    #[error(
        "Roles distribution is not correct (don: {don}, sheriff: {sheriff}, mafia: {mafia}, civilian: {civilian})"
    )]
    InvalidRoleDistribution {
        don: usize,
        sheriff: usize,
        mafia: usize,
        civilian: usize,
    },
    #[error("Could not set 'best move' with less than 10 players in game")]
    BestMoveNeedsFullTable,
    #[error("Could not set 'best move' without first killed assigned")]
    BestMoveWithoutFirstKilled,
    #[error("Best move must name exactly 3 different seats")]
    InvalidBestMoveSize,
    #[error("Player with number {0} not in game")]
    SeatNotOccupied(SeatNumber),
}

impl Game {
    pub fn is_draft(&self) -> bool {
        self.status == GameStatus::Draft
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn seat(&self, number: SeatNumber) -> Option<&Seat> {
        self.seats.iter().find(|s| s.number == number)
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player.id == player_id)
    }

    pub fn first_killed_seat(&self) -> Option<&Seat> {
        self.first_killed.and_then(|number| self.seat(number))
    }

    /// Seats named in the best move guess, skipping numbers nobody occupies.
    pub fn best_move_seats(&self) -> Option<Vec<&Seat>> {
        self.best_move
            .as_ref()
            .map(|numbers| numbers.iter().filter_map(|n| self.seat(*n)).collect())
    }

    /// Seats a player, dropping their previous seat and whoever sat on `number`.
    /// Any recorded first killed or best move refers to the old roster and is cleared.
    pub fn assign_seat(&mut self, number: SeatNumber, player: Player, role: Role) {
        self.seats
            .retain(|seat| seat.player.id != player.id && seat.number != number);
        self.first_killed = None;
        self.best_move = None;
        self.seats.push(Seat::new(number, player, role));
        self.seats.sort_by_key(|seat| seat.number);
    }

    pub fn set_first_killed(&mut self, number: SeatNumber) -> Result<(), GameRuleViolation> {
        self.ensure_draft()?;
        if self.seat(number).is_none() {
            return Err(GameRuleViolation::SeatNotOccupied(number));
        }
        self.first_killed = Some(number);
        Ok(())
    }

    pub fn set_best_move(&mut self, numbers: Vec<SeatNumber>) -> Result<(), GameRuleViolation> {
        self.ensure_draft()?;
        if self.player_count() != MAX_PLAYERS {
            return Err(GameRuleViolation::BestMoveNeedsFullTable);
        }
        if self.first_killed.is_none() {
            return Err(GameRuleViolation::BestMoveWithoutFirstKilled);
        }
        let distinct: HashSet<SeatNumber> = numbers.iter().copied().collect();
        if numbers.len() != BLACK_TEAM_SIZE || distinct.len() != BLACK_TEAM_SIZE {
            return Err(GameRuleViolation::InvalidBestMoveSize);
        }
        if let Some(missing) = numbers.iter().find(|n| self.seat(**n).is_none()) {
            return Err(GameRuleViolation::SeatNotOccupied(*missing));
        }
        let mut numbers = numbers;
        numbers.sort();
        self.best_move = Some(numbers);
        Ok(())
    }

    /// Freezes the game with the given result if the table satisfies the club rules.
    /// The game is left untouched when a rule is violated.
    pub fn end(&mut self, result: Option<GameResult>) -> Result<(), GameRuleViolation> {
        self.ensure_draft()?;
        let Some(result) = result else {
            return Err(GameRuleViolation::MissingResult);
        };
        self.validate_table()?;
        self.validate_annotations()?;
        self.result = Some(result);
        self.status = GameStatus::Ended;
        Ok(())
    }

    /// Whether the player won this game. `None` unless the game has ended with
    /// a result and the player took part in it.
    pub fn has_won(&self, player_id: PlayerId) -> Option<bool> {
        if self.status != GameStatus::Ended {
            return None;
        }
        let result = self.result?;
        let seat = self.seat_of(player_id)?;
        Some(result.is_win_for(seat.role))
    }

    fn ensure_draft(&self) -> Result<(), GameRuleViolation> {
        if self.is_draft() {
            Ok(())
        } else {
            Err(GameRuleViolation::AlreadyEnded)
        }
    }

    fn validate_table(&self) -> Result<(), GameRuleViolation> {
        let numbers: HashSet<SeatNumber> = self.seats.iter().map(|s| s.number).collect();
        if numbers.len() != self.seats.len() {
            return Err(GameRuleViolation::DuplicateSeatNumbers);
        }

        let count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameRuleViolation::InvalidPlayerCount(count));
        }

        let players: HashSet<PlayerId> = self.seats.iter().map(|s| s.player.id).collect();
        if players.len() != self.seats.len() {
            return Err(GameRuleViolation::DuplicatePlayers);
        }

        let mut roles: HashMap<Role, usize> = HashMap::new();
        for seat in &self.seats {
            *roles.entry(seat.role).or_default() += 1;
        }
        let count_of = |role: Role| roles.get(&role).copied().unwrap_or(0);
        let (don, sheriff, mafia, civilian) = (
            count_of(Role::Don),
            count_of(Role::Sheriff),
            count_of(Role::Mafia),
            count_of(Role::Civilian),
        );
        if don != DON_COUNT
            || sheriff != SHERIFF_COUNT
            || mafia != MAFIA_COUNT
            || !(CIVILIAN_COUNT - 1..=CIVILIAN_COUNT).contains(&civilian)
        {
            return Err(GameRuleViolation::InvalidRoleDistribution {
                don,
                sheriff,
                mafia,
                civilian,
            });
        }
        Ok(())
    }

    fn validate_annotations(&self) -> Result<(), GameRuleViolation> {
        let Some(best_move) = &self.best_move else {
            return Ok(());
        };
        if self.first_killed.is_none() {
            return Err(GameRuleViolation::BestMoveWithoutFirstKilled);
        }
        if best_move.len() != BLACK_TEAM_SIZE {
            return Err(GameRuleViolation::InvalidBestMoveSize);
        }
        Ok(())
    }
}

/// Number of black team seats named in a best move guess.
pub fn black_seats_in(seats: &[&Seat]) -> usize {
    seats
        .iter()
        .filter(|seat| seat.role.team() == Team::Black)
        .count()
}

#[derive(Clone, Debug)]
pub struct NewGame {
    pub created_at: DateTime<Utc>,
    pub comments: String,
}

#[derive(Clone, Debug, Default)]
pub struct GameQuery {
    pub status: Option<GameStatus>,
    pub player_id: Option<PlayerId>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default)]
pub struct GameUpdate {
    pub status: Option<GameStatus>,
    pub result: Option<GameResult>,
    pub comments: Option<String>,
}

#[async_trait::async_trait]
pub trait GameRepository {
    async fn create_game(&self, game: NewGame) -> Result<Game, RepoError>;
    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError>;
    /// Games matching the query, newest first.
    async fn query_games(&self, query: GameQuery) -> Result<PaginatedResponse<Game>, RepoError>;
    async fn get_last_draft_game(&self) -> Result<Option<Game>, RepoError>;
    /// Replaces every seat of the game and clears its first killed and best move,
    /// all in one transaction.
    async fn replace_seats(&self, game_id: GameId, seats: &[Seat]) -> Result<(), RepoUpdateError>;
    async fn set_first_killed(
        &self,
        game_id: GameId,
        seat: SeatNumber,
    ) -> Result<(), RepoUpdateError>;
    async fn set_best_move(
        &self,
        game_id: GameId,
        seats: &[SeatNumber],
    ) -> Result<(), RepoUpdateError>;
    async fn update_game(&self, game_id: GameId, update: GameUpdate)
    -> Result<(), RepoUpdateError>;
}
