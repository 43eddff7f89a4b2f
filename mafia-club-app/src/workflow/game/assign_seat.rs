use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        GameId, PlayerId, TelegramId,
        access::AdminPolicy,
        game::{Game, GameRepository, GameRuleViolation},
        player::PlayerRepository,
        role::Role,
        seat::SeatNumber,
    },
    workflow::{retrieve_error, update_error},
};

#[async_trait::async_trait]
pub trait AssignSeatUseCase {
    /// Seats the player and returns the game with its new roster.
    async fn assign_seat(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seat: i64,
        player_id: PlayerId,
        role: Role,
    ) -> ServiceResult<Game>;
}

pub struct AssignSeatUseCaseImpl<G: GameRepository, P: PlayerRepository> {
    game_repository: Arc<G>,
    player_repository: Arc<P>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository, P: PlayerRepository> AssignSeatUseCaseImpl<G, P> {
    pub fn new(game_repository: Arc<G>, player_repository: Arc<P>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            player_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G, P> AssignSeatUseCase for AssignSeatUseCaseImpl<G, P>
where
    G: GameRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
{
    async fn assign_seat(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seat: i64,
        player_id: PlayerId,
        role: Role,
    ) -> ServiceResult<Game> {
        self.admin_policy.ensure_admin(actor)?;
        let number = SeatNumber::new(seat)?;

        let what = format!("Game {}", game_id);
        let mut game = self
            .game_repository
            .get_game(game_id)
            .await
            .map_err(|e| retrieve_error(&what, e))?;
        if !game.is_draft() {
            return Err(GameRuleViolation::AlreadyEnded.into());
        }
        let player = self
            .player_repository
            .get_player(player_id)
            .await
            .map_err(|e| retrieve_error(&format!("Player {}", player_id), e))?;

        game.assign_seat(number, player, role);
        self.game_repository
            .replace_seats(game_id, &game.seats)
            .await
            .map_err(|e| update_error(&what, e))?;
        log::info!(
            "Game {}: seat {} is now player {} as {}",
            game_id,
            number,
            player_id,
            role
        );
        Ok(game)
    }
}
