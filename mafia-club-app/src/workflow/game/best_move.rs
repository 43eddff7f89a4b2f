use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        GameId, TelegramId,
        access::AdminPolicy,
        game::{Game, GameRepository},
        seat::SeatNumber,
    },
    workflow::{retrieve_error, update_error},
};

#[async_trait::async_trait]
pub trait BestMoveUseCase {
    /// Records the first killed player's guess of the black team seats.
    async fn set_best_move(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seats: Vec<i64>,
    ) -> ServiceResult<Game>;
}

pub struct BestMoveUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository> BestMoveUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> BestMoveUseCase for BestMoveUseCaseImpl<G> {
    async fn set_best_move(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seats: Vec<i64>,
    ) -> ServiceResult<Game> {
        self.admin_policy.ensure_admin(actor)?;
        let numbers = seats
            .into_iter()
            .map(SeatNumber::new)
            .collect::<Result<Vec<_>, _>>()?;
        let what = format!("Game {}", game_id);
        let mut game = self
            .game_repository
            .get_game(game_id)
            .await
            .map_err(|e| retrieve_error(&what, e))?;

        game.set_best_move(numbers)?;
        let best_move = game.best_move.clone().unwrap_or_default();
        self.game_repository
            .set_best_move(game_id, &best_move)
            .await
            .map_err(|e| update_error(&what, e))?;
        log::info!("Game {}: best move {:?} recorded", game_id, best_move);
        Ok(game)
    }
}
