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
pub trait FirstKilledUseCase {
    async fn assign_first_killed(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seat: i64,
    ) -> ServiceResult<Game>;
}

pub struct FirstKilledUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository> FirstKilledUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> FirstKilledUseCase for FirstKilledUseCaseImpl<G> {
    async fn assign_first_killed(
        &self,
        actor: TelegramId,
        game_id: GameId,
        seat: i64,
    ) -> ServiceResult<Game> {
        self.admin_policy.ensure_admin(actor)?;
        let number = SeatNumber::new(seat)?;
        let what = format!("Game {}", game_id);
        let mut game = self
            .game_repository
            .get_game(game_id)
            .await
            .map_err(|e| retrieve_error(&what, e))?;

        game.set_first_killed(number)?;
        self.game_repository
            .set_first_killed(game_id, number)
            .await
            .map_err(|e| update_error(&what, e))?;
        log::info!("Game {}: seat {} was killed first", game_id, number);
        Ok(game)
    }
}
