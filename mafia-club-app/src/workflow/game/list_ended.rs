use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        PaginatedResponse, Pagination,
        game::{Game, GameQuery, GameRepository},
        role::GameStatus,
    },
    workflow::repo_error,
};

#[async_trait::async_trait]
pub trait ListEndedGamesUseCase {
    /// Ended games, newest first.
    async fn list_ended_games(&self, pagination: Pagination)
    -> ServiceResult<PaginatedResponse<Game>>;
}

pub struct ListEndedGamesUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> ListEndedGamesUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> ListEndedGamesUseCase
    for ListEndedGamesUseCaseImpl<G>
{
    async fn list_ended_games(
        &self,
        pagination: Pagination,
    ) -> ServiceResult<PaginatedResponse<Game>> {
        self.game_repository
            .query_games(GameQuery {
                status: Some(GameStatus::Ended),
                player_id: None,
                pagination,
            })
            .await
            .map_err(|e| repo_error("ended games list", e))
    }
}
