use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        PaginatedResponse, Pagination,
        player::{Player, PlayerRepository},
    },
    workflow::repo_error,
};

#[async_trait::async_trait]
pub trait ListPlayersUseCase {
    async fn list_players(&self, pagination: Pagination)
    -> ServiceResult<PaginatedResponse<Player>>;
}

pub struct ListPlayersUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> ListPlayersUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> ListPlayersUseCase
    for ListPlayersUseCaseImpl<P>
{
    async fn list_players(
        &self,
        pagination: Pagination,
    ) -> ServiceResult<PaginatedResponse<Player>> {
        self.player_repository
            .list_players(pagination)
            .await
            .map_err(|e| repo_error("player list", e))
    }
}
