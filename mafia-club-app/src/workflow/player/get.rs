use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        PlayerId,
        player::{Player, PlayerRepository},
    },
    workflow::retrieve_error,
};

#[async_trait::async_trait]
pub trait GetPlayerUseCase {
    async fn get_player(&self, player_id: PlayerId) -> ServiceResult<Player>;
}

pub struct GetPlayerUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> GetPlayerUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> GetPlayerUseCase for GetPlayerUseCaseImpl<P> {
    async fn get_player(&self, player_id: PlayerId) -> ServiceResult<Player> {
        self.player_repository
            .get_player(player_id)
            .await
            .map_err(|e| retrieve_error(&format!("Player {}", player_id), e))
    }
}
