use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        PlayerId,
        game::{GameQuery, GameRepository},
        player::{Player, PlayerRepository},
        role::GameStatus,
        stats::PlayerStats,
    },
    workflow::{repo_error, retrieve_error},
};

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStatsView {
    pub player: Player,
    pub stats: PlayerStats,
}

#[async_trait::async_trait]
pub trait GetPlayerStatsUseCase {
    async fn get_stats(&self, player_id: PlayerId) -> ServiceResult<PlayerStatsView>;
}

pub struct GetPlayerStatsUseCaseImpl<P: PlayerRepository, G: GameRepository> {
    player_repository: Arc<P>,
    game_repository: Arc<G>,
}

impl<P: PlayerRepository, G: GameRepository> GetPlayerStatsUseCaseImpl<P, G> {
    pub fn new(player_repository: Arc<P>, game_repository: Arc<G>) -> Self {
        Self {
            player_repository,
            game_repository,
        }
    }
}

#[async_trait::async_trait]
impl<P, G> GetPlayerStatsUseCase for GetPlayerStatsUseCaseImpl<P, G>
where
    P: PlayerRepository + Send + Sync + 'static,
    G: GameRepository + Send + Sync + 'static,
{
    async fn get_stats(&self, player_id: PlayerId) -> ServiceResult<PlayerStatsView> {
        let player = self
            .player_repository
            .get_player(player_id)
            .await
            .map_err(|e| retrieve_error(&format!("Player {}", player_id), e))?;

        let games = self
            .game_repository
            .query_games(GameQuery {
                status: Some(GameStatus::Ended),
                player_id: Some(player_id),
                ..Default::default()
            })
            .await
            .map_err(|e| repo_error("player stats", e))?;

        let stats = PlayerStats::compute(player_id, &games.items);
        Ok(PlayerStatsView { player, stats })
    }
}
