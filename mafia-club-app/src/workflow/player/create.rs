use std::sync::Arc;

use validator::Validate;

use crate::{
    ServiceResult,
    domain::{
        TelegramId,
        access::AdminPolicy,
        player::{NewPlayer, Player, PlayerRepository},
    },
    workflow::repo_error,
};

#[async_trait::async_trait]
pub trait CreatePlayerUseCase {
    async fn create_player(
        &self,
        actor: TelegramId,
        full_name: Option<String>,
        nickname: Option<String>,
    ) -> ServiceResult<Player>;
}

pub struct CreatePlayerUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
    admin_policy: AdminPolicy,
}

impl<P: PlayerRepository> CreatePlayerUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>, admin_policy: AdminPolicy) -> Self {
        Self {
            player_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> CreatePlayerUseCase
    for CreatePlayerUseCaseImpl<P>
{
    async fn create_player(
        &self,
        actor: TelegramId,
        full_name: Option<String>,
        nickname: Option<String>,
    ) -> ServiceResult<Player> {
        self.admin_policy.ensure_admin(actor)?;
        let new_player = NewPlayer::new(full_name, nickname);
        new_player.validate()?;

        let player = self
            .player_repository
            .create_player(new_player)
            .await
            .map_err(|e| repo_error("player creation", e))?;
        log::info!("Created player {} ({})", player.id, player.display_name());
        Ok(player)
    }
}
