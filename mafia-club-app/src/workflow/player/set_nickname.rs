use std::sync::Arc;

use validator::Validate;

use crate::{
    ServiceResult,
    domain::{
        PlayerId, TelegramId,
        access::AdminPolicy,
        player::{NicknameUpdate, PlayerRepository, PlayerUpdate},
    },
    workflow::update_error,
};

#[async_trait::async_trait]
pub trait SetPlayerNicknameUseCase {
    async fn set_nickname(
        &self,
        actor: TelegramId,
        player_id: PlayerId,
        nickname: String,
    ) -> ServiceResult<()>;
}

pub struct SetPlayerNicknameUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
    admin_policy: AdminPolicy,
}

impl<P: PlayerRepository> SetPlayerNicknameUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>, admin_policy: AdminPolicy) -> Self {
        Self {
            player_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> SetPlayerNicknameUseCase
    for SetPlayerNicknameUseCaseImpl<P>
{
    async fn set_nickname(
        &self,
        actor: TelegramId,
        player_id: PlayerId,
        nickname: String,
    ) -> ServiceResult<()> {
        self.admin_policy.ensure_admin(actor)?;
        let nickname = NicknameUpdate::new(nickname);
        nickname.validate()?;

        let update = PlayerUpdate {
            nickname: nickname.nickname.clone(),
            ..Default::default()
        };
        self.player_repository
            .update_player(player_id, update)
            .await
            .map_err(|e| update_error(&format!("Player {}", player_id), e))?;
        log::info!(
            "Player {} is now known as {}",
            player_id,
            nickname.nickname.unwrap_or_default()
        );
        Ok(())
    }
}
