use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        GameId, TelegramId,
        access::AdminPolicy,
        game::{GameRepository, GameUpdate},
    },
    workflow::update_error,
};

#[async_trait::async_trait]
pub trait SetGameCommentUseCase {
    async fn set_comment(
        &self,
        actor: TelegramId,
        game_id: GameId,
        comments: String,
    ) -> ServiceResult<()>;
}

pub struct SetGameCommentUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository> SetGameCommentUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> SetGameCommentUseCase
    for SetGameCommentUseCaseImpl<G>
{
    async fn set_comment(
        &self,
        actor: TelegramId,
        game_id: GameId,
        comments: String,
    ) -> ServiceResult<()> {
        self.admin_policy.ensure_admin(actor)?;
        let update = GameUpdate {
            comments: Some(comments.trim().to_string()),
            ..Default::default()
        };
        self.game_repository
            .update_game(game_id, update)
            .await
            .map_err(|e| update_error(&format!("Game {}", game_id), e))
    }
}
