use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    ServiceResult,
    domain::{
        TelegramId,
        access::AdminPolicy,
        game::{Game, GameRepository, NewGame},
    },
    workflow::repo_error,
};

#[async_trait::async_trait]
pub trait CreateGameUseCase {
    async fn create_game(&self, actor: TelegramId, created_at: DateTime<Utc>)
    -> ServiceResult<Game>;
}

pub struct CreateGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository> CreateGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> CreateGameUseCase for CreateGameUseCaseImpl<G> {
    async fn create_game(
        &self,
        actor: TelegramId,
        created_at: DateTime<Utc>,
    ) -> ServiceResult<Game> {
        self.admin_policy.ensure_admin(actor)?;
        let game = self
            .game_repository
            .create_game(NewGame {
                created_at,
                comments: String::new(),
            })
            .await
            .map_err(|e| repo_error("game creation", e))?;
        log::info!("Created game {}", game.id);
        Ok(game)
    }
}
