use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        GameId,
        game::{Game, GameRepository},
    },
    workflow::{repo_error, retrieve_error},
};

#[async_trait::async_trait]
pub trait GetGameUseCase {
    async fn get_game(&self, game_id: GameId) -> ServiceResult<Game>;
    /// The most recently created draft game, if any.
    async fn get_last_draft_game(&self) -> ServiceResult<Option<Game>>;
}

pub struct GetGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> GetGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> GetGameUseCase for GetGameUseCaseImpl<G> {
    async fn get_game(&self, game_id: GameId) -> ServiceResult<Game> {
        self.game_repository
            .get_game(game_id)
            .await
            .map_err(|e| retrieve_error(&format!("Game {}", game_id), e))
    }

    async fn get_last_draft_game(&self) -> ServiceResult<Option<Game>> {
        self.game_repository
            .get_last_draft_game()
            .await
            .map_err(|e| repo_error("last draft game", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ServiceError, domain::role::GameResult, mock::MockClubRepository};

    #[tokio::test]
    async fn test_get_game() {
        let repo = Arc::new(MockClubRepository::default());
        let game = repo.add_seated_game(3);
        let use_case = GetGameUseCaseImpl::new(repo);

        assert_eq!(use_case.get_game(game.id).await, Ok(game));
        assert_eq!(
            use_case.get_game(GameId(1000)).await,
            Err(ServiceError::NotFound("Game 1000 not found".to_string()))
        );
    }

    #[tokio::test]
    async fn test_last_draft_game_skips_ended() {
        let repo = Arc::new(MockClubRepository::default());
        let use_case = GetGameUseCaseImpl::new(repo.clone());
        assert_eq!(use_case.get_last_draft_game().await, Ok(None));

        let draft = repo.add_draft_game();
        let mut ended = repo.add_seated_game(10);
        ended.end(Some(GameResult::Draw)).expect("valid table");
        repo.put_game(ended);

        assert_eq!(use_case.get_last_draft_game().await, Ok(Some(draft)));
    }
}
