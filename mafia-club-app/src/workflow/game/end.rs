use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        GameId, TelegramId,
        access::AdminPolicy,
        game::{Game, GameRepository, GameUpdate},
        role::GameResult,
    },
    workflow::{retrieve_error, update_error},
};

#[async_trait::async_trait]
pub trait EndGameUseCase {
    /// Validates the table and freezes the game with the given result.
    async fn end_game(
        &self,
        actor: TelegramId,
        game_id: GameId,
        result: Option<GameResult>,
    ) -> ServiceResult<Game>;
}

pub struct EndGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<G: GameRepository> EndGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> EndGameUseCase for EndGameUseCaseImpl<G> {
    async fn end_game(
        &self,
        actor: TelegramId,
        game_id: GameId,
        result: Option<GameResult>,
    ) -> ServiceResult<Game> {
        self.admin_policy.ensure_admin(actor)?;
        let what = format!("Game {}", game_id);
        let mut game = self
            .game_repository
            .get_game(game_id)
            .await
            .map_err(|e| retrieve_error(&what, e))?;

        if let Err(violation) = game.end(result) {
            log::info!("Game {} can't be ended: {}", game_id, violation);
            return Err(violation.into());
        }

        let update = GameUpdate {
            status: Some(game.status),
            result: game.result,
            comments: None,
        };
        self.game_repository
            .update_game(game_id, update)
            .await
            .map_err(|e| update_error(&what, e))?;
        log::info!(
            "Game {} ended: {}",
            game_id,
            game.result.map(|r| r.as_str()).unwrap_or_default()
        );
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ServiceError,
        domain::{
            role::{GameStatus, Role},
            seat::SeatNumber,
        },
        mock::{ADMIN, MockClubRepository, STRANGER, admin_policy},
    };

    #[tokio::test]
    async fn test_end_valid_game() {
        let repo = Arc::new(MockClubRepository::default());
        let game = repo.add_seated_game(10);
        let use_case = EndGameUseCaseImpl::new(repo.clone(), admin_policy());

        let ended = use_case
            .end_game(ADMIN, game.id, Some(GameResult::MafiaWon))
            .await
            .expect("game ended");
        assert_eq!(ended.status, GameStatus::Ended);
        let stored = repo.game(game.id).expect("stored");
        assert_eq!(stored.status, GameStatus::Ended);
        assert_eq!(stored.result, Some(GameResult::MafiaWon));
    }

    #[tokio::test]
    async fn test_end_game_with_nine_players() {
        let repo = Arc::new(MockClubRepository::default());
        let game = repo.add_seated_game(9);
        let use_case = EndGameUseCaseImpl::new(repo.clone(), admin_policy());

        assert!(
            use_case
                .end_game(ADMIN, game.id, Some(GameResult::MafiaWon))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_end_game_leaves_invalid_game_in_draft() {
        let repo = Arc::new(MockClubRepository::default());
        let use_case = EndGameUseCaseImpl::new(repo.clone(), admin_policy());

        let no_result = repo.add_seated_game(10);
        let too_few = repo.add_seated_game(8);
        let mut three_mafia = repo.add_seated_game(10);
        three_mafia.seats[9].role = Role::Mafia;
        repo.put_game(three_mafia.clone());
        let mut guess_without_victim = repo.add_seated_game(10);
        guess_without_victim.best_move = Some(
            [1, 3, 4]
                .into_iter()
                .map(|n| SeatNumber::new(n).expect("valid seat"))
                .collect(),
        );
        repo.put_game(guess_without_victim.clone());

        let cases = [
            (no_result.id, None),
            (too_few.id, Some(GameResult::CiviliansWon)),
            (three_mafia.id, Some(GameResult::Draw)),
            (guess_without_victim.id, Some(GameResult::MafiaWon)),
        ];
        for (game_id, result) in cases {
            assert!(matches!(
                use_case.end_game(ADMIN, game_id, result).await,
                Err(ServiceError::Validation(_))
            ));
            let stored = repo.game(game_id).expect("stored");
            assert_eq!(stored.status, GameStatus::Draft);
            assert_eq!(stored.result, None);
        }
    }

    #[tokio::test]
    async fn test_end_game_rejections() {
        let repo = Arc::new(MockClubRepository::default());
        let game = repo.add_seated_game(10);
        let use_case = EndGameUseCaseImpl::new(repo.clone(), admin_policy());

        assert!(matches!(
            use_case.end_game(STRANGER, game.id, Some(GameResult::Draw)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            use_case.end_game(ADMIN, GameId(404), Some(GameResult::Draw)).await,
            Err(ServiceError::NotFound(_))
        ));
        use_case
            .end_game(ADMIN, game.id, Some(GameResult::Draw))
            .await
            .expect("first end");
        assert_eq!(
            use_case.end_game(ADMIN, game.id, Some(GameResult::MafiaWon)).await,
            Err(ServiceError::Validation("Game is already ended".to_string()))
        );
    }
}
