use std::sync::Arc;

use crate::{
    ServiceError, ServiceResult,
    domain::{
        PlayerId, TelegramId,
        access::AdminPolicy,
        game::{GameQuery, GameRepository},
        player::PlayerRepository,
        role::GameStatus,
    },
    workflow::{repo_error, retrieve_error, update_error},
};

#[async_trait::async_trait]
pub trait DeletePlayerUseCase {
    async fn delete_player(&self, actor: TelegramId, player_id: PlayerId) -> ServiceResult<()>;
}

pub struct DeletePlayerUseCaseImpl<P: PlayerRepository, G: GameRepository> {
    player_repository: Arc<P>,
    game_repository: Arc<G>,
    admin_policy: AdminPolicy,
}

impl<P: PlayerRepository, G: GameRepository> DeletePlayerUseCaseImpl<P, G> {
    pub fn new(player_repository: Arc<P>, game_repository: Arc<G>, admin_policy: AdminPolicy) -> Self {
        Self {
            player_repository,
            game_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<P, G> DeletePlayerUseCase for DeletePlayerUseCaseImpl<P, G>
where
    P: PlayerRepository + Send + Sync + 'static,
    G: GameRepository + Send + Sync + 'static,
{
    async fn delete_player(&self, actor: TelegramId, player_id: PlayerId) -> ServiceResult<()> {
        self.admin_policy.ensure_admin(actor)?;
        let what = format!("Player {}", player_id);
        self.player_repository
            .get_player(player_id)
            .await
            .map_err(|e| retrieve_error(&what, e))?;

        let ended = self
            .game_repository
            .query_games(GameQuery {
                status: Some(GameStatus::Ended),
                player_id: Some(player_id),
                ..Default::default()
            })
            .await
            .map_err(|e| repo_error("player deletion", e))?;
        if ended.total_count > 0 {
            return ServiceError::validation(format!(
                "Player {} took part in {} ended games and can't be deleted",
                player_id, ended.total_count
            ));
        }

        self.player_repository
            .delete_player(player_id)
            .await
            .map_err(|e| update_error(&what, e))?;
        log::info!("Deleted player {}", player_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::role::GameResult,
        mock::{ADMIN, MockClubRepository, STRANGER, admin_policy},
    };

    #[tokio::test]
    async fn test_delete_player_releases_draft_seats() {
        let repo = Arc::new(MockClubRepository::default());
        let game = repo.add_seated_game(9);
        let leaving = game.seats[4].player.id;
        let use_case = DeletePlayerUseCaseImpl::new(repo.clone(), repo.clone(), admin_policy());

        use_case.delete_player(ADMIN, leaving).await.expect("deleted");
        assert_eq!(repo.player(leaving), None);
        let game = repo.game(game.id).expect("game kept");
        assert_eq!(game.player_count(), 8);
        assert!(game.seat_of(leaving).is_none());
    }

    #[tokio::test]
    async fn test_delete_player_with_ended_game() {
        let repo = Arc::new(MockClubRepository::default());
        let mut game = repo.add_seated_game(10);
        game.end(Some(GameResult::CiviliansWon)).expect("valid table");
        repo.put_game(game.clone());
        let veteran = game.seats[0].player.id;
        let use_case = DeletePlayerUseCaseImpl::new(repo.clone(), repo.clone(), admin_policy());

        assert!(matches!(
            use_case.delete_player(ADMIN, veteran).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(repo.player(veteran).is_some());
    }

    #[tokio::test]
    async fn test_delete_player_rejections() {
        let repo = Arc::new(MockClubRepository::default());
        let cat = repo.add_player("Cat");
        let use_case = DeletePlayerUseCaseImpl::new(repo.clone(), repo, admin_policy());

        assert!(matches!(
            use_case.delete_player(STRANGER, cat.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            use_case.delete_player(ADMIN, PlayerId(99)).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
