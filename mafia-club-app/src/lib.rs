use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        access::AdminPolicy, game::GameRepository, player::PlayerRepository,
        user::UserRepository,
    },
    ports::avatar::AvatarStorage,
    workflow::{
        game::{
            assign_seat::{AssignSeatUseCase, AssignSeatUseCaseImpl},
            best_move::{BestMoveUseCase, BestMoveUseCaseImpl},
            comment::{SetGameCommentUseCase, SetGameCommentUseCaseImpl},
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
            end::{EndGameUseCase, EndGameUseCaseImpl},
            first_killed::{FirstKilledUseCase, FirstKilledUseCaseImpl},
            get::{GetGameUseCase, GetGameUseCaseImpl},
            list_ended::{ListEndedGamesUseCase, ListEndedGamesUseCaseImpl},
        },
        player::{
            create::{CreatePlayerUseCase, CreatePlayerUseCaseImpl},
            delete::{DeletePlayerUseCase, DeletePlayerUseCaseImpl},
            get::{GetPlayerUseCase, GetPlayerUseCaseImpl},
            get_stats::{GetPlayerStatsUseCase, GetPlayerStatsUseCaseImpl},
            list::{ListPlayersUseCase, ListPlayersUseCaseImpl},
            set_avatar::{SetPlayerAvatarUseCase, SetPlayerAvatarUseCaseImpl},
            set_nickname::{SetPlayerNicknameUseCase, SetPlayerNicknameUseCaseImpl},
        },
        user::{
            list::{ListUsersUseCase, ListUsersUseCaseImpl},
            register::{RegisterUserUseCase, RegisterUserUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn validation<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Validation(msg.into()))
    }

    pub fn forbidden<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Forbidden(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct Application {
    pub admin_policy: AdminPolicy,

    pub player_create_use_case: Box<dyn CreatePlayerUseCase + Send + Sync + 'static>,
    pub player_list_use_case: Box<dyn ListPlayersUseCase + Send + Sync + 'static>,
    pub player_get_use_case: Box<dyn GetPlayerUseCase + Send + Sync + 'static>,
    pub player_get_stats_use_case: Box<dyn GetPlayerStatsUseCase + Send + Sync + 'static>,
    pub player_set_nickname_use_case: Box<dyn SetPlayerNicknameUseCase + Send + Sync + 'static>,
    pub player_set_avatar_use_case: Box<dyn SetPlayerAvatarUseCase + Send + Sync + 'static>,
    pub player_delete_use_case: Box<dyn DeletePlayerUseCase + Send + Sync + 'static>,

    pub game_create_use_case: Box<dyn CreateGameUseCase + Send + Sync + 'static>,
    pub game_get_use_case: Box<dyn GetGameUseCase + Send + Sync + 'static>,
    pub game_list_ended_use_case: Box<dyn ListEndedGamesUseCase + Send + Sync + 'static>,
    pub game_assign_seat_use_case: Box<dyn AssignSeatUseCase + Send + Sync + 'static>,
    pub game_first_killed_use_case: Box<dyn FirstKilledUseCase + Send + Sync + 'static>,
    pub game_best_move_use_case: Box<dyn BestMoveUseCase + Send + Sync + 'static>,
    pub game_end_use_case: Box<dyn EndGameUseCase + Send + Sync + 'static>,
    pub game_comment_use_case: Box<dyn SetGameCommentUseCase + Send + Sync + 'static>,

    pub user_register_use_case: Box<dyn RegisterUserUseCase + Send + Sync + 'static>,
    pub user_list_use_case: Box<dyn ListUsersUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    P: PlayerRepository + Send + Sync + 'static,
    G: GameRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    A: AvatarStorage + Send + Sync + 'static,
>(
    player_repository: Arc<P>,
    game_repository: Arc<G>,
    user_repository: Arc<U>,
    avatar_storage: Arc<A>,
    admin_policy: AdminPolicy,
) -> Application {
    Application {
        admin_policy,

        player_create_use_case: Box::new(CreatePlayerUseCaseImpl::new(
            player_repository.clone(),
            admin_policy,
        )),
        player_list_use_case: Box::new(ListPlayersUseCaseImpl::new(player_repository.clone())),
        player_get_use_case: Box::new(GetPlayerUseCaseImpl::new(player_repository.clone())),
        player_get_stats_use_case: Box::new(GetPlayerStatsUseCaseImpl::new(
            player_repository.clone(),
            game_repository.clone(),
        )),
        player_set_nickname_use_case: Box::new(SetPlayerNicknameUseCaseImpl::new(
            player_repository.clone(),
            admin_policy,
        )),
        player_set_avatar_use_case: Box::new(SetPlayerAvatarUseCaseImpl::new(
            player_repository.clone(),
            avatar_storage.clone(),
            admin_policy,
        )),
        player_delete_use_case: Box::new(DeletePlayerUseCaseImpl::new(
            player_repository.clone(),
            game_repository.clone(),
            admin_policy,
        )),

        game_create_use_case: Box::new(CreateGameUseCaseImpl::new(
            game_repository.clone(),
            admin_policy,
        )),
        game_get_use_case: Box::new(GetGameUseCaseImpl::new(game_repository.clone())),
        game_list_ended_use_case: Box::new(ListEndedGamesUseCaseImpl::new(
            game_repository.clone(),
        )),
        game_assign_seat_use_case: Box::new(AssignSeatUseCaseImpl::new(
            game_repository.clone(),
            player_repository.clone(),
            admin_policy,
        )),
        game_first_killed_use_case: Box::new(FirstKilledUseCaseImpl::new(
            game_repository.clone(),
            admin_policy,
        )),
        game_best_move_use_case: Box::new(BestMoveUseCaseImpl::new(
            game_repository.clone(),
            admin_policy,
        )),
        game_end_use_case: Box::new(EndGameUseCaseImpl::new(
            game_repository.clone(),
            admin_policy,
        )),
        game_comment_use_case: Box::new(SetGameCommentUseCaseImpl::new(
            game_repository.clone(),
            admin_policy,
        )),

        user_register_use_case: Box::new(RegisterUserUseCaseImpl::new(user_repository.clone())),
        user_list_use_case: Box::new(ListUsersUseCaseImpl::new(
            user_repository.clone(),
            admin_policy,
        )),
    }
}
