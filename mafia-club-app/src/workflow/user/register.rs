use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        RepoRetrieveError,
        user::{TelegramUser, UserRepository},
    },
    workflow::{repo_error, retrieve_error},
};

#[async_trait::async_trait]
pub trait RegisterUserUseCase {
    /// Remembers the user. Returns whether they were seen for the first time.
    async fn register_user(&self, user: TelegramUser) -> ServiceResult<bool>;
}

pub struct RegisterUserUseCaseImpl<U: UserRepository> {
    user_repository: Arc<U>,
}

impl<U: UserRepository> RegisterUserUseCaseImpl<U> {
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }
}

#[async_trait::async_trait]
impl<U: UserRepository + Send + Sync + 'static> RegisterUserUseCase
    for RegisterUserUseCaseImpl<U>
{
    async fn register_user(&self, user: TelegramUser) -> ServiceResult<bool> {
        match self.user_repository.get_user(user.telegram_id).await {
            Ok(_) => return Ok(false),
            Err(RepoRetrieveError::NotFound) => {}
            Err(e) => return Err(retrieve_error("Telegram user", e)),
        }
        let telegram_id = user.telegram_id;
        self.user_repository
            .save_user(user)
            .await
            .map_err(|e| repo_error("user registration", e))?;
        log::info!("Registered Telegram user {}", telegram_id);
        Ok(true)
    }
}
