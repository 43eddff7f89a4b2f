use std::sync::Arc;

use crate::{
    ServiceResult,
    domain::{
        TelegramId,
        access::AdminPolicy,
        user::{TelegramUser, UserRepository},
    },
    workflow::repo_error,
};

#[async_trait::async_trait]
pub trait ListUsersUseCase {
    async fn list_users(&self, actor: TelegramId) -> ServiceResult<Vec<TelegramUser>>;
}

pub struct ListUsersUseCaseImpl<U: UserRepository> {
    user_repository: Arc<U>,
    admin_policy: AdminPolicy,
}

impl<U: UserRepository> ListUsersUseCaseImpl<U> {
    pub fn new(user_repository: Arc<U>, admin_policy: AdminPolicy) -> Self {
        Self {
            user_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<U: UserRepository + Send + Sync + 'static> ListUsersUseCase for ListUsersUseCaseImpl<U> {
    async fn list_users(&self, actor: TelegramId) -> ServiceResult<Vec<TelegramUser>> {
        self.admin_policy.ensure_admin(actor)?;
        self.user_repository
            .list_users()
            .await
            .map_err(|e| repo_error("user list", e))
    }
}
