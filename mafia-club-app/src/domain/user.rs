use crate::domain::{RepoError, RepoRetrieveError, TelegramId};

/// Someone who wrote to the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelegramUser {
    pub telegram_id: TelegramId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl TelegramUser {
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        match (&self.username, full_name.is_empty()) {
            (Some(username), true) => format!("@{}", username),
            (Some(username), false) => format!("{} (@{})", full_name, username),
            (None, false) => full_name,
            (None, true) => self.telegram_id.to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait UserRepository {
    async fn get_user(&self, telegram_id: TelegramId) -> Result<TelegramUser, RepoRetrieveError>;
    async fn save_user(&self, user: TelegramUser) -> Result<(), RepoError>;
    async fn list_users(&self) -> Result<Vec<TelegramUser>, RepoError>;
}
