use mafia_club_app::domain::{
    RepoError, RepoRetrieveError, TelegramId,
    user::{TelegramUser, UserRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{retrieve_error, storage_error};

pub struct SqliteUserRepository {
    pool: Pool<Sqlite>,
}

impl SqliteUserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &SqliteRow) -> sqlx::Result<TelegramUser> {
        Ok(TelegramUser {
            telegram_id: TelegramId(row.try_get("telegram_id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            username: row.try_get("username")?,
        })
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_user(&self, telegram_id: TelegramId) -> Result<TelegramUser, RepoRetrieveError> {
        let row = sqlx::query(
            "SELECT telegram_id, first_name, last_name, username FROM users WHERE telegram_id = ?",
        )
        .bind(telegram_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(retrieve_error)?;
        Self::user_from_row(&row).map_err(retrieve_error)
    }

    async fn save_user(&self, user: TelegramUser) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO users (telegram_id, first_name, last_name, username) VALUES (?, ?, ?, ?)
            ON CONFLICT (telegram_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                username = excluded.username",
        )
        .bind(user.telegram_id.0)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.username)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<TelegramUser>, RepoError> {
        let rows = sqlx::query(
            "SELECT telegram_id, first_name, last_name, username FROM users ORDER BY telegram_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.iter()
            .map(Self::user_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(storage_error)
    }
}
