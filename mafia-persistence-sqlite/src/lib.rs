use mafia_club_app::domain::{RepoError, RepoRetrieveError, RepoUpdateError};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod avatars;
pub mod games;
pub mod players;
pub mod users;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fio TEXT,
        nickname TEXT,
        avatar_path TEXT
    )",
    "CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'draft',
        result TEXT,
        comments TEXT NOT NULL DEFAULT '',
        first_killed INTEGER,
        best_move TEXT
    )",
    "CREATE TABLE IF NOT EXISTS players_games (
        game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        player_id INTEGER NOT NULL REFERENCES players(id),
        number INTEGER NOT NULL CHECK (number BETWEEN 1 AND 10),
        role TEXT NOT NULL,
        UNIQUE (game_id, player_id),
        UNIQUE (game_id, number)
    )",
    "CREATE TABLE IF NOT EXISTS users (
        telegram_id INTEGER PRIMARY KEY,
        first_name TEXT,
        last_name TEXT,
        username TEXT
    )",
];

pub fn create_db_pool() -> Pool<Sqlite> {
    let db_path = std::env::var("MAFIA_DB_PATH").expect("MAFIA_DB_PATH env var not set");

    let conn_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(conn_options)
}

/// Creates any missing table.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

fn storage_error(e: sqlx::Error) -> RepoError {
    RepoError::StorageError(e.to_string())
}

fn retrieve_error(e: sqlx::Error) -> RepoRetrieveError {
    match e {
        sqlx::Error::RowNotFound => RepoRetrieveError::NotFound,
        e => RepoRetrieveError::StorageError(e.to_string()),
    }
}

fn update_error(e: sqlx::Error) -> RepoUpdateError {
    match e {
        sqlx::Error::RowNotFound => RepoUpdateError::NotFound,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            RepoUpdateError::Conflict
        }
        e => RepoUpdateError::StorageError(e.to_string()),
    }
}

fn decode_error(e: String) -> sqlx::Error {
    sqlx::Error::Decode(e.into())
}
