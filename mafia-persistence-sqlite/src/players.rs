use mafia_club_app::domain::{
    PaginatedResponse, Pagination, PlayerId, RepoError, RepoRetrieveError, RepoUpdateError,
    player::{NewPlayer, Player, PlayerRepository, PlayerUpdate},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{retrieve_error, storage_error, update_error};

pub struct SqlitePlayerRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub(crate) fn player_from_row(row: &SqliteRow) -> sqlx::Result<Player> {
        Ok(Player {
            id: PlayerId(row.try_get("id")?),
            full_name: row.try_get("fio")?,
            nickname: row.try_get("nickname")?,
            avatar_path: row.try_get("avatar_path")?,
        })
    }
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, RepoError> {
        // Id is auto-incremented
        let res = sqlx::query("INSERT INTO players (fio, nickname) VALUES (?, ?)")
            .bind(&player.full_name)
            .bind(&player.nickname)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(Player {
            id: PlayerId(res.last_insert_rowid()),
            full_name: player.full_name,
            nickname: player.nickname,
            avatar_path: None,
        })
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let row = sqlx::query("SELECT id, fio, nickname, avatar_path FROM players WHERE id = ?")
            .bind(player_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(retrieve_error)?;
        Self::player_from_row(&row).map_err(retrieve_error)
    }

    async fn list_players(
        &self,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Player>, RepoError> {
        let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        let rows = sqlx::query(
            "SELECT p.id, p.fio, p.nickname, p.avatar_path,
                (SELECT COUNT(*) FROM players_games pg
                    JOIN games g ON g.id = pg.game_id
                    WHERE pg.player_id = p.id AND g.status = 'ended') AS ended_games
            FROM players p
            ORDER BY ended_games DESC, p.id ASC
            LIMIT ? OFFSET ?",
        )
        .bind(pagination.limit.map(|l| l as i64).unwrap_or(-1))
        .bind(pagination.offset.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let items = rows
            .iter()
            .map(Self::player_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(storage_error)?;
        Ok(PaginatedResponse {
            total_count: total_count as usize,
            items,
        })
    }

    async fn update_player(
        &self,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<(), RepoUpdateError> {
        let mut sets = Vec::new();
        if update.nickname.is_some() {
            sets.push("nickname = ?");
        }
        if update.avatar_path.is_some() {
            sets.push("avatar_path = ?");
        }
        if sets.is_empty() {
            return self
                .get_player(player_id)
                .await
                .map(|_| ())
                .map_err(|e| match e {
                    RepoRetrieveError::NotFound => RepoUpdateError::NotFound,
                    RepoRetrieveError::StorageError(e) => RepoUpdateError::StorageError(e),
                });
        }

        let sql = format!("UPDATE players SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(nickname) = update.nickname {
            query = query.bind(nickname);
        }
        if let Some(avatar_path) = update.avatar_path {
            query = query.bind(avatar_path);
        }
        let res = query
            .bind(player_id.0)
            .execute(&self.pool)
            .await
            .map_err(update_error)?;
        if res.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn delete_player(&self, player_id: PlayerId) -> Result<(), RepoUpdateError> {
        let mut tx = self.pool.begin().await.map_err(update_error)?;

        // annotations of the affected drafts refer to the old roster
        sqlx::query(
            "UPDATE games SET first_killed = NULL, best_move = NULL
            WHERE status = 'draft'
            AND id IN (SELECT game_id FROM players_games WHERE player_id = ?)",
        )
        .bind(player_id.0)
        .execute(&mut *tx)
        .await
        .map_err(update_error)?;

        sqlx::query(
            "DELETE FROM players_games
            WHERE player_id = ?
            AND game_id IN (SELECT id FROM games WHERE status = 'draft')",
        )
        .bind(player_id.0)
        .execute(&mut *tx)
        .await
        .map_err(update_error)?;

        let res = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(player_id.0)
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;
        if res.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }

        tx.commit().await.map_err(update_error)?;
        Ok(())
    }
}
