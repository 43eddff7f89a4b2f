use chrono::{DateTime, Utc};
use mafia_club_app::domain::{
    GameId, PaginatedResponse, RepoError, RepoRetrieveError, RepoUpdateError,
    game::{Game, GameQuery, GameRepository, GameUpdate, NewGame},
    role::{GameResult, GameStatus, Role},
    seat::{Seat, SeatNumber},
};
use sqlx::{Pool, Row, Sqlite, SqliteConnection, sqlite::SqliteRow};

use crate::{
    decode_error, players::SqlitePlayerRepository, retrieve_error, storage_error, update_error,
};

const GAME_COLUMNS: &str = "id, created_at, status, result, comments, first_killed, best_move";

pub struct SqliteGameRepository {
    pool: Pool<Sqlite>,
}

impl SqliteGameRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn game_from_row(row: &SqliteRow, seats: Vec<Seat>) -> sqlx::Result<Game> {
        let status: String = row.try_get("status")?;
        let result: Option<String> = row.try_get("result")?;
        let first_killed: Option<i64> = row.try_get("first_killed")?;
        let best_move: Option<String> = row.try_get("best_move")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(Game {
            id: GameId(row.try_get("id")?),
            status: status.parse::<GameStatus>().map_err(decode_error)?,
            result: result
                .map(|r| r.parse::<GameResult>())
                .transpose()
                .map_err(decode_error)?,
            created_at,
            comments: row.try_get("comments")?,
            seats,
            first_killed: first_killed.map(seat_number).transpose()?,
            best_move: best_move.map(|json| decode_best_move(&json)).transpose()?,
        })
    }

    fn seat_from_row(row: &SqliteRow) -> sqlx::Result<Seat> {
        let role: String = row.try_get("role")?;
        Ok(Seat::new(
            seat_number(row.try_get("number")?)?,
            SqlitePlayerRepository::player_from_row(row)?,
            role.parse::<Role>().map_err(decode_error)?,
        ))
    }

    async fn load_seats(conn: &mut SqliteConnection, game_id: i64) -> sqlx::Result<Vec<Seat>> {
        let rows = sqlx::query(
            "SELECT pg.number, pg.role, p.id, p.fio, p.nickname, p.avatar_path
            FROM players_games pg
            JOIN players p ON p.id = pg.player_id
            WHERE pg.game_id = ?
            ORDER BY pg.number",
        )
        .bind(game_id)
        .fetch_all(&mut *conn)
        .await?;
        rows.iter().map(Self::seat_from_row).collect()
    }

    async fn load_game(conn: &mut SqliteConnection, row: &SqliteRow) -> sqlx::Result<Game> {
        let id: i64 = row.try_get("id")?;
        let seats = Self::load_seats(conn, id).await?;
        Self::game_from_row(row, seats)
    }

    /// Runs an UPDATE on one game, failing with `NotFound` when no row matched.
    async fn update_one<'a>(
        &self,
        query: sqlx::query::Query<'a, Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
    ) -> Result<(), RepoUpdateError> {
        let res = query.execute(&self.pool).await.map_err(update_error)?;
        if res.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }
}

fn seat_number(number: i64) -> sqlx::Result<SeatNumber> {
    SeatNumber::new(number).map_err(|e| decode_error(e.to_string()))
}

fn decode_best_move(json: &str) -> sqlx::Result<Vec<SeatNumber>> {
    let numbers: Vec<i64> =
        serde_json::from_str(json).map_err(|e| decode_error(e.to_string()))?;
    numbers.into_iter().map(seat_number).collect()
}

fn encode_best_move(seats: &[SeatNumber]) -> String {
    let numbers: Vec<u8> = seats.iter().map(|s| s.get()).collect();
    serde_json::Value::from(numbers).to_string()
}

#[async_trait::async_trait]
impl GameRepository for SqliteGameRepository {
    async fn create_game(&self, game: NewGame) -> Result<Game, RepoError> {
        let res = sqlx::query(
            "INSERT INTO games (created_at, status, comments) VALUES (?, ?, ?)",
        )
        .bind(game.created_at)
        .bind(GameStatus::Draft.as_str())
        .bind(&game.comments)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(Game {
            id: GameId(res.last_insert_rowid()),
            status: GameStatus::Draft,
            result: None,
            created_at: game.created_at,
            comments: game.comments,
            seats: Vec::new(),
            first_killed: None,
            best_move: None,
        })
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        let mut conn = self.pool.acquire().await.map_err(retrieve_error)?;
        let row = sqlx::query(&format!("SELECT {} FROM games WHERE id = ?", GAME_COLUMNS))
            .bind(game_id.0)
            .fetch_one(&mut *conn)
            .await
            .map_err(retrieve_error)?;
        Self::load_game(&mut conn, &row)
            .await
            .map_err(retrieve_error)
    }

    async fn query_games(&self, query: GameQuery) -> Result<PaginatedResponse<Game>, RepoError> {
        let mut conditions = Vec::new();
        if query.status.is_some() {
            conditions.push("status = ?");
        }
        if query.player_id.is_some() {
            conditions.push("id IN (SELECT game_id FROM players_games WHERE player_id = ?)");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM games {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(status) = query.status {
            count_query = count_query.bind(status.as_str());
        }
        if let Some(player_id) = query.player_id {
            count_query = count_query.bind(player_id.0);
        }

        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        let total_count = count_query
            .fetch_one(&mut *conn)
            .await
            .map_err(storage_error)?;

        let select_sql = format!(
            "SELECT {} FROM games {} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            GAME_COLUMNS, where_clause
        );
        let mut select_query = sqlx::query(&select_sql);
        if let Some(status) = query.status {
            select_query = select_query.bind(status.as_str());
        }
        if let Some(player_id) = query.player_id {
            select_query = select_query.bind(player_id.0);
        }
        let rows = select_query
            .bind(query.pagination.limit.map(|l| l as i64).unwrap_or(-1))
            .bind(query.pagination.offset.unwrap_or(0) as i64)
            .fetch_all(&mut *conn)
            .await
            .map_err(storage_error)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(
                Self::load_game(&mut conn, row)
                    .await
                    .map_err(storage_error)?,
            );
        }
        Ok(PaginatedResponse {
            total_count: total_count as usize,
            items,
        })
    }

    async fn get_last_draft_game(&self) -> Result<Option<Game>, RepoError> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM games WHERE status = ? ORDER BY created_at DESC, id DESC LIMIT 1",
            GAME_COLUMNS
        ))
        .bind(GameStatus::Draft.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage_error)?;

        match row {
            Some(row) => Ok(Some(
                Self::load_game(&mut conn, &row)
                    .await
                    .map_err(storage_error)?,
            )),
            None => Ok(None),
        }
    }

    async fn replace_seats(&self, game_id: GameId, seats: &[Seat]) -> Result<(), RepoUpdateError> {
        let mut tx = self.pool.begin().await.map_err(update_error)?;

        let res = sqlx::query("UPDATE games SET first_killed = NULL, best_move = NULL WHERE id = ?")
            .bind(game_id.0)
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;
        if res.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }

        sqlx::query("DELETE FROM players_games WHERE game_id = ?")
            .bind(game_id.0)
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;

        for seat in seats {
            sqlx::query(
                "INSERT INTO players_games (game_id, player_id, number, role) VALUES (?, ?, ?, ?)",
            )
            .bind(game_id.0)
            .bind(seat.player.id.0)
            .bind(seat.number.get() as i64)
            .bind(seat.role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;
        }

        tx.commit().await.map_err(update_error)?;
        Ok(())
    }

    async fn set_first_killed(
        &self,
        game_id: GameId,
        seat: SeatNumber,
    ) -> Result<(), RepoUpdateError> {
        self.update_one(
            sqlx::query("UPDATE games SET first_killed = ? WHERE id = ?")
                .bind(seat.get() as i64)
                .bind(game_id.0),
        )
        .await
    }

    async fn set_best_move(
        &self,
        game_id: GameId,
        seats: &[SeatNumber],
    ) -> Result<(), RepoUpdateError> {
        self.update_one(
            sqlx::query("UPDATE games SET best_move = ? WHERE id = ?")
                .bind(encode_best_move(seats))
                .bind(game_id.0),
        )
        .await
    }

    async fn update_game(
        &self,
        game_id: GameId,
        update: GameUpdate,
    ) -> Result<(), RepoUpdateError> {
        let mut sets = vec!["id = id"];
        if update.status.is_some() {
            sets.push("status = ?");
        }
        if update.result.is_some() {
            sets.push("result = ?");
        }
        if update.comments.is_some() {
            sets.push("comments = ?");
        }

        let sql = format!("UPDATE games SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(status) = update.status {
            query = query.bind(status.as_str());
        }
        if let Some(result) = update.result {
            query = query.bind(result.as_str());
        }
        if let Some(comments) = update.comments {
            query = query.bind(comments);
        }
        self.update_one(query.bind(game_id.0)).await
    }
}
