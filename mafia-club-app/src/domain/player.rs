use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::domain::{
    PaginatedResponse, Pagination, PlayerId, RepoError, RepoRetrieveError, RepoUpdateError,
};

pub const MAX_NAME_LENGTH: u64 = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub full_name: Option<String>,
    pub nickname: Option<String>,
    pub avatar_path: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> String {
        self.nickname
            .clone()
            .or_else(|| self.full_name.clone())
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

#[derive(Clone, Debug, Validate)]
#[validate(schema(function = "validate_has_name"))]
pub struct NewPlayer {
    #[validate(length(max = MAX_NAME_LENGTH, message = "Full name must be at most 64 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = MAX_NAME_LENGTH, message = "Nickname must be at most 64 characters"))]
    pub nickname: Option<String>,
}

impl NewPlayer {
    pub fn new(full_name: Option<String>, nickname: Option<String>) -> Self {
        Self {
            full_name: normalize_name(full_name),
            nickname: normalize_name(nickname),
        }
    }
}

fn validate_has_name(player: &NewPlayer) -> Result<(), ValidationError> {
    if player.full_name.is_none() && player.nickname.is_none() {
        let mut error = ValidationError::new("missing_name");
        error.message = Some(Cow::from("Player should have nickname or full name"));
        return Err(error);
    }
    Ok(())
}

/// Trims the name and turns blank input into no name at all.
pub fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// A new nickname for an existing player. Unlike a new player, the name is mandatory.
#[derive(Clone, Debug, Validate)]
pub struct NicknameUpdate {
    #[validate(
        required(message = "Nickname can't be empty"),
        length(max = MAX_NAME_LENGTH, message = "Nickname must be at most 64 characters")
    )]
    pub nickname: Option<String>,
}

impl NicknameUpdate {
    pub fn new(nickname: String) -> Self {
        Self {
            nickname: normalize_name(Some(nickname)),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlayerUpdate {
    pub nickname: Option<String>,
    pub avatar_path: Option<String>,
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, RepoError>;
    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError>;
    /// Players ordered by the number of ended games they took part in, most active first.
    async fn list_players(
        &self,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Player>, RepoError>;
    async fn update_player(
        &self,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<(), RepoUpdateError>;
    /// Removes the player together with any draft seats they hold.
    async fn delete_player(&self, player_id: PlayerId) -> Result<(), RepoUpdateError>;
}
