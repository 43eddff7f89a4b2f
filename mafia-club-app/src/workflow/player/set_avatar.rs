use std::sync::Arc;

use rand::Rng;

use crate::{
    ServiceError, ServiceResult,
    domain::{
        PlayerId, TelegramId,
        access::AdminPolicy,
        player::{PlayerRepository, PlayerUpdate},
    },
    ports::avatar::{AvatarStorage, AvatarStorageError, avatar_file_name},
    workflow::{retrieve_error, update_error},
};

#[async_trait::async_trait]
pub trait SetPlayerAvatarUseCase {
    /// Stores the image and returns its path relative to the static root.
    async fn set_avatar(
        &self,
        actor: TelegramId,
        player_id: PlayerId,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> ServiceResult<String>;
}

pub struct SetPlayerAvatarUseCaseImpl<P: PlayerRepository, A: AvatarStorage> {
    player_repository: Arc<P>,
    avatar_storage: Arc<A>,
    admin_policy: AdminPolicy,
}

impl<P: PlayerRepository, A: AvatarStorage> SetPlayerAvatarUseCaseImpl<P, A> {
    pub fn new(player_repository: Arc<P>, avatar_storage: Arc<A>, admin_policy: AdminPolicy) -> Self {
        Self {
            player_repository,
            avatar_storage,
            admin_policy,
        }
    }
}

fn storage_error(e: AvatarStorageError) -> ServiceError {
    match e {
        AvatarStorageError::ReservedName => ServiceError::Validation(e.to_string()),
        AvatarStorageError::NotFound => ServiceError::NotFound(e.to_string()),
        AvatarStorageError::Io(msg) => {
            log::error!("Avatar storage failure: {}", msg);
            ServiceError::Internal("avatar storage failure".to_string())
        }
    }
}

const PREFIX_ATTEMPTS: usize = 100;

/// Returns `file_name`, or `N_file_name` with a random `N` when the name is taken.
fn free_avatar_name(existing: &[String], file_name: &str) -> ServiceResult<String> {
    let taken = |name: &str| existing.iter().any(|e| e == name);
    if !taken(file_name) {
        return Ok(file_name.to_string());
    }
    let mut rng = rand::rng();
    std::iter::repeat_with(|| format!("{}_{}", rng.random_range(0..=1000u32), file_name))
        .take(PREFIX_ATTEMPTS)
        .find(|candidate| !taken(candidate))
        .ok_or_else(|| {
            ServiceError::Validation(format!(
                "Avatar name {} is taken, send the file under another name",
                file_name
            ))
        })
}

#[async_trait::async_trait]
impl<P, A> SetPlayerAvatarUseCase for SetPlayerAvatarUseCaseImpl<P, A>
where
    P: PlayerRepository + Send + Sync + 'static,
    A: AvatarStorage + Send + Sync + 'static,
{
    async fn set_avatar(
        &self,
        actor: TelegramId,
        player_id: PlayerId,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> ServiceResult<String> {
        self.admin_policy.ensure_admin(actor)?;
        let player = self
            .player_repository
            .get_player(player_id)
            .await
            .map_err(|e| retrieve_error(&format!("Player {}", player_id), e))?;

        let file_name = avatar_file_name(file_name.trim());
        if file_name.is_empty() {
            return ServiceError::validation("Avatar file name can't be empty");
        }
        let existing = self
            .avatar_storage
            .list_avatar_names()
            .await
            .map_err(storage_error)?;
        let file_name = free_avatar_name(&existing, file_name)?;

        let path = self
            .avatar_storage
            .create_avatar(bytes, &file_name)
            .await
            .map_err(storage_error)?;

        if let Some(old_path) = &player.avatar_path {
            match self
                .avatar_storage
                .delete_avatar(avatar_file_name(old_path))
                .await
            {
                Ok(()) | Err(AvatarStorageError::NotFound) | Err(AvatarStorageError::ReservedName) => {}
                Err(e) => return Err(storage_error(e)),
            }
        }

        let update = PlayerUpdate {
            avatar_path: Some(path.clone()),
            ..Default::default()
        };
        self.player_repository
            .update_player(player_id, update)
            .await
            .map_err(|e| update_error(&format!("Player {}", player_id), e))?;
        log::info!("Player {} got avatar {}", player_id, path);
        Ok(path)
    }
}
