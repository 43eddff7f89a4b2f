use std::path::{Path, PathBuf};

use mafia_club_app::ports::avatar::{AvatarStorage, AvatarStorageError, DEFAULT_AVATAR_NAME};

/// Avatar folder below the static root, as used in stored avatar paths.
pub const AVATAR_FOLDER: &str = "img/avatars";

/// Keeps avatar images as plain files under `<static root>/img/avatars`.
pub struct FsAvatarStorage {
    static_dir: PathBuf,
}

impl FsAvatarStorage {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    fn avatar_dir(&self) -> PathBuf {
        self.static_dir.join(AVATAR_FOLDER)
    }

    fn avatar_path(&self, file_name: &str) -> Result<PathBuf, AvatarStorageError> {
        // only bare file names, never paths leaving the avatar folder
        let is_bare = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !is_bare {
            return Err(AvatarStorageError::Io(format!(
                "invalid avatar file name {}",
                file_name
            )));
        }
        Ok(self.avatar_dir().join(file_name))
    }
}

fn io_error(e: std::io::Error) -> AvatarStorageError {
    match e.kind() {
        std::io::ErrorKind::NotFound => AvatarStorageError::NotFound,
        _ => AvatarStorageError::Io(e.to_string()),
    }
}

#[async_trait::async_trait]
impl AvatarStorage for FsAvatarStorage {
    async fn list_avatar_names(&self) -> Result<Vec<String>, AvatarStorageError> {
        let mut entries = match tokio::fs::read_dir(self.avatar_dir()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn create_avatar(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<String, AvatarStorageError> {
        if file_name == DEFAULT_AVATAR_NAME {
            return Err(AvatarStorageError::ReservedName);
        }
        let path = self.avatar_path(file_name)?;
        tokio::fs::create_dir_all(self.avatar_dir())
            .await
            .map_err(io_error)?;
        tokio::fs::write(&path, bytes).await.map_err(io_error)?;
        log::debug!("Stored avatar at {}", path.display());
        Ok(format!("{}/{}", AVATAR_FOLDER, file_name))
    }

    async fn delete_avatar(&self, file_name: &str) -> Result<(), AvatarStorageError> {
        if file_name == DEFAULT_AVATAR_NAME {
            return Err(AvatarStorageError::ReservedName);
        }
        let path = self.avatar_path(file_name)?;
        tokio::fs::remove_file(&path).await.map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_static_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mafia-avatars-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_store_list_and_delete() {
        let dir = temp_static_dir();
        let storage = FsAvatarStorage::new(&dir);
        assert_eq!(storage.list_avatar_names().await, Ok(vec![]));

        let path = storage
            .create_avatar(vec![1, 2, 3], "cat.png")
            .await
            .expect("avatar stored");
        assert_eq!(path, "img/avatars/cat.png");
        assert_eq!(
            std::fs::read(dir.join(&path)).expect("file written"),
            vec![1, 2, 3]
        );
        assert_eq!(
            storage.list_avatar_names().await,
            Ok(vec!["cat.png".to_string()])
        );

        storage.delete_avatar("cat.png").await.expect("deleted");
        assert_eq!(
            storage.delete_avatar("cat.png").await,
            Err(AvatarStorageError::NotFound)
        );
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn test_default_avatar_is_reserved() {
        let storage = FsAvatarStorage::new(temp_static_dir());
        assert_eq!(
            storage.create_avatar(vec![1], DEFAULT_AVATAR_NAME).await,
            Err(AvatarStorageError::ReservedName)
        );
        assert_eq!(
            storage.delete_avatar(DEFAULT_AVATAR_NAME).await,
            Err(AvatarStorageError::ReservedName)
        );
    }

    #[tokio::test]
    async fn test_rejects_paths() {
        let storage = FsAvatarStorage::new(temp_static_dir());
        assert!(matches!(
            storage.create_avatar(vec![1], "../escape.png").await,
            Err(AvatarStorageError::Io(_))
        ));
    }
}
