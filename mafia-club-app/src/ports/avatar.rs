/// File name of the placeholder avatar every player without a picture shares.
pub const DEFAULT_AVATAR_NAME: &str = "default.png";

#[async_trait::async_trait]
pub trait AvatarStorage {
    async fn list_avatar_names(&self) -> Result<Vec<String>, AvatarStorageError>;
    /// Stores the image under `file_name` and returns its path relative to the static root.
    async fn create_avatar(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<String, AvatarStorageError>;
    async fn delete_avatar(&self, file_name: &str) -> Result<(), AvatarStorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarStorageError {
    ReservedName,
    NotFound,
    Io(String),
}

impl std::fmt::Display for AvatarStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvatarStorageError::ReservedName => {
                write!(f, "The default avatar can't be replaced or deleted")
            }
            AvatarStorageError::NotFound => write!(f, "Avatar not found"),
            AvatarStorageError::Io(e) => write!(f, "Avatar storage error: {}", e),
        }
    }
}

/// File name part of a stored avatar path.
pub fn avatar_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
