use validator::ValidationErrors;

use crate::{
    ServiceError,
    domain::{
        RepoError, RepoRetrieveError, RepoUpdateError, game::GameRuleViolation,
        seat::InvalidSeatNumber,
    },
};

pub mod game;
pub mod player;
pub mod user;

impl From<GameRuleViolation> for ServiceError {
    fn from(violation: GameRuleViolation) -> Self {
        match violation {
            GameRuleViolation::SeatNotOccupied(_) => ServiceError::NotFound(violation.to_string()),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

impl From<InvalidSeatNumber> for ServiceError {
    fn from(e: InvalidSeatNumber) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|list| list.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        ServiceError::Validation(message)
    }
}

/// Maps a failed lookup, logging storage failures.
pub(crate) fn retrieve_error(what: &str, e: RepoRetrieveError) -> ServiceError {
    match e {
        RepoRetrieveError::NotFound => ServiceError::NotFound(format!("{} not found", what)),
        RepoRetrieveError::StorageError(e) => {
            log::error!("Failed to load {}: {}", what, e);
            ServiceError::Internal("storage failure".to_string())
        }
    }
}

/// Maps a failed write, logging storage failures.
pub(crate) fn update_error(what: &str, e: RepoUpdateError) -> ServiceError {
    match e {
        RepoUpdateError::NotFound => ServiceError::NotFound(format!("{} not found", what)),
        RepoUpdateError::Conflict => {
            ServiceError::Validation(format!("{} conflicts with existing records", what))
        }
        RepoUpdateError::StorageError(e) => {
            log::error!("Failed to update {}: {}", what, e);
            ServiceError::Internal("storage failure".to_string())
        }
    }
}

pub(crate) fn repo_error(what: &str, e: RepoError) -> ServiceError {
    match e {
        RepoError::StorageError(e) => {
            log::error!("Storage failure while handling {}: {}", what, e);
            ServiceError::Internal("storage failure".to_string())
        }
    }
}
