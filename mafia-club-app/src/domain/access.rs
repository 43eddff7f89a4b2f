use crate::{
    ServiceError, ServiceResult,
    domain::TelegramId,
};

/// Decides who may change club records. Only the configured admin can.
#[derive(Clone, Copy, Debug)]
pub struct AdminPolicy {
    admin_id: TelegramId,
}

impl AdminPolicy {
    pub fn new(admin_id: TelegramId) -> Self {
        Self { admin_id }
    }

    pub fn admin_id(&self) -> TelegramId {
        self.admin_id
    }

    pub fn is_admin(&self, user: TelegramId) -> bool {
        user == self.admin_id
    }

    pub fn ensure_admin(&self, user: TelegramId) -> ServiceResult<()> {
        if self.is_admin(user) {
            Ok(())
        } else {
            ServiceError::forbidden("Only the club admin can do this")
        }
    }
}
