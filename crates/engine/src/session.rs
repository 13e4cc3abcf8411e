//! Authenticated session.
//!
//! A `Session` is produced by [`Engine::authenticate`] and passed explicitly
//! to every engine operation that needs to know who is acting.
//!
//! [`Engine::authenticate`]: crate::Engine::authenticate

use uuid::Uuid;

use crate::{EngineError, ResultEngine, Role, User};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub(crate) fn require_write(&self) -> ResultEngine<()> {
        if !self.role.can_write() {
            return Err(EngineError::Forbidden(format!(
                "role {} is read-only",
                self.role.as_str()
            )));
        }
        Ok(())
    }

    pub(crate) fn require_admin(&self) -> ResultEngine<()> {
        if !self.role.is_admin() {
            return Err(EngineError::Forbidden("admin role required".to_string()));
        }
        Ok(())
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}
