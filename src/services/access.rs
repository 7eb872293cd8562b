use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::entities::user::{self, UserRole, UserStatus};
use crate::error::{AppError, AppResult};

/// The authenticated caller, resolved from the database on every request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl Actor {
    pub fn require_staff(&self) -> AppResult<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Receptionist access required".to_string()))
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    pub fn require_guest(&self) -> AppResult<()> {
        if self.role == UserRole::Guest {
            Ok(())
        } else {
            Err(AppError::Forbidden("Guest access required".to_string()))
        }
    }

    /// Owners see their own records, staff see everything.
    pub fn can_view(&self, owner_id: Uuid) -> bool {
        self.role.is_staff() || self.id == owner_id
    }
}

impl From<user::Model> for Actor {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Resolve a user id into an actor, refusing accounts that are not accepted.
pub async fn resolve_actor<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Actor> {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown account".to_string()))?;

    if user.status != UserStatus::Accepted {
        return Err(AppError::Forbidden(format!(
            "Your account status is {:?}. You cannot act until it is Accepted.",
            user.status
        )));
    }

    Ok(user.into())
}
