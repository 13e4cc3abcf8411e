use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, NewUser, ResultEngine, Role, Session, Status, User, UserUpdate,
    users::{self, hash_password, new_salt},
    util::normalize_required_text,
};

use super::{Engine, with_tx};

fn normalize_username(value: &str) -> ResultEngine<String> {
    let username = normalize_required_text(value, "username")?;
    if username.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidInput(
            "username must not contain spaces".to_string(),
        ));
    }
    Ok(username.to_lowercase())
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = normalize_required_text(value, "email")?;
    if !email.contains('@') {
        return Err(EngineError::InvalidInput(format!("invalid email: {email}")));
    }
    Ok(email.to_lowercase())
}

fn validate_password(password: &str) -> ResultEngine<()> {
    if password.chars().count() < 6 {
        return Err(EngineError::InvalidInput(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Checks credentials and opens a session.
    ///
    /// Unknown users, wrong passwords and inactive users are all reported as
    /// the same `Unauthorized` error.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Session> {
        let unauthorized = || EngineError::Unauthorized("invalid credentials".to_string());
        let username = normalize_username(username).map_err(|_| unauthorized())?;

        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(unauthorized)?;
        if hash_password(&model.password_salt, password) != model.password_hash {
            return Err(unauthorized());
        }

        let user = User::try_from(model)?;
        if !user.status.is_active() {
            tracing::warn!(username = %user.username, "login attempt for inactive user");
            return Err(unauthorized());
        }
        Ok(Session::from(&user))
    }

    /// Creates a user without a session check.
    ///
    /// Used to bootstrap the first admin from the command line.
    pub async fn bootstrap_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let username = normalize_username(&new_user.username)?;
        let name = normalize_required_text(&new_user.name, "name")?;
        let email = normalize_email(&new_user.email)?;
        validate_password(&new_user.password)?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let salt = new_salt();
            let active = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                name: ActiveValue::Set(name),
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(email),
                role: ActiveValue::Set(new_user.role.as_str().to_string()),
                status: ActiveValue::Set(Status::Active.as_str().to_string()),
                password_hash: ActiveValue::Set(hash_password(&salt, &new_user.password)),
                password_salt: ActiveValue::Set(salt),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Creates a user (admin only).
    pub async fn create_user(&self, session: &Session, new_user: NewUser) -> ResultEngine<User> {
        session.require_admin()?;
        let user = self.bootstrap_user(new_user).await?;
        tracing::info!(username = %user.username, by = %session.username, "user created");
        Ok(user)
    }

    pub async fn list_users(&self, session: &Session) -> ResultEngine<Vec<User>> {
        session.require_admin()?;
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn user(&self, session: &Session, user_id: Uuid) -> ResultEngine<User> {
        if session.user_id != user_id {
            session.require_admin()?;
        }
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        User::try_from(model)
    }

    /// Updates name, email, role or status (admin only).
    ///
    /// An admin cannot demote or deactivate themselves.
    pub async fn update_user(
        &self,
        session: &Session,
        user_id: Uuid,
        update: UserUpdate,
    ) -> ResultEngine<User> {
        session.require_admin()?;
        if session.user_id == user_id
            && (update.role.is_some_and(|role| role != Role::Admin)
                || update.status.is_some_and(|status| !status.is_active()))
        {
            return Err(EngineError::Forbidden(
                "admins cannot demote or deactivate themselves".to_string(),
            ));
        }

        let name = update
            .name
            .as_deref()
            .map(|n| normalize_required_text(n, "name"))
            .transpose()?;
        let email = update.email.as_deref().map(normalize_email).transpose()?;

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut active: users::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(email) = email {
                active.email = ActiveValue::Set(email);
            }
            if let Some(role) = update.role {
                active.role = ActiveValue::Set(role.as_str().to_string());
            }
            if let Some(status) = update.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Replaces a user's password. Users may change their own; admins may
    /// change anyone's.
    pub async fn set_password(
        &self,
        session: &Session,
        user_id: Uuid,
        password: &str,
    ) -> ResultEngine<()> {
        if session.user_id != user_id {
            session.require_admin()?;
        }
        validate_password(password)?;
        self.reset_password(user_id, password).await
    }

    /// Replaces a password without a session check (command line only).
    pub async fn reset_password(&self, user_id: Uuid, password: &str) -> ResultEngine<()> {
        validate_password(password)?;
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        let salt = new_salt();
        let mut active: users::ActiveModel = model.into();
        active.password_hash = ActiveValue::Set(hash_password(&salt, password));
        active.password_salt = ActiveValue::Set(salt);
        active.update(&self.database).await?;
        Ok(())
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        User::try_from(model)
    }

    /// Deletes a user (admin only). The last admin cannot be removed and
    /// admins cannot delete themselves.
    pub async fn delete_user(&self, session: &Session, user_id: Uuid) -> ResultEngine<()> {
        session.require_admin()?;
        if session.user_id == user_id {
            return Err(EngineError::Forbidden(
                "admins cannot delete themselves".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            if model.role == Role::Admin.as_str() {
                let admins = users::Entity::find()
                    .filter(users::Column::Role.eq(Role::Admin.as_str()))
                    .count(&db_tx)
                    .await?;
                if admins <= 1 {
                    return Err(EngineError::Conflict(
                        "cannot delete the last admin".to_string(),
                    ));
                }
            }
            users::Entity::delete_by_id(user_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(%user_id, by = %session.username, "user deleted");
            Ok(())
        })
    }
}
