use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::{PublicUser, Session};
use crate::storage::{load_collection, save_collection, Store};

pub const USERS_KEY: &str = "users";
pub const SESSION_TOKEN_KEY: &str = "session_token";
pub const SESSION_USER_KEY: &str = "session_user";

/// User record as persisted. The password hash never leaves this shape
/// except through [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Find a user by exact email match. Lookup is case-sensitive.
    pub async fn find_by_email(store: &dyn Store, email: &str) -> anyhow::Result<Option<User>> {
        let users: Vec<User> = load_collection(store, USERS_KEY).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Append a new record to the registered-users collection.
    pub async fn insert(store: &dyn Store, user: &User) -> anyhow::Result<()> {
        let mut users: Vec<User> = load_collection(store, USERS_KEY).await?;
        users.push(user.clone());
        save_collection(store, USERS_KEY, &users).await
    }
}

/// Persist `session` as the one active session, replacing any prior one.
pub async fn save_session(store: &dyn Store, session: &Session) -> anyhow::Result<()> {
    store
        .save(
            SESSION_TOKEN_KEY,
            serde_json::Value::String(session.token.clone()),
        )
        .await?;
    store
        .save(SESSION_USER_KEY, serde_json::to_value(&session.user)?)
        .await
}

pub async fn load_session(store: &dyn Store) -> anyhow::Result<Option<Session>> {
    let token = match store.load(SESSION_TOKEN_KEY).await? {
        Some(v) => serde_json::from_value::<String>(v).context("parse session token")?,
        None => return Ok(None),
    };
    let user = match store.load(SESSION_USER_KEY).await? {
        Some(v) => serde_json::from_value::<PublicUser>(v).context("parse session user")?,
        None => return Ok(None),
    };
    Ok(Some(Session { token, user }))
}

pub async fn clear_session(store: &dyn Store) -> anyhow::Result<()> {
    store.remove(SESSION_TOKEN_KEY).await?;
    store.remove(SESSION_USER_KEY).await
}
