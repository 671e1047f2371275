use serde::{Deserialize, Serialize};
use sqlx::types::chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::Id;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub(crate) struct UserRow {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
    pub created_at: NaiveDateTime,
}

/// The identity fields safe to put on the wire. The stored hash never
/// leaves the auth module.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RegisterPayload {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}
