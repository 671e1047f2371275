pub(crate) mod backend;
pub mod models;
mod password;
pub mod token;

pub use backend::AuthSqlService;
pub use models::{LoginPayload, PublicUser, RegisterPayload, Session};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("{0} already in use")]
    Conflict(&'static str),
    #[error("{0}")]
    InvalidInput(String),
    /// Deliberately covers both an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token is not valid")]
    TokenInvalid,
    #[error("storage failure")]
    Storage,
}

#[async_trait]
pub trait AuthService {
    async fn register(&self, payload: &RegisterPayload) -> Result<Session, AuthError>;

    async fn login(&self, payload: &LoginPayload) -> Result<Session, AuthError>;

    /// Resolves a bearer token to the public fields of the user it names.
    async fn verify(&self, token: &str) -> Result<PublicUser, AuthError>;
}
