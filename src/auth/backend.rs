use async_trait::async_trait;
use sea_query::{Expr, Iden, Query as Qsql, SqliteQueryBuilder as QueryBuilder};
use sqlx::SqlitePool as Pool;

use super::models::{LoginPayload, PublicUser, RegisterPayload, Session, UserRow};
use super::{password, token, AuthError, AuthService};
use crate::{bind_query, bind_query_as, Id};

#[derive(Clone)]
pub struct AuthSqlService {
    pool: Pool,
    secret: Vec<u8>,
}

impl AuthSqlService {
    pub fn new(pool: Pool, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            pool,
            secret: secret.into(),
        }
    }

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Sqlite>, AuthError> {
        self.pool.acquire().await.map_err(|_| AuthError::Storage)
    }

    async fn find_user(&self, column: Users, value: &str) -> Result<Option<UserRow>, AuthError> {
        let (sql, values) = Qsql::select()
            .expr(Expr::asterisk())
            .from(Users::Table)
            .and_where(Expr::col(column).eq(value))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| AuthError::Storage)
    }

    async fn find_user_by_id(&self, id: Id) -> Result<Option<UserRow>, AuthError> {
        let (sql, values) = Qsql::select()
            .expr(Expr::asterisk())
            .from(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| AuthError::Storage)
    }

    fn session_for(&self, user: UserRow) -> Result<Session, AuthError> {
        let token = token::issue(&self.secret, user.id, token::session_validity())?;
        Ok(Session {
            token,
            user: user.into(),
        })
    }
}

#[async_trait]
impl AuthService for AuthSqlService {
    async fn register(&self, payload: &RegisterPayload) -> Result<Session, AuthError> {
        if payload.email.trim().is_empty()
            || payload.username.trim().is_empty()
            || payload.password.is_empty()
        {
            return Err(AuthError::InvalidInput(
                "all fields are required".to_string(),
            ));
        }
        if self.find_user(Users::Email, &payload.email).await?.is_some() {
            return Err(AuthError::Conflict("email"));
        }
        if self
            .find_user(Users::Username, &payload.username)
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict("username"));
        }

        let id = rand::random::<Id>();
        let hash = password::hash_password(&payload.password)?;
        let (sql, values) = Qsql::insert()
            .into_table(Users::Table)
            .columns(vec![
                Users::Id,
                Users::Email,
                Users::Username,
                Users::Name,
                Users::Password,
            ])
            .values_panic(vec![
                id.into(),
                payload.email.clone().into(),
                payload.username.clone().into(),
                payload.name.clone().into(),
                hash.into(),
            ])
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query(sqlx::query(&sql), &values)
            .execute(&mut conn)
            .await
            .map_err(|_| AuthError::Storage)?;
        drop(conn);

        let user = self.find_user_by_id(id).await?.ok_or(AuthError::Storage)?;
        self.session_for(user)
    }

    async fn login(&self, payload: &LoginPayload) -> Result<Session, AuthError> {
        if payload.email.trim().is_empty() || payload.password.is_empty() {
            return Err(AuthError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }
        // an unknown email and a wrong password must be indistinguishable
        let user = match self.find_user(Users::Email, &payload.email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };
        if !password::verify_password(&payload.password, &user.password)? {
            return Err(AuthError::InvalidCredentials);
        }
        self.session_for(user)
    }

    async fn verify(&self, token: &str) -> Result<PublicUser, AuthError> {
        let user_id = token::verify(&self.secret, token)?;
        let user = self
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;
        Ok(user.into())
    }
}

pub(crate) enum Users {
    Table,
    Id,
    Email,
    Username,
    Name,
    Password,
    _CreatedAt,
}

impl Iden for Users {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "users",
                Self::Id => "id",
                Self::Email => "email",
                Self::Username => "username",
                Self::Name => "name",
                Self::Password => "password",
                Self::_CreatedAt => "created_at",
            }
        )
        .unwrap();
    }
}
