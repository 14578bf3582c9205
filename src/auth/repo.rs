use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::User;
use crate::db::StoreError;

/// Name Postgres gives the `users` primary key; a violation here means the
/// generated code collided, not that the login is taken.
///
/// The names are Postgres defaults for the `users` table in `db::SCHEMA`;
/// `unique_violations_name_their_constraint` checks them against a live
/// database.
pub const USER_ID_CONSTRAINT: &str = "users_pkey";

/// Name Postgres gives the unique index on `users.login`.
pub const LOGIN_CONSTRAINT: &str = "users_login_key";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: &User) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Find a user by login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, login, pass_hash
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    /// Insert a new user with an already hashed password.
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, login, pass_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.login)
        .bind(&user.pass_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
