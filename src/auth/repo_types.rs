use std::fmt;

use sqlx::FromRow;

/// User record in the database.
#[derive(Clone, FromRow)]
pub struct User {
    pub user_id: String,   // 6-char uppercase hex code, primary key
    pub login: String,     // unique
    pub pass_hash: String, // bcrypt digest, never leaves the server
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("login", &self.login)
            .field("pass_hash", &"<redacted>")
            .finish()
    }
}
