use std::sync::OnceLock;

use lazy_static::lazy_static;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use tracing::{debug, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{UserStore, USER_ID_CONSTRAINT};
use crate::auth::repo_types::User;
use crate::db::StoreError;
use crate::error::{AppError, AppResult};

/// How many fresh codes registration tries before giving up.
pub const MAX_ID_ATTEMPTS: usize = 5;

/// Draws 3 bytes from the OS CSPRNG and renders them as 6 uppercase hex chars.
pub fn generate_user_id() -> String {
    let mut bytes = [0u8; 3];
    OsRng.fill_bytes(&mut bytes);
    format_user_id(bytes)
}

fn format_user_id(bytes: [u8; 3]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// True for codes of the shape [`generate_user_id`] produces.
pub(crate) fn is_valid_user_id(user_id: &str) -> bool {
    lazy_static! {
        static ref USER_ID_RE: Regex = Regex::new(r"^[0-9A-F]{6}$").unwrap();
    }
    USER_ID_RE.is_match(user_id)
}

fn require_credentials(login: &str, password: &str) -> AppResult<()> {
    if login.is_empty() || password.is_empty() {
        return Err(AppError::invalid("login and password are required"));
    }
    Ok(())
}

async fn hash_blocking(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn verify_blocking(password: &str, hash: String) -> AppResult<bool> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Digest checked against when the login is unknown, so both failure paths
/// pay for one bcrypt verification.
async fn dummy_hash() -> AppResult<String> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash.clone());
    }
    let hash = hash_blocking("dummy-password").await?;
    Ok(DUMMY.get_or_init(|| hash).clone())
}

/// Creates a user and returns its public code.
///
/// `next_id` supplies candidate codes; a collision on the primary key draws
/// another one, up to [`MAX_ID_ATTEMPTS`].
pub async fn register_user<F>(
    users: &dyn UserStore,
    login: &str,
    password: &str,
    mut next_id: F,
) -> AppResult<String>
where
    F: FnMut() -> String,
{
    require_credentials(login, password)?;

    if users.find_by_login(login).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    let pass_hash = hash_blocking(password).await?;

    for attempt in 1..=MAX_ID_ATTEMPTS {
        let user = User {
            user_id: next_id(),
            login: login.to_owned(),
            pass_hash: pass_hash.clone(),
        };
        match users.create(&user).await {
            Ok(()) => {
                debug!(user_id = %user.user_id, attempt, "user row inserted");
                return Ok(user.user_id);
            }
            Err(StoreError::UniqueViolation { constraint }) if constraint == USER_ID_CONSTRAINT => {
                warn!(user_id = %user.user_id, attempt, "user_id collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StoreError::IdAllocation {
        attempts: MAX_ID_ATTEMPTS,
    }
    .into())
}

/// Checks a login/password pair and returns the user's code.
///
/// Unknown login and wrong password both yield `InvalidCredentials`.
pub async fn authenticate(users: &dyn UserStore, login: &str, password: &str) -> AppResult<String> {
    require_credentials(login, password)?;

    let Some(user) = users.find_by_login(login).await? else {
        let hash = dummy_hash().await?;
        let _ = verify_blocking(password, hash).await?;
        return Err(AppError::InvalidCredentials);
    };

    if !verify_blocking(password, user.pass_hash).await? {
        return Err(AppError::InvalidCredentials);
    }
    Ok(user.user_id)
}
