//! In-memory stores used by the test suite in place of Postgres.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::repo::{UserStore, LOGIN_CONSTRAINT, USER_ID_CONSTRAINT};
use crate::auth::repo_types::User;
use crate::db::StoreError;
use crate::ecg::repo::SignalStore;
use crate::ecg::repo_types::EcgSample;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    hide_logins: AtomicBool,
}

impl MemoryUserStore {
    /// Makes `find_by_login` miss, as if a concurrent registration had not
    /// committed yet when the existence check ran.
    pub fn hide_logins_from_lookup(&self) {
        self.hide_logins.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, login: &str) -> Option<User> {
        let users = self.users.lock().unwrap();
        users.iter().find(|u| u.login == login).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        if self.hide_logins.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.get(login))
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.user_id == user.user_id) {
            return Err(StoreError::UniqueViolation {
                constraint: USER_ID_CONSTRAINT.into(),
            });
        }
        if users.iter().any(|u| u.login == user.login) {
            return Err(StoreError::UniqueViolation {
                constraint: LOGIN_CONSTRAINT.into(),
            });
        }
        users.push(user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySignalStore {
    rows: Mutex<Vec<(String, EcgSample)>>,
    fail_after: Option<usize>,
    delay: Option<Duration>,
}

impl MemorySignalStore {
    /// A store whose batch insert breaks after `n` rows of a batch.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// A store whose reads stall for `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn insert_batch(&self, user_id: &str, samples: &[EcgSample]) -> Result<(), StoreError> {
        let mut staged = Vec::with_capacity(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            if self.fail_after == Some(i) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            staged.push((user_id.to_owned(), sample.clone()));
        }
        self.rows.lock().unwrap().extend(staged);
        Ok(())
    }

    async fn list_since(
        &self,
        user_id: &str,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<EcgSample>, StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<EcgSample> = rows
            .iter()
            .filter(|(id, s)| id == user_id && s.timestamp >= cutoff)
            .map(|(_, s)| s.clone())
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(out)
    }
}
