use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{NewUser, SessionData, SessionRecord, User};
use crate::domain::ports::{Clock, SessionStore, UserStore, UserStoreError};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}

// Toggles used by negative-path tests to simulate infrastructure failure.
#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub update: bool,
    pub touch: bool,
    pub remove: bool,
}

// In-memory session store that tests can inspect after the fact.
#[derive(Clone)]
pub(crate) struct RecordingSessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionRecord>>>,
    failures: FailureFlags,
}

impl RecordingSessionStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, record: SessionRecord) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(record.id, record);
    }

    pub(crate) fn get_test_session(&self, id: Uuid) -> Option<SessionRecord> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(&id).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn insert(&self, session: SessionRecord) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SessionRecord>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn update_data(&self, id: Uuid, data: SessionData) -> Result<(), String> {
        if self.failures.update {
            return Err("update failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        if let Some(record) = guard.get_mut(&id) {
            record.data = data;
        }
        Ok(())
    }

    async fn touch(&self, id: Uuid, touched_at: i64) -> Result<(), String> {
        if self.failures.touch {
            return Err("touch failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        if let Some(record) = guard.get_mut(&id) {
            record.touched_at = touched_at;
        }
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(&id).is_some())
    }
}

// In-memory user store keyed by username.
#[derive(Clone)]
pub(crate) struct RecordingUserStore {
    users: Arc<Mutex<Vec<User>>>,
    failures: FailureFlags,
}

impl RecordingUserStore {
    pub(crate) fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_user(&self, username: &str, email: &str, password_hash: &str) {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        let id = guard.len() as i64 + 1;
        guard.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        });
    }

    pub(crate) fn find_test_user(&self, username: &str) -> Option<User> {
        let guard = self.users.lock().expect("users mutex poisoned");
        guard.iter().find(|u| u.username == username).cloned()
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, UserStoreError> {
        if self.failures.insert {
            return Err(UserStoreError::Storage("insert failed".to_string()));
        }

        let mut guard = self.users.lock().expect("users mutex poisoned");
        if guard.iter().any(|u| u.username == user.username) {
            return Err(UserStoreError::DuplicateUsername);
        }

        let stored = User {
            id: guard.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, String> {
        if self.failures.get {
            return Err("lookup failed".to_string());
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, String> {
        if self.failures.get {
            return Err("lookup failed".to_string());
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.iter().find(|u| u.id == id).cloned())
    }
}
