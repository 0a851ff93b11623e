use crate::domain::entities::{NewUser, User};
use crate::domain::errors::AccountError;
use crate::domain::ports::{Clock, UserStore, UserStoreError};
use crate::use_cases::password;

// Request payload for account creation.
#[derive(Clone, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// Account creation with injected dependencies.
pub struct RegisterUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> RegisterUseCase<C, S>
where
    C: Clock,
    S: UserStore,
{
    pub async fn execute(&self, payload: RegisterRequest) -> Result<User, AccountError> {
        let username = validate_username(&payload.username)?;

        if !payload.email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        if payload.password.chars().count() < 8 {
            return Err(AccountError::WeakPassword);
        }

        let user = NewUser {
            username,
            email: payload.email.trim().to_string(),
            password_hash: password::hash_password(&payload.password),
            created_at: self.clock.now_epoch_seconds(),
        };

        self.store.insert(user).await.map_err(|err| match err {
            UserStoreError::DuplicateUsername => AccountError::UsernameTaken,
            UserStoreError::Storage(_) => AccountError::StorageFailure,
        })
    }
}

fn validate_username(value: &str) -> Result<String, AccountError> {
    // Keep names compact and readable for page headers and logs.
    const MIN_LEN: usize = 3;
    const MAX_LEN: usize = 32;

    let len = value.chars().count();

    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(AccountError::InvalidUsername);
    }
    if value.trim() != value {
        return Err(AccountError::InvalidUsername);
    }

    // Allow a simple safe charset across the stack.
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(AccountError::InvalidUsername);
    }

    Ok(value.to_string())
}
