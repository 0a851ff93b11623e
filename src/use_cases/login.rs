use crate::domain::entities::User;
use crate::domain::errors::AccountError;
use crate::domain::ports::UserStore;
use crate::use_cases::password;

// Credential check against the user store. Unknown usernames and wrong
// passwords are indistinguishable to the caller.
pub struct LoginUseCase<S> {
    pub store: S,
}

impl<S> LoginUseCase<S>
where
    S: UserStore,
{
    pub async fn execute(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let user = self
            .store
            .find_by_username(username)
            .await
            .map_err(|_| AccountError::StorageFailure)?
            .ok_or(AccountError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }
}
