// Fallback message shown when an error carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Oh no, something went wrong!";

// Message for the typed routing-miss error.
pub const NOT_FOUND_MESSAGE: &str = "Page Not Found";

// Uniform error shape flowing into the terminal error handler. Both
// fields are optional; a single normalization point supplies defaults so
// the user never sees an empty failure page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageError {
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl PageError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: Some(message.into()),
        }
    }

    // Routing miss: no handler matched the method+path.
    pub fn not_found() -> Self {
        Self::new(404, NOT_FOUND_MESSAGE)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    // Unclassified failure; normalization fills in the defaults.
    pub fn internal() -> Self {
        Self {
            status_code: None,
            message: None,
        }
    }

    // The one place where defaulting happens: status falls back to 500,
    // message to the fixed generic string.
    pub fn normalize(&self) -> (u16, &str) {
        let status = self.status_code.unwrap_or(500);
        let message = self
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        (status, message)
    }
}

// Validation failures for account workflows.
#[derive(Debug, PartialEq, Eq)]
pub enum AccountError {
    InvalidUsername,
    InvalidEmail,
    WeakPassword,
    UsernameTaken,
    InvalidCredentials,
    StorageFailure,
}
