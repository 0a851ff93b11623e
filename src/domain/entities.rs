use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Registered account. The password hash never leaves the storage layer
// except through this struct; views only ever see id and username.
#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// Fields required to create an account.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

// Campground listing joined with its author's username for display.
#[derive(Clone, Debug)]
pub struct Campground {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub author_id: i64,
    pub author_username: String,
}

#[derive(Clone, Debug)]
pub struct NewCampground {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub author_id: i64,
    pub created_at: i64,
}

// Editable subset of a campground.
#[derive(Clone, Debug)]
pub struct CampgroundUpdate {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
}

// Review joined with its author's username for display.
#[derive(Clone, Debug)]
pub struct Review {
    pub id: i64,
    pub campground_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub rating: i32,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub campground_id: i64,
    pub author_id: i64,
    pub rating: i32,
    pub body: String,
    pub created_at: i64,
}

// One-shot notification stored in the session and read exactly once.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: String,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error".to_string(),
            message: message.into(),
        }
    }
}

// Serialized session payload persisted in the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub flash: Vec<FlashMessage>,
}

// Session row as persisted. Lifetime is fixed from creation; touched_at
// tracks the last refresh for the touch policy, not the expiry.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub id: Uuid,
    pub data: SessionData,
    pub created_at: i64,
    pub expires_at: i64,
    pub touched_at: i64,
}
