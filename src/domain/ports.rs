use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{
    Campground, CampgroundUpdate, NewCampground, NewReview, NewUser, Review, SessionData,
    SessionRecord, User,
};

// Port for the database-backed session store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: SessionRecord) -> Result<(), String>;
    async fn get(&self, id: Uuid) -> Result<Option<SessionRecord>, String>;
    async fn update_data(&self, id: Uuid, data: SessionData) -> Result<(), String>;
    async fn touch(&self, id: Uuid, touched_at: i64) -> Result<(), String>;
    async fn remove(&self, id: Uuid) -> Result<bool, String>;
}

// Insert failures that callers need to tell apart from plain storage errors.
#[derive(Debug, PartialEq, Eq)]
pub enum UserStoreError {
    DuplicateUsername,
    Storage(String),
}

// Port for account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, UserStoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, String>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, String>;
}

// Port for campground persistence.
#[async_trait]
pub trait CampgroundStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Campground>, String>;
    async fn get(&self, id: i64) -> Result<Option<Campground>, String>;
    async fn insert(&self, campground: NewCampground) -> Result<i64, String>;
    async fn update(&self, id: i64, update: CampgroundUpdate) -> Result<bool, String>;
    async fn delete(&self, id: i64) -> Result<bool, String>;
}

// Port for review persistence.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_for_campground(&self, campground_id: i64) -> Result<Vec<Review>, String>;
    async fn get(&self, review_id: i64) -> Result<Option<Review>, String>;
    async fn insert(&self, review: NewReview) -> Result<i64, String>;
    async fn delete(&self, campground_id: i64, review_id: i64) -> Result<bool, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> i64;
}
