use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::domain::entities::{FlashMessage, SessionRecord};

// Session attached to the current request, if any. Inserted by the
// session pipeline stage; defaults to "no session" when the stage is
// disabled so later extractors keep working.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    pub id: Option<Uuid>,
}

// Resolved identity for the current request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

// Values every rendered view receives: the resolved identity and the
// one-shot flash messages taken from the session.
#[derive(Clone, Debug, Default)]
pub struct ViewContext {
    pub current_user: Option<CurrentUser>,
    pub flash: Vec<FlashMessage>,
}

// Full session record carried between the session and flash stages.
#[derive(Clone, Debug)]
pub(crate) struct ActiveSession(pub(crate) SessionRecord);

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<SessionContext>().cloned().unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for ViewContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<ViewContext>().cloned().unwrap_or_default())
    }
}
