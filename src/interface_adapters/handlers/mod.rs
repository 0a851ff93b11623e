pub mod campgrounds;
pub mod pages;
pub mod reviews;
pub mod users;

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};

use crate::domain::entities::{FlashMessage, SessionData};
use crate::domain::errors::PageError;
use crate::interface_adapters::context::SessionContext;
use crate::interface_adapters::session_cookie;
use crate::interface_adapters::state::{AppState, PostgresSessionStore, SystemClock};
use crate::use_cases::sessions::{DestroySessionUseCase, FlashUseCase, IssueSessionUseCase};

// Storage failures are logged here and leave the process as normalized
// 500s; raw driver errors never reach the caller.
pub(crate) fn storage_error(err: String) -> PageError {
    tracing::error!(error = %err, "storage failure");
    PageError::internal()
}

// Flash-then-redirect. Anonymous callers without a session get a plain
// redirect; a session is not created just to carry a notification.
pub(crate) async fn flash_redirect(
    state: &AppState,
    sess: &SessionContext,
    flash: FlashMessage,
    to: &str,
) -> Result<Response, PageError> {
    if let Some(id) = sess.id {
        let use_case = FlashUseCase {
            store: PostgresSessionStore {
                db: state.db.clone(),
            },
        };
        if let Err(err) = use_case.push(id, flash).await {
            tracing::error!(error = %err, "failed to store flash message");
        }
    }
    Ok(Redirect::to(to).into_response())
}

pub(crate) async fn require_login_redirect(
    state: &AppState,
    sess: &SessionContext,
) -> Result<Response, PageError> {
    flash_redirect(
        state,
        sess,
        FlashMessage::error("You must be signed in first!"),
        "/login",
    )
    .await
}

// Issues a fresh session row and cookie, dropping any previous session so
// login never reuses an identifier the client already held. The row is
// written before the response leaves.
pub(crate) async fn start_session(
    state: &AppState,
    previous: &SessionContext,
    user_id: Option<i64>,
    flash: FlashMessage,
    to: &str,
) -> Result<Response, PageError> {
    let store = PostgresSessionStore {
        db: state.db.clone(),
    };

    if let Some(old_id) = previous.id {
        let destroy = DestroySessionUseCase {
            store: store.clone(),
        };
        if let Err(err) = destroy.execute(old_id).await {
            tracing::error!(error = %err, "failed to remove previous session");
        }
    }

    let issue = IssueSessionUseCase {
        clock: SystemClock,
        store,
    };
    let record = issue
        .execute(SessionData {
            user_id,
            flash: vec![flash],
        })
        .await
        .map_err(storage_error)?;

    let cookie =
        session_cookie::set_cookie_header(record.id, &state.config.secret, state.config.cookie_secure);
    let value = HeaderValue::from_str(&cookie).map_err(|_| PageError::internal())?;

    let mut response = Redirect::to(to).into_response();
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}
