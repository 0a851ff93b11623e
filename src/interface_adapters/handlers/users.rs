use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::domain::entities::FlashMessage;
use crate::domain::errors::{AccountError, PageError};
use crate::interface_adapters::context::{SessionContext, ViewContext};
use crate::interface_adapters::handlers::{flash_redirect, start_session, storage_error};
use crate::interface_adapters::protocol::{LoginForm, RegisterForm};
use crate::interface_adapters::state::{AppState, PostgresUserStore, SystemClock};
use crate::interface_adapters::views;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::register::{RegisterRequest, RegisterUseCase};

pub async fn register_form(ctx: ViewContext) -> Response {
    if ctx.current_user.is_some() {
        return Redirect::to("/campgrounds").into_response();
    }
    Html(views::render_register(&ctx)).into_response()
}

pub async fn login_form(ctx: ViewContext) -> Response {
    if ctx.current_user.is_some() {
        return Redirect::to("/campgrounds").into_response();
    }
    Html(views::render_login(&ctx)).into_response()
}

#[tracing::instrument(name = "register", skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    sess: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    let use_case = RegisterUseCase {
        clock: SystemClock,
        store: PostgresUserStore {
            db: state.db.clone(),
        },
    };

    let result = use_case
        .execute(RegisterRequest {
            username: form.username,
            email: form.email,
            password: form.password,
        })
        .await;

    match result {
        Ok(user) => {
            tracing::info!(user_id = user.id, "account created");
            start_session(
                &state,
                &sess,
                Some(user.id),
                FlashMessage::success("Welcome to Yelp Camp!"),
                "/campgrounds",
            )
            .await
        }
        Err(err) => {
            let message = match err {
                AccountError::InvalidUsername => "Invalid username",
                AccountError::InvalidEmail => "Invalid email address",
                AccountError::WeakPassword => "Password must be at least 8 characters",
                AccountError::UsernameTaken => "That username is already taken",
                AccountError::InvalidCredentials | AccountError::StorageFailure => {
                    return Err(storage_error("account creation failed".to_string()));
                }
            };
            flash_redirect(&state, &sess, FlashMessage::error(message), "/register").await
        }
    }
}

#[tracing::instrument(name = "login", skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    sess: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let use_case = LoginUseCase {
        store: PostgresUserStore {
            db: state.db.clone(),
        },
    };

    match use_case.execute(&form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "login succeeded");
            start_session(
                &state,
                &sess,
                Some(user.id),
                FlashMessage::success("Welcome back!"),
                "/campgrounds",
            )
            .await
        }
        Err(AccountError::InvalidCredentials) => {
            flash_redirect(
                &state,
                &sess,
                FlashMessage::error("Invalid username or password"),
                "/login",
            )
            .await
        }
        Err(_) => Err(storage_error("login failed".to_string())),
    }
}

#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    sess: SessionContext,
) -> Result<Response, PageError> {
    // The old session row is dropped and a fresh anonymous one carries
    // the goodbye flash.
    start_session(
        &state,
        &sess,
        None,
        FlashMessage::success("Goodbye!"),
        "/campgrounds",
    )
    .await
}
