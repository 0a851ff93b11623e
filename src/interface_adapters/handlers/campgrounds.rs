use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::domain::entities::{CampgroundUpdate, FlashMessage, NewCampground};
use crate::domain::errors::PageError;
use crate::domain::ports::{CampgroundStore, Clock, ReviewStore};
use crate::interface_adapters::context::{SessionContext, ViewContext};
use crate::interface_adapters::handlers::{
    flash_redirect, require_login_redirect, storage_error,
};
use crate::interface_adapters::protocol::CampgroundForm;
use crate::interface_adapters::state::{
    AppState, PostgresCampgroundStore, PostgresReviewStore, SystemClock,
};
use crate::interface_adapters::views;

fn campground_not_found() -> PageError {
    PageError::new(404, "Campground not found")
}

// Route ids arrive as text; a non-numeric id is the same miss as an
// unknown one, funneled through the shared error path.
fn parse_id(raw: &str) -> Result<i64, PageError> {
    raw.parse().map_err(|_| campground_not_found())
}

#[tracing::instrument(name = "campgrounds_index", skip_all)]
pub async fn index(
    State(state): State<AppState>,
    ctx: ViewContext,
) -> Result<Html<String>, PageError> {
    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let campgrounds = store.list().await.map_err(storage_error)?;
    Ok(Html(views::render_campground_index(&ctx, &campgrounds)))
}

pub async fn new_form(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
) -> Result<Response, PageError> {
    if ctx.current_user.is_none() {
        return require_login_redirect(&state, &sess).await;
    }
    Ok(Html(views::render_campground_new(&ctx)).into_response())
}

#[tracing::instrument(name = "campgrounds_create", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Form(form): Form<CampgroundForm>,
) -> Result<Response, PageError> {
    let Some(user) = ctx.current_user else {
        return require_login_redirect(&state, &sess).await;
    };

    let input = form.parse().map_err(PageError::bad_request)?;

    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let id = store
        .insert(NewCampground {
            title: input.title,
            location: input.location,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            author_id: user.id,
            created_at: SystemClock.now_epoch_seconds(),
        })
        .await
        .map_err(storage_error)?;

    flash_redirect(
        &state,
        &sess,
        FlashMessage::success("Successfully made a new campground!"),
        &format!("/campgrounds/{id}"),
    )
    .await
}

#[tracing::instrument(name = "campgrounds_show", skip_all)]
pub async fn show(
    State(state): State<AppState>,
    ctx: ViewContext,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = parse_id(&id)?;

    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let campground = store
        .get(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(campground_not_found)?;

    let reviews = PostgresReviewStore {
        db: state.db.clone(),
    }
    .list_for_campground(id)
    .await
    .map_err(storage_error)?;

    Ok(Html(views::render_campground_show(&ctx, &campground, &reviews)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let Some(user) = ctx.current_user.clone() else {
        return require_login_redirect(&state, &sess).await;
    };

    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let campground = store
        .get(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(campground_not_found)?;

    if campground.author_id != user.id {
        return flash_redirect(
            &state,
            &sess,
            FlashMessage::error("You do not have permission to do that!"),
            &format!("/campgrounds/{id}"),
        )
        .await;
    }

    Ok(Html(views::render_campground_edit(&ctx, &campground)).into_response())
}

#[tracing::instrument(name = "campgrounds_update", skip_all)]
pub async fn update(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Path(id): Path<String>,
    Form(form): Form<CampgroundForm>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let Some(user) = ctx.current_user else {
        return require_login_redirect(&state, &sess).await;
    };

    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let campground = store
        .get(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(campground_not_found)?;

    if campground.author_id != user.id {
        return flash_redirect(
            &state,
            &sess,
            FlashMessage::error("You do not have permission to do that!"),
            &format!("/campgrounds/{id}"),
        )
        .await;
    }

    let input = form.parse().map_err(PageError::bad_request)?;
    store
        .update(
            id,
            CampgroundUpdate {
                title: input.title,
                location: input.location,
                price: input.price,
                description: input.description,
                image_url: input.image_url,
            },
        )
        .await
        .map_err(storage_error)?;

    flash_redirect(
        &state,
        &sess,
        FlashMessage::success("Successfully updated campground!"),
        &format!("/campgrounds/{id}"),
    )
    .await
}

#[tracing::instrument(name = "campgrounds_delete", skip_all)]
pub async fn destroy(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let Some(user) = ctx.current_user else {
        return require_login_redirect(&state, &sess).await;
    };

    let store = PostgresCampgroundStore {
        db: state.db.clone(),
    };
    let campground = store
        .get(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(campground_not_found)?;

    if campground.author_id != user.id {
        return flash_redirect(
            &state,
            &sess,
            FlashMessage::error("You do not have permission to do that!"),
            &format!("/campgrounds/{id}"),
        )
        .await;
    }

    store.delete(id).await.map_err(storage_error)?;

    flash_redirect(
        &state,
        &sess,
        FlashMessage::success("Successfully deleted campground"),
        "/campgrounds",
    )
    .await
}
