use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;

use crate::domain::entities::{FlashMessage, NewReview};
use crate::domain::errors::PageError;
use crate::domain::ports::{CampgroundStore, Clock, ReviewStore};
use crate::interface_adapters::context::{SessionContext, ViewContext};
use crate::interface_adapters::handlers::{
    flash_redirect, require_login_redirect, storage_error,
};
use crate::interface_adapters::protocol::ReviewForm;
use crate::interface_adapters::state::{
    AppState, PostgresCampgroundStore, PostgresReviewStore, SystemClock,
};

fn campground_not_found() -> PageError {
    PageError::new(404, "Campground not found")
}

fn review_not_found() -> PageError {
    PageError::new(404, "Review not found")
}

fn parse_id(raw: &str, missing: fn() -> PageError) -> Result<i64, PageError> {
    raw.parse().map_err(|_| missing())
}

#[tracing::instrument(name = "reviews_create", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Path(campground_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, PageError> {
    let campground_id = parse_id(&campground_id, campground_not_found)?;
    let Some(user) = ctx.current_user else {
        return require_login_redirect(&state, &sess).await;
    };

    let input = form.parse().map_err(PageError::bad_request)?;

    // Reviews only attach to listings that exist.
    PostgresCampgroundStore {
        db: state.db.clone(),
    }
    .get(campground_id)
    .await
    .map_err(storage_error)?
    .ok_or_else(campground_not_found)?;

    PostgresReviewStore {
        db: state.db.clone(),
    }
    .insert(NewReview {
        campground_id,
        author_id: user.id,
        rating: input.rating,
        body: input.body,
        created_at: SystemClock.now_epoch_seconds(),
    })
    .await
    .map_err(storage_error)?;

    flash_redirect(
        &state,
        &sess,
        FlashMessage::success("Created new review!"),
        &format!("/campgrounds/{campground_id}"),
    )
    .await
}

#[tracing::instrument(name = "reviews_delete", skip_all)]
pub async fn destroy(
    State(state): State<AppState>,
    sess: SessionContext,
    ctx: ViewContext,
    Path((campground_id, review_id)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let campground_id = parse_id(&campground_id, campground_not_found)?;
    let review_id = parse_id(&review_id, review_not_found)?;
    let Some(user) = ctx.current_user else {
        return require_login_redirect(&state, &sess).await;
    };

    let store = PostgresReviewStore {
        db: state.db.clone(),
    };
    let review = store
        .get(review_id)
        .await
        .map_err(storage_error)?
        .filter(|review| review.campground_id == campground_id)
        .ok_or_else(review_not_found)?;

    if review.author_id != user.id {
        return flash_redirect(
            &state,
            &sess,
            FlashMessage::error("You do not have permission to do that!"),
            &format!("/campgrounds/{campground_id}"),
        )
        .await;
    }

    store
        .delete(campground_id, review_id)
        .await
        .map_err(storage_error)?;

    flash_redirect(
        &state,
        &sess,
        FlashMessage::success("Successfully deleted review"),
        &format!("/campgrounds/{campground_id}"),
    )
    .await
}
