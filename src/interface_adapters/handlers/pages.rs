use axum::response::Html;

use crate::domain::errors::PageError;
use crate::interface_adapters::context::ViewContext;
use crate::interface_adapters::views;

pub async fn home(ctx: ViewContext) -> Html<String> {
    Html(views::render_home(&ctx))
}

// Catch-all for every unmatched method+path: synthesize the typed 404
// and hand it to the terminal error handler.
pub async fn not_found() -> PageError {
    PageError::not_found()
}
