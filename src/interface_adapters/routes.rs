use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::Layer as _;
use tower_http::trace::TraceLayer;

use crate::interface_adapters::handlers::{campgrounds, pages, reviews, users};
use crate::interface_adapters::pipeline::run_pipeline;
use crate::interface_adapters::state::AppState;

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(pages::home))
        .route("/register", get(users::register_form).post(users::register))
        .route("/login", get(users::login_form).post(users::login))
        .route("/logout", get(users::logout))
        .route(
            "/campgrounds",
            get(campgrounds::index).post(campgrounds::create),
        )
        .route("/campgrounds/new", get(campgrounds::new_form))
        .route(
            "/campgrounds/{id}",
            get(campgrounds::show)
                .put(campgrounds::update)
                .delete(campgrounds::destroy),
        )
        .route("/campgrounds/{id}/edit", get(campgrounds::edit_form))
        .route("/campgrounds/{id}/reviews", post(reviews::create))
        .route(
            "/campgrounds/{id}/reviews/{review_id}",
            delete(reviews::destroy),
        )
        // Any unmatched method+path becomes the typed 404.
        .fallback(pages::not_found)
        .with_state(state.clone());

    // Method override and the static short-circuit rewrite the request, so
    // the pipeline must run before route matching. Middleware layered onto
    // a router runs after matching; wrapping the whole router and mounting
    // it as a catch-all service keeps the pipeline ahead of dispatch.
    let pipeline = middleware::from_fn_with_state(state, run_pipeline);
    Router::new()
        .fallback_service(pipeline.layer(router))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::domain::errors::PageError;
    use crate::interface_adapters::state::test_helpers::{
        test_config, test_state, test_state_with_config,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        String::from_utf8(bytes.to_vec()).expect("expected utf-8 body")
    }

    #[tokio::test]
    async fn when_home_is_requested_then_it_renders() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("YelpCamp"));
    }

    #[tokio::test]
    async fn when_path_is_unmatched_then_404_error_view_is_rendered() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn when_catch_all_is_mounted_twice_then_behavior_is_unchanged() {
        // Wrapping the app as another router's catch-all must leave
        // exactly one 404 path firing per unmatched request.
        let app = Router::new().fallback_service(app(test_state()));

        let request = Request::builder()
            .uri("/still-nonexistent")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn when_handler_fails_with_status_and_message_then_both_are_kept() {
        let app = app(test_state()).route(
            "/boom",
            get(|| async { Err::<(), _>(PageError::new(403, "Forbidden")) }),
        );

        let request = Request::builder()
            .uri("/boom")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("Forbidden"));
    }

    #[tokio::test]
    async fn when_handler_fails_without_details_then_defaults_are_rendered() {
        let app = app(test_state()).route(
            "/boom",
            get(|| async { Err::<(), _>(PageError::internal()) }),
        );

        let request = Request::builder()
            .uri("/boom")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response)
            .await
            .contains("Oh no, something went wrong!"));
    }

    #[tokio::test]
    async fn when_campground_id_is_not_numeric_then_404_is_rendered() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/campgrounds/not-a-number")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Campground not found"));
    }

    #[tokio::test]
    async fn when_method_override_targets_an_unrouted_method_then_405_is_returned() {
        let app = app(test_state());

        // Override turns the POST into DELETE /campgrounds, which has no
        // route on the collection.
        let request = Request::builder()
            .method("POST")
            .uri("/campgrounds?_method=DELETE")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn when_method_override_is_disabled_then_post_reaches_the_create_route() {
        let mut config = test_config();
        config.pipeline = PipelineConfig {
            method_override: false,
            ..PipelineConfig::default()
        };
        let app = app(test_state_with_config(config));

        let request = Request::builder()
            .method("POST")
            .uri("/campgrounds?_method=DELETE")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        // The anonymous caller is bounced to the login page by the
        // create handler, proving the POST was not rewritten.
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn when_anonymous_user_posts_a_campground_then_they_are_redirected_to_login() {
        let app = app(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/campgrounds")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Camp&location=Here&price=10"))
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn when_registration_payload_is_invalid_then_user_is_redirected_back() {
        let app = app(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "username=ab&email=a%40b.c&password=longenough",
            ))
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/register"
        );
    }

    #[tokio::test]
    async fn when_login_form_is_requested_then_it_renders() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/login")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Login"));
    }

    #[tokio::test]
    async fn when_public_asset_is_requested_then_it_short_circuits_the_router() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/public/stylesheets/app.css")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn when_query_carries_operator_like_keys_then_the_page_still_renders() {
        let app = app(test_state());

        let request = Request::builder()
            .uri("/?%24where=1")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
