//! Ordered request pipeline run ahead of router dispatch. Each stage maps
//! `(request, state)` to either a rewritten request or a short-circuit
//! response, so ordering and skipping are testable without the router.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde_json::Value;
use tower::util::ServiceExt;
use tower_http::services::ServeDir;
use url::form_urlencoded;

use crate::config::AppConfig;
use crate::domain::errors::PageError;
use crate::domain::ports::UserStore;
use crate::interface_adapters::context::{ActiveSession, CurrentUser, SessionContext, ViewContext};
use crate::interface_adapters::session_cookie::{self, SESSION_COOKIE_NAME};
use crate::interface_adapters::state::{
    AppState, PostgresSessionStore, PostgresUserStore, SystemClock,
};
use crate::use_cases::sessions::{
    FlashUseCase, ResolveSessionUseCase, ResolvedSession, TOUCH_AFTER_SECONDS,
};

// Bodies are buffered for sanitization; anything larger is refused.
const MAX_BUFFERED_BODY_BYTES: usize = 1 << 20;

pub enum StageOutcome {
    Continue(Request),
    Done(Response),
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn apply(&self, req: Request, state: &AppState) -> Result<StageOutcome, PageError>;
}

// Fixed-order stage list assembled from configuration. Disabled stages
// are simply absent; the remaining stages tolerate the missing effects.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut stages: Vec<Box<dyn Stage>> = Vec::new();
        if config.pipeline.method_override {
            stages.push(Box::new(MethodOverrideStage));
        }
        if config.pipeline.serve_static {
            stages.push(Box::new(StaticAssetStage::new(&config.public_dir)));
        }
        if config.pipeline.sanitize {
            stages.push(Box::new(SanitizeStage));
        }
        if config.pipeline.sessions {
            stages.push(Box::new(SessionStage));
        }
        if config.pipeline.flash {
            stages.push(Box::new(FlashStage));
        }
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, mut req: Request, state: &AppState) -> Result<StageOutcome, PageError> {
        for stage in &self.stages {
            match stage.apply(req, state).await? {
                StageOutcome::Continue(next) => req = next,
                done => return Ok(done),
            }
        }
        Ok(StageOutcome::Continue(req))
    }
}

// Axum middleware wrapping the whole router, fallback included, so the
// pipeline runs before any dispatch decision.
pub async fn run_pipeline(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let pipeline = state.pipeline.clone();
    match pipeline.run(req, &state).await {
        Ok(StageOutcome::Continue(req)) => next.run(req).await,
        Ok(StageOutcome::Done(response)) => response,
        Err(err) => err.into_response(),
    }
}

// Stage 2: HTML forms can only GET/POST, so a reserved `_method` query
// field on a POST rewrites the effective method.
struct MethodOverrideStage;

#[async_trait]
impl Stage for MethodOverrideStage {
    fn name(&self) -> &'static str {
        "method_override"
    }

    async fn apply(&self, mut req: Request, _state: &AppState) -> Result<StageOutcome, PageError> {
        if req.method() != Method::POST {
            return Ok(StageOutcome::Continue(req));
        }

        let target = req.uri().query().and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "_method")
                .map(|(_, value)| value.to_ascii_uppercase())
        });

        match target.as_deref() {
            Some("PUT") => *req.method_mut() = Method::PUT,
            Some("DELETE") => *req.method_mut() = Method::DELETE,
            Some("PATCH") => *req.method_mut() = Method::PATCH,
            // Unknown targets are ignored rather than rejected.
            _ => {}
        }

        Ok(StageOutcome::Continue(req))
    }
}

// Stage 3: short-circuit for known public asset paths.
struct StaticAssetStage {
    serve: ServeDir,
}

impl StaticAssetStage {
    fn new(public_dir: &str) -> Self {
        Self {
            serve: ServeDir::new(public_dir),
        }
    }
}

#[async_trait]
impl Stage for StaticAssetStage {
    fn name(&self) -> &'static str {
        "static_assets"
    }

    async fn apply(&self, mut req: Request, _state: &AppState) -> Result<StageOutcome, PageError> {
        let path = req.uri().path();
        if !path.starts_with("/public/") {
            return Ok(StageOutcome::Continue(req));
        }
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return Ok(StageOutcome::Continue(req));
        }

        // ServeDir resolves relative to its root, so drop the mount prefix.
        let stripped: Uri = path["/public".len()..]
            .parse()
            .map_err(|_| PageError::not_found())?;
        *req.uri_mut() = stripped;

        let response = match self.serve.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        Ok(StageOutcome::Done(response.map(Body::new)))
    }
}

// Stage 4: strip keys that could read as query operators from the query
// string and from form/JSON bodies.
struct SanitizeStage;

pub(crate) fn key_is_operator_like(key: &str) -> bool {
    key.contains('$') || key.contains('.')
}

// Returns the re-encoded pair list when anything was stripped.
fn sanitize_pairs(raw: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if !pairs.iter().any(|(k, _)| key_is_operator_like(k)) {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs.iter().filter(|(k, _)| !key_is_operator_like(k)) {
        serializer.append_pair(k, v);
    }
    Some(serializer.finish())
}

pub(crate) fn sanitize_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key_is_operator_like(key));
            for nested in map.values_mut() {
                sanitize_json(nested);
            }
        }
        Value::Array(items) => {
            for nested in items.iter_mut() {
                sanitize_json(nested);
            }
        }
        _ => {}
    }
}

fn replace_query(uri: &Uri, query: &str) -> Result<Uri, PageError> {
    let path = uri.path();
    let raw = if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(raw).map_err(|_| PageError::internal())?);
    Uri::from_parts(parts).map_err(|_| PageError::internal())
}

#[async_trait]
impl Stage for SanitizeStage {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    async fn apply(&self, mut req: Request, _state: &AppState) -> Result<StageOutcome, PageError> {
        if let Some(query) = req.uri().query() {
            if let Some(cleaned) = sanitize_pairs(query) {
                *req.uri_mut() = replace_query(req.uri(), &cleaned)?;
            }
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let is_form = content_type.starts_with("application/x-www-form-urlencoded");
        let is_json = content_type.starts_with("application/json");
        if !is_form && !is_json {
            return Ok(StageOutcome::Continue(req));
        }

        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES)
            .await
            .map_err(|_| PageError::new(413, "Payload Too Large"))?;

        let replacement = if is_form {
            std::str::from_utf8(&bytes)
                .ok()
                .and_then(|raw| sanitize_pairs(raw).map(String::into_bytes))
        } else {
            // Malformed JSON passes through; the handler's extractor is
            // the validator, not the sanitizer.
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(mut value) => {
                    let before = value.clone();
                    sanitize_json(&mut value);
                    if value != before {
                        Some(serde_json::to_vec(&value).map_err(|_| PageError::internal())?)
                    } else {
                        None
                    }
                }
                Err(_) => None,
            }
        };

        let req = match replacement {
            Some(cleaned) => {
                let mut req = Request::from_parts(parts, Body::from(cleaned.clone()));
                req.headers_mut()
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(cleaned.len()));
                req
            }
            None => Request::from_parts(parts, Body::from(bytes)),
        };
        Ok(StageOutcome::Continue(req))
    }
}

// Stages 5 and 6: resume the cookie-carried session against the store and
// resolve the current-user identity. Only absent, expired, or invalid
// sessions resolve as anonymous; storage failures surface through the
// terminal error handler.
struct SessionStage;

#[async_trait]
impl Stage for SessionStage {
    fn name(&self) -> &'static str {
        "sessions"
    }

    async fn apply(&self, mut req: Request, state: &AppState) -> Result<StageOutcome, PageError> {
        let jar = CookieJar::from_headers(req.headers());
        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| session_cookie::verify(cookie.value(), &state.config.secret));

        let mut session_ctx = SessionContext::default();
        let mut current_user = None;

        if let Some(id) = session_id {
            let resolve = ResolveSessionUseCase {
                clock: SystemClock,
                store: PostgresSessionStore {
                    db: state.db.clone(),
                },
                touch_after_seconds: TOUCH_AFTER_SECONDS,
            };

            match resolve.execute(id).await {
                Ok(ResolvedSession::Active(record)) => {
                    if let Some(user_id) = record.data.user_id {
                        let users = PostgresUserStore {
                            db: state.db.clone(),
                        };
                        match users.find_by_id(user_id).await {
                            Ok(Some(user)) => {
                                current_user = Some(CurrentUser {
                                    id: user.id,
                                    username: user.username,
                                });
                            }
                            // Account deleted since login; stay anonymous.
                            Ok(None) => {}
                            Err(err) => {
                                tracing::error!(error = %err, "failed to load session user");
                                return Err(PageError::internal());
                            }
                        }
                    }
                    session_ctx.id = Some(record.id);
                    req.extensions_mut().insert(ActiveSession(record));
                }
                Ok(ResolvedSession::Anonymous) => {}
                Err(err) => {
                    tracing::error!(error = %err, "failed to resolve session");
                    return Err(PageError::internal());
                }
            }
        }

        req.extensions_mut().insert(session_ctx);
        req.extensions_mut().insert(ViewContext {
            current_user,
            flash: Vec::new(),
        });
        Ok(StageOutcome::Continue(req))
    }
}

// Stage 7: drain one-shot flash messages into the view context. Reading
// clears them in the store, so each message renders exactly once.
struct FlashStage;

#[async_trait]
impl Stage for FlashStage {
    fn name(&self) -> &'static str {
        "flash"
    }

    async fn apply(&self, mut req: Request, state: &AppState) -> Result<StageOutcome, PageError> {
        let Some(ActiveSession(record)) = req.extensions().get::<ActiveSession>().cloned() else {
            return Ok(StageOutcome::Continue(req));
        };
        if record.data.flash.is_empty() {
            return Ok(StageOutcome::Continue(req));
        }

        let flash = FlashUseCase {
            store: PostgresSessionStore {
                db: state.db.clone(),
            },
        };
        let messages = flash.take(&record).await.map_err(|err| {
            tracing::error!(error = %err, "failed to take flash messages");
            PageError::internal()
        })?;
        if let Some(view) = req.extensions_mut().get_mut::<ViewContext>() {
            view.flash = messages;
        }

        Ok(StageOutcome::Continue(req))
    }
}
