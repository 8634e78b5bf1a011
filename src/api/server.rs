//! # HTTP Server
//!
//! Router construction and serving. Routes translate the wire surface
//! into tracker calls; the tracker arrives through router state. Bodies
//! are accepted as JSON or form data, matching the HTML form the static
//! page submits.

use axum::async_trait;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::Config;
use crate::observability::Logger;

use super::errors::{ApiError, ApiResult};
use super::handler::Tracker;
use super::request::{ExerciseBody, LogParams, UserBody};
use super::response::{ExerciseResponse, LogResponse, UserResponse};

/// Builds the application router.
pub fn router(config: &Config, tracker: Tracker) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route_service("/", ServeFile::new(config.public_dir.join("index.html")))
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .route("/api/users", post(create_user).get(list_users))
        .route("/api/users/:id/exercises", post(add_exercise))
        .route("/api/users/:id/logs", get(get_logs))
        .layer(cors)
        .with_state(tracker)
}

/// Binds the configured address and serves until shutdown.
pub async fn serve(config: Config, tracker: Tracker) -> Result<(), std::io::Error> {
    let addr = config.socket_addr();
    let app = router(&config, tracker);

    let listener = TcpListener::bind(&addr).await?;
    Logger::info(
        "SERVER_STARTED",
        &[
            ("addr", &addr),
            ("public_dir", &config.public_dir.display().to_string()),
        ],
    );
    axum::serve(listener, app).await
}

async fn create_user(
    State(tracker): State<Tracker>,
    JsonOrForm(body): JsonOrForm<UserBody>,
) -> ApiResult<Json<UserResponse>> {
    let new_user = body.validate()?;
    Ok(Json(tracker.create_user(new_user)?))
}

async fn list_users(State(tracker): State<Tracker>) -> ApiResult<Json<Vec<UserResponse>>> {
    Ok(Json(tracker.list_users()?))
}

async fn add_exercise(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
    JsonOrForm(body): JsonOrForm<ExerciseBody>,
) -> ApiResult<Json<ExerciseResponse>> {
    let new_exercise = body.validate(Utc::now().date_naive())?;
    Ok(Json(tracker.add_exercise(&id, new_exercise)?))
}

async fn get_logs(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
    Query(params): Query<LogParams>,
) -> ApiResult<Json<LogResponse>> {
    Ok(Json(tracker.get_logs(&id, params.into_query())?))
}

/// Body extractor accepting `application/json` or
/// `application/x-www-form-urlencoded` (what the static page's forms
/// submit). Anything else is rejected as an invalid body.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
            return Ok(Self(value));
        }

        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
        Ok(Self(value))
    }
}
