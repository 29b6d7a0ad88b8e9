//! HTTP surface: routes, handlers and the error-to-response mapping.
//!
//! Every error body is `{"ok": false, "error": <message>}`; callers branch
//! on `ok` and the status code, so that contract is load-bearing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use weather_core::{ApiError, Pipeline, ResultsPage, StoredObservation};

pub fn router(pipeline: Pipeline) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather", get(fetch_weather))
        .route("/api/results", get(list_results).delete(clear_results))
        .route("/api/results/:id", get(get_result))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(pipeline)
}

#[derive(Serialize)]
struct DataBody<T> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ListBody {
    ok: bool,
    #[serde(flatten)]
    results: ResultsPage,
}

#[derive(Serialize)]
struct OkBody {
    ok: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

/// Newtype so [`ApiError`] can cross into axum's response world.
struct AppError(ApiError);

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorBody { ok: false, error: self.0.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

async fn fetch_weather(
    State(pipeline): State<Pipeline>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<DataBody<StoredObservation>>, AppError> {
    let stored = pipeline
        .fetch_and_store(query.city.as_deref().unwrap_or(""))
        .await?;

    Ok(Json(DataBody { ok: true, data: stored }))
}

/// Raw strings so the validator, not the extractor, decides what an integer
/// is and with which message it gets rejected.
#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
}

async fn list_results(
    State(pipeline): State<Pipeline>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListBody>, AppError> {
    let results = pipeline
        .list(query.page.as_deref(), query.limit.as_deref())
        .await?;

    Ok(Json(ListBody { ok: true, results }))
}

async fn get_result(
    State(pipeline): State<Pipeline>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<StoredObservation>>, AppError> {
    let stored = pipeline.get(&id).await?;
    Ok(Json(DataBody { ok: true, data: stored }))
}

async fn clear_results(State(pipeline): State<Pipeline>) -> Result<Json<OkBody>, AppError> {
    pipeline.clear().await?;
    Ok(Json(OkBody { ok: true }))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody { ok: false, error: "Route not found".into() }),
    )
}
