use axum::{
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::ServerState;
use crate::errors::error_response;

pub mod auth;
pub mod doctors;
pub mod mappings;
pub mod patients;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Liveness")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, serde_json::Value::Null)
}

/// Build the full application router: public auth + health routes, the
/// bearer-protected resource routes, and the Swagger UI.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/token/refresh", post(auth::refresh));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/patients", get(patients::list).post(patients::create))
        .route(
            "/patients/:id",
            get(patients::get)
                .put(patients::update_full)
                .patch(patients::update_partial)
                .delete(patients::delete),
        )
        .route("/doctors", get(doctors::list).post(doctors::create))
        .route(
            "/doctors/:id",
            get(doctors::get)
                .put(doctors::update_full)
                .patch(doctors::update_partial)
                .delete(doctors::delete),
        )
        .route("/mappings", get(mappings::list).post(mappings::create))
        .route("/mappings/detail/:id", get(mappings::get).delete(mappings::delete))
        .route("/mappings/:patient_id", get(mappings::doctors_for_patient))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_bearer_user,
        ));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
