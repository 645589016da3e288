pub mod config;
pub mod database;
pub mod handlers;
pub mod security;
pub mod services;
pub mod utils;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use database::Repository;
use security::ApiTokenValidator;
use services::SearchService;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Public health probes plus the authenticated company lookup routes.
pub fn build_router(
    search_service: Arc<SearchService>,
    token_validator: Arc<ApiTokenValidator>,
    repository: Arc<Repository>,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .layer(Extension(repository));

    let protected_routes = Router::new()
        .route(
            "/api/v1/companies/{id}",
            get(handlers::companies::get_company_by_id),
        )
        .route(
            "/api/v1/companies/search/by/name/{name}",
            get(handlers::companies::get_company_by_name),
        )
        .route(
            "/api/v1/companies/search/by/activity/{activity}",
            get(handlers::companies::get_companies_by_activity),
        )
        .route(
            "/api/v1/companies/search/by/address/{address}",
            get(handlers::companies::get_companies_by_address),
        )
        .route(
            "/api/v1/companies/search/by/geo/",
            post(handlers::companies::get_companies_by_geo),
        )
        .layer(middleware::from_fn(security::auth_middleware))
        .layer(Extension(search_service))
        .layer(Extension(token_validator));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
}
