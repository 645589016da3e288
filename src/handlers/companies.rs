use crate::database::{Companies, Company};
use crate::services::SearchService;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub async fn get_company_by_id(
    Extension(service): Extension<Arc<SearchService>>,
    Path(pk): Path<i32>,
) -> Result<Json<Company>, ApiError> {
    let company = service.find_by_id(pk).await?;
    Ok(Json(company))
}

pub async fn get_company_by_name(
    Extension(service): Extension<Arc<SearchService>>,
    Path(name): Path<String>,
) -> Result<Json<Company>, ApiError> {
    let company = service.find_by_name(&name).await?;
    Ok(Json(company))
}

pub async fn get_companies_by_activity(
    Extension(service): Extension<Arc<SearchService>>,
    Path(activity): Path<String>,
) -> Result<Json<Companies>, ApiError> {
    let companies = service.find_by_activity(&activity).await?;
    Ok(Json(companies))
}

pub async fn get_companies_by_address(
    Extension(service): Extension<Arc<SearchService>>,
    Path(address): Path<String>,
) -> Result<Json<Companies>, ApiError> {
    let companies = service.find_by_address(&address).await?;
    Ok(Json(companies))
}

#[derive(Debug, Deserialize, Validate)]
pub struct GeoSearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Search radius in whole kilometers.
    #[validate(range(min = 1, max = 100))]
    pub radius: i32,
}

pub async fn get_companies_by_geo(
    Extension(service): Extension<Arc<SearchService>>,
    Json(request): Json<GeoSearchRequest>,
) -> Result<Json<Companies>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let companies = service
        .find_by_geo(request.latitude, request.longitude, request.radius)
        .await?;
    Ok(Json(companies))
}
