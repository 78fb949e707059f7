use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::tax_rates::models::{DeleteParams, ListTaxRatesQuery, UpsertTaxRateRequest};
use crate::modules::tax_rates::services::TaxRateService;

/// List tax rates with filtering, sorting, and pagination
/// GET /taxes
///
/// Totals are reported via the X-Total and X-Total-Pages headers.
pub async fn list_tax_rates(
    service: web::Data<Arc<TaxRateService>>,
    query: web::Query<ListTaxRatesQuery>,
) -> Result<HttpResponse, AppError> {
    let listing = service.list(query.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("X-Total", listing.total.to_string()))
        .insert_header(("X-Total-Pages", listing.total_pages.to_string()))
        .json(listing.items))
}

/// Create a new tax rate
/// POST /taxes
pub async fn create_tax_rate(
    service: web::Data<Arc<TaxRateService>>,
    request: web::Json<UpsertTaxRateRequest>,
) -> Result<HttpResponse, AppError> {
    let rate = service.create(request.into_inner()).await?;
    let location = rate.links.self_.href.clone();

    Ok(HttpResponse::Created()
        .insert_header(("Location", location))
        .json(rate))
}

/// Get a tax rate by ID
/// GET /taxes/{id}
pub async fn get_tax_rate(
    service: web::Data<Arc<TaxRateService>>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let rate = service.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(rate))
}

/// Partially update a tax rate
/// PUT/PATCH /taxes/{id}
pub async fn update_tax_rate(
    service: web::Data<Arc<TaxRateService>>,
    path: web::Path<u64>,
    request: web::Json<UpsertTaxRateRequest>,
) -> Result<HttpResponse, AppError> {
    let rate = service.update(path.into_inner(), request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(rate))
}

/// Delete a tax rate; requires force=true
/// DELETE /taxes/{id}
pub async fn delete_tax_rate(
    service: web::Data<Arc<TaxRateService>>,
    path: web::Path<u64>,
    params: web::Query<DeleteParams>,
) -> Result<HttpResponse, AppError> {
    let rate = service.delete(path.into_inner(), params.force).await?;

    Ok(HttpResponse::Ok().json(rate))
}

/// Resource schema and collection parameter descriptor
/// GET /taxes/schema
pub async fn get_schema(
    service: web::Data<Arc<TaxRateService>>,
) -> Result<HttpResponse, AppError> {
    let descriptor = service.describe_schema().await?;

    Ok(HttpResponse::Ok().json(descriptor))
}

/// Configure tax rate routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/taxes")
            .route("", web::get().to(list_tax_rates))
            .route("", web::post().to(create_tax_rate))
            .route("/schema", web::get().to(get_schema))
            .route("/{id}", web::get().to(get_tax_rate))
            .route("/{id}", web::put().to(update_tax_rate))
            .route("/{id}", web::patch().to(update_tax_rate))
            .route("/{id}", web::delete().to(delete_tax_rate)),
    );
}
