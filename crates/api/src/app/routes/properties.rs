use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use arep_properties::PropertyId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_property).get(list_properties))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

fn parse_id(id: &str) -> Result<PropertyId, axum::response::Response> {
    id.parse::<PropertyId>()
        .map_err(errors::domain_error_to_response)
}

pub async fn create_property(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::PropertyPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let fields = match body.into_draft().validate() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.properties.create(fields).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(dto::PropertyResponse::from(created)),
        )
            .into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn list_properties(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::ListPropertiesParams>, QueryRejection>,
) -> axum::response::Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let (filter, page) = match params.into_query() {
        Ok(q) => q,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.properties.list(&filter, &page).await {
        Ok(page) => (
            StatusCode::OK,
            Json(dto::PageResponse::<dto::PropertyResponse>::from_page(page)),
        )
            .into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_property(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.properties.get(id).await {
        Ok(Some(property)) => {
            (StatusCode::OK, Json(dto::PropertyResponse::from(property))).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_property(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::PropertyPayload>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let fields = match body.into_draft().validate() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.properties.update(id, fields).await {
        Ok(Some(updated)) => {
            (StatusCode::OK, Json(dto::PropertyResponse::from(updated))).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

/// Always 204 once storage answers, whether or not the record existed.
pub async fn delete_property(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.properties.delete(id).await {
        Ok(_existed) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
