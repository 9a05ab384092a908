use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;

use super::routes::AppState;
use crate::error::AppError;
use crate::models::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    Ok(Json(state.category_service.find_all().await?))
}

async fn create_category(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateCategoryRequest>, AppError>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let category = state.category_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(state): State<AppState>,
    WithRejection(Path(category_id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<CategoryResponse>, AppError> {
    Ok(Json(state.category_service.find_by_id(category_id).await?))
}

async fn update_category(
    State(state): State<AppState>,
    WithRejection(Path(category_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateCategoryRequest>, AppError>,
) -> Result<Json<CategoryResponse>, AppError> {
    Ok(Json(state.category_service.update(category_id, request).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    WithRejection(Path(category_id), _): WithRejection<Path<i32>, AppError>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
