use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;

use super::routes::AppState;
use crate::error::AppError;
use crate::models::{AthleteQuery, AthleteResponse, CreateAthleteRequest, UpdateAthleteRequest};

pub fn athlete_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_athletes).post(create_athlete))
        .route("/cpf/:cpf", get(get_athlete_by_cpf))
        .route(
            "/:athlete_id",
            get(get_athlete).put(update_athlete).delete(delete_athlete),
        )
}

/// GET /api/athletes?name=&cpf=
async fn list_athletes(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<AthleteQuery>, AppError>,
) -> Result<Json<Vec<AthleteResponse>>, AppError> {
    let athletes = state.athlete_service.search(query).await?;
    Ok(Json(athletes))
}

async fn create_athlete(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateAthleteRequest>, AppError>,
) -> Result<(StatusCode, Json<AthleteResponse>), AppError> {
    let athlete = state.athlete_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(athlete)))
}

async fn get_athlete(
    State(state): State<AppState>,
    WithRejection(Path(athlete_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<AthleteResponse>, AppError> {
    Ok(Json(state.athlete_service.find_by_id(athlete_id).await?))
}

async fn get_athlete_by_cpf(
    State(state): State<AppState>,
    WithRejection(Path(cpf), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<AthleteResponse>, AppError> {
    Ok(Json(state.athlete_service.find_by_cpf(&cpf).await?))
}

async fn update_athlete(
    State(state): State<AppState>,
    WithRejection(Path(athlete_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateAthleteRequest>, AppError>,
) -> Result<Json<AthleteResponse>, AppError> {
    Ok(Json(state.athlete_service.update(athlete_id, request).await?))
}

async fn delete_athlete(
    State(state): State<AppState>,
    WithRejection(Path(athlete_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state.athlete_service.delete(athlete_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
