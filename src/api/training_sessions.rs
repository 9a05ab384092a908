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
use crate::models::{
    CreateTrainingSessionRequest, SessionAthlete, TrainingSessionFullResponse,
    TrainingSessionResponse, UpdateTrainingSessionRequest,
};

pub fn training_session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/:session_id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/:session_id/athletes", get(get_session_athletes))
}

async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<TrainingSessionResponse>>, AppError> {
    Ok(Json(state.training_session_service.find_all().await?))
}

/// POST /api/training-sessions
///
/// Schedules a session, optionally notifying the selected athletes right away.
async fn create_session(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateTrainingSessionRequest>, AppError>,
) -> Result<(StatusCode, Json<TrainingSessionFullResponse>), AppError> {
    let session = state.training_session_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_session(
    State(state): State<AppState>,
    WithRejection(Path(session_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<TrainingSessionFullResponse>, AppError> {
    Ok(Json(state.training_session_service.find_by_id(session_id).await?))
}

async fn get_session_athletes(
    State(state): State<AppState>,
    WithRejection(Path(session_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Vec<SessionAthlete>>, AppError> {
    Ok(Json(state.training_session_service.find_athletes(session_id).await?))
}

async fn update_session(
    State(state): State<AppState>,
    WithRejection(Path(session_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateTrainingSessionRequest>, AppError>,
) -> Result<Json<TrainingSessionFullResponse>, AppError> {
    Ok(Json(state.training_session_service.update(session_id, request).await?))
}

async fn delete_session(
    State(state): State<AppState>,
    WithRejection(Path(session_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state.training_session_service.delete(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
