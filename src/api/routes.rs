use axum::{routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::athletes::athlete_routes;
use super::categories::category_routes;
use super::health::health_check;
use super::training_sessions::training_session_routes;
use crate::config::WhatsAppConfig;
use crate::repository::{
    AthleteRepository, CategoryRepository, PgAthleteRepository, PgCategoryRepository,
    PgTrainingSessionRepository, TrainingSessionRepository,
};
use crate::services::{
    AthleteService, CategoryService, MessageGateway, Notifier, TrainingSessionService,
};

#[derive(Clone)]
pub struct AppState {
    pub athlete_service: AthleteService,
    pub category_service: CategoryService,
    pub training_session_service: TrainingSessionService,
}

impl AppState {
    pub fn new(
        athletes: Arc<dyn AthleteRepository>,
        categories: Arc<dyn CategoryRepository>,
        sessions: Arc<dyn TrainingSessionRepository>,
        gateway: Arc<dyn MessageGateway>,
        whatsapp_config: &WhatsAppConfig,
    ) -> Self {
        let notifier = Notifier::new(gateway, whatsapp_config);

        Self {
            athlete_service: AthleteService::new(athletes.clone(), categories.clone()),
            category_service: CategoryService::new(categories.clone()),
            training_session_service: TrainingSessionService::new(
                sessions, athletes, categories, notifier,
            ),
        }
    }

    /// Wires every service to the PostgreSQL repositories.
    pub fn with_postgres(db: PgPool, gateway: Arc<dyn MessageGateway>, whatsapp_config: &WhatsAppConfig) -> Self {
        Self::new(
            Arc::new(PgAthleteRepository::new(db.clone())),
            Arc::new(PgCategoryRepository::new(db.clone())),
            Arc::new(PgTrainingSessionRepository::new(db)),
            gateway,
            whatsapp_config,
        )
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/athletes", athlete_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/training-sessions", training_session_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
