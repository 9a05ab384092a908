use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use super::notification_service::{NotificationKind, Notifier};
use crate::error::{is_unique_violation, AppError};
use crate::models::{
    validate_location, Athlete, AthleteRef, CategoryRef, CreateTrainingSessionRequest,
    NewTrainingSession, SessionAthlete, TrainingSession, TrainingSessionFullResponse,
    TrainingSessionResponse, UpdateTrainingSessionRequest,
};
use crate::repository::{AthleteRepository, CategoryRepository, TrainingSessionRepository};

const SLOT_TAKEN: &str = "Já há treino cadastrado na mesma data e mesmo horário.";

/// Schedules training sessions and keeps the attached athletes informed.
#[derive(Clone)]
pub struct TrainingSessionService {
    sessions: Arc<dyn TrainingSessionRepository>,
    athletes: Arc<dyn AthleteRepository>,
    categories: Arc<dyn CategoryRepository>,
    notifier: Notifier,
}

impl TrainingSessionService {
    pub fn new(
        sessions: Arc<dyn TrainingSessionRepository>,
        athletes: Arc<dyn AthleteRepository>,
        categories: Arc<dyn CategoryRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            sessions,
            athletes,
            categories,
            notifier,
        }
    }

    #[instrument(skip(self, request), fields(scheduled_at = %request.scheduled_at))]
    pub async fn create(&self, request: CreateTrainingSessionRequest) -> Result<TrainingSessionFullResponse, AppError> {
        if self
            .sessions
            .find_by_scheduled_at(request.scheduled_at)
            .await?
            .is_some()
        {
            return Err(AppError::forbidden("Erro ao criar treino", SLOT_TAKEN));
        }

        validate_location(&request.location)
            .map_err(|err| AppError::validation("Erro ao criar treino", err.to_string()))?;

        let athletes = if request.all_athletes {
            self.athletes.find_all().await?
        } else if !request.athletes.is_empty() {
            self.resolve_athlete_refs(&request.athletes).await?
        } else if !request.categories.is_empty() {
            self.resolve_category_refs(&request.categories).await?
        } else {
            return Err(AppError::bad_request(
                "Nenhum atleta selecionado.",
                "Informe atletas, categorias ou selecione todos os atletas.",
            ));
        };

        let new_session = NewTrainingSession {
            location: request.location.trim().to_string(),
            scheduled_at: request.scheduled_at,
        };
        let athlete_ids: Vec<i64> = athletes.iter().map(|a| a.id).collect();

        let session = self
            .sessions
            .insert(&new_session, &athlete_ids)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao criar treino"))?;

        info!(
            session_id = session.id,
            athletes = athletes.len(),
            "training session created"
        );

        let response = TrainingSessionFullResponse::new(&session, &athletes);
        if request.notify_now {
            let report = self
                .notifier
                .notify_all(NotificationKind::Created, &session, &athletes)
                .await;
            return Ok(response.with_notifications(report));
        }

        Ok(response)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<TrainingSessionFullResponse, AppError> {
        let session = self.get(id, "Erro ao procurar treino.").await?;
        let athletes = self.athletes.find_by_training_session(id).await?;

        Ok(TrainingSessionFullResponse::new(&session, &athletes))
    }

    pub async fn find_all(&self) -> Result<Vec<TrainingSessionResponse>, AppError> {
        Ok(self.sessions.find_all().await?)
    }

    pub async fn find_athletes(&self, id: i64) -> Result<Vec<SessionAthlete>, AppError> {
        self.get(id, "Erro ao procurar treino.").await?;
        let athletes = self.athletes.find_by_training_session(id).await?;

        Ok(athletes.iter().map(SessionAthlete::from).collect())
    }

    /// Moves a session and tells every attached athlete about the new slot.
    #[instrument(skip(self, request), fields(scheduled_at = %request.scheduled_at))]
    pub async fn update(
        &self,
        id: i64,
        request: UpdateTrainingSessionRequest,
    ) -> Result<TrainingSessionFullResponse, AppError> {
        let current = self.get(id, "Erro ao atualizar treino.").await?;

        validate_location(&request.location)
            .map_err(|err| AppError::validation("Erro ao atualizar treino.", err.to_string()))?;

        if current.scheduled_at != request.scheduled_at {
            if let Some(other) = self.sessions.find_by_scheduled_at(request.scheduled_at).await? {
                if other.id != id {
                    return Err(AppError::forbidden("Erro ao atualizar treino.", SLOT_TAKEN));
                }
            }
        }

        let replacement = if request.athletes.is_empty() {
            None
        } else {
            Some(self.resolve_athlete_refs(&request.athletes).await?)
        };

        let new_session = NewTrainingSession {
            location: request.location.trim().to_string(),
            scheduled_at: request.scheduled_at,
        };
        let athlete_ids = replacement
            .as_ref()
            .map(|athletes| athletes.iter().map(|a| a.id).collect());

        let session = self
            .sessions
            .update(id, &new_session, athlete_ids)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao atualizar treino."))?
            .ok_or_else(|| Self::not_found("Erro ao atualizar treino."))?;

        let athletes = match replacement {
            Some(athletes) => athletes,
            None => self.athletes.find_by_training_session(id).await?,
        };

        let report = self
            .notifier
            .notify_all(NotificationKind::Rescheduled, &session, &athletes)
            .await;
        info!(session_id = id, sent = report.sent, failed = report.failed, "training session updated");

        Ok(TrainingSessionFullResponse::new(&session, &athletes).with_notifications(report))
    }

    /// Cancels a session. Athletes are told before the session row goes away,
    /// while its links are still in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let session = self.get(id, "Erro ao cancelar treino.").await?;
        let athletes = self.athletes.find_by_training_session(id).await?;

        let report = self
            .notifier
            .notify_all(NotificationKind::Cancelled, &session, &athletes)
            .await;

        if !self.sessions.delete(id).await? {
            return Err(Self::not_found("Erro ao cancelar treino."));
        }
        info!(session_id = id, sent = report.sent, failed = report.failed, "training session cancelled");

        Ok(())
    }

    async fn get(&self, id: i64, title: &str) -> Result<TrainingSession, AppError> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(title))
    }

    /// Every referenced id must exist; the error lists the ones that do not.
    async fn resolve_athlete_refs(&self, refs: &[AthleteRef]) -> Result<Vec<Athlete>, AppError> {
        let mut seen = HashSet::new();
        let ids: Vec<i64> = refs
            .iter()
            .map(|r| r.id)
            .filter(|id| seen.insert(*id))
            .collect();

        let found = self.athletes.find_by_ids(&ids).await?;
        let found_ids: HashSet<i64> = found.iter().map(|a| a.id).collect();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found_ids.contains(id))
            .map(|id| id.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::not_found(
                format!("Atletas não encontrados para os ID's: {}", missing.join(", ")),
                "Verifique os atletas selecionados para o treino.",
            ));
        }

        Ok(found)
    }

    /// Athletes of the referenced categories. Unknown categories contribute nobody.
    async fn resolve_category_refs(&self, refs: &[CategoryRef]) -> Result<Vec<Athlete>, AppError> {
        let ids: Vec<i32> = refs.iter().map(|r| r.id).collect();
        let categories = self.categories.find_by_ids(&ids).await?;
        let category_ids: Vec<i32> = categories.iter().map(|c| c.id).collect();

        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.athletes.find_by_categories(&category_ids).await?)
    }

    fn not_found(title: &str) -> AppError {
        AppError::not_found(title, "Treino não encontrado.")
    }

    fn map_write_error(err: sqlx::Error, title: &str) -> AppError {
        if is_unique_violation(&err) {
            AppError::forbidden(title, SLOT_TAKEN)
        } else {
            AppError::Database(err)
        }
    }
}
