use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{RepoResult, TrainingSessionRepository};
use crate::models::{NewTrainingSession, TrainingSession, TrainingSessionSummary};

#[derive(Clone)]
pub struct PgTrainingSessionRepository {
    db: PgPool,
}

impl PgTrainingSessionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn link_athletes(
        tx: &mut Transaction<'_, Postgres>,
        session_id: i64,
        athlete_ids: &[i64],
    ) -> RepoResult<()> {
        if athlete_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO training_session_athletes (training_session_id, athlete_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(athlete_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TrainingSessionRepository for PgTrainingSessionRepository {
    async fn find_by_scheduled_at(&self, scheduled_at: NaiveDateTime) -> RepoResult<Option<TrainingSession>> {
        sqlx::query_as::<_, TrainingSession>(
            "SELECT id, location, scheduled_at, created_at, updated_at FROM training_sessions WHERE scheduled_at = $1",
        )
        .bind(scheduled_at)
        .fetch_optional(&self.db)
        .await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TrainingSession>> {
        sqlx::query_as::<_, TrainingSession>(
            "SELECT id, location, scheduled_at, created_at, updated_at FROM training_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    async fn find_all(&self) -> RepoResult<Vec<TrainingSessionSummary>> {
        sqlx::query_as::<_, TrainingSessionSummary>(
            r#"
            SELECT t.id, t.location, t.scheduled_at, COUNT(tsa.athlete_id) AS athlete_count
            FROM training_sessions t
            LEFT JOIN training_session_athletes tsa ON tsa.training_session_id = t.id
            GROUP BY t.id, t.location, t.scheduled_at
            ORDER BY t.scheduled_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    async fn insert(&self, session: &NewTrainingSession, athlete_ids: &[i64]) -> RepoResult<TrainingSession> {
        let mut tx = self.db.begin().await?;

        let created = sqlx::query_as::<_, TrainingSession>(
            r#"
            INSERT INTO training_sessions (location, scheduled_at, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, location, scheduled_at, created_at, updated_at
            "#,
        )
        .bind(&session.location)
        .bind(session.scheduled_at)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        Self::link_athletes(&mut tx, created.id, athlete_ids).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: i64,
        session: &NewTrainingSession,
        athlete_ids: Option<Vec<i64>>,
    ) -> RepoResult<Option<TrainingSession>> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_as::<_, TrainingSession>(
            r#"
            UPDATE training_sessions
            SET location = $2, scheduled_at = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, location, scheduled_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&session.location)
        .bind(session.scheduled_at)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        if let Some(athlete_ids) = athlete_ids {
            sqlx::query("DELETE FROM training_session_athletes WHERE training_session_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_athletes(&mut tx, id, &athlete_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
