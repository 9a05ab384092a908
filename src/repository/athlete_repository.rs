use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::{AthleteRepository, RepoResult};
use crate::models::{Athlete, NewAthlete};

const ATHLETE_COLUMNS: &str =
    "id, name, cpf, phone, birth_date, category_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgAthleteRepository {
    db: PgPool,
}

impl PgAthleteRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AthleteRepository for PgAthleteRepository {
    async fn create(&self, athlete: &NewAthlete) -> RepoResult<Athlete> {
        let query = format!(
            r#"
            INSERT INTO athletes (name, cpf, phone, birth_date, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {}
            "#,
            ATHLETE_COLUMNS
        );

        sqlx::query_as::<_, Athlete>(&query)
            .bind(&athlete.name)
            .bind(&athlete.cpf)
            .bind(&athlete.phone)
            .bind(athlete.birth_date)
            .bind(athlete.category_id)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Athlete>> {
        let query = format!("SELECT {} FROM athletes WHERE id = $1", ATHLETE_COLUMNS);

        sqlx::query_as::<_, Athlete>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    async fn find_all(&self) -> RepoResult<Vec<Athlete>> {
        let query = format!("SELECT {} FROM athletes ORDER BY name ASC", ATHLETE_COLUMNS);

        sqlx::query_as::<_, Athlete>(&query).fetch_all(&self.db).await
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Vec<Athlete>> {
        let query = format!(
            "SELECT {} FROM athletes WHERE name ILIKE $1 ORDER BY name ASC",
            ATHLETE_COLUMNS
        );

        sqlx::query_as::<_, Athlete>(&query)
            .bind(contains_pattern(name))
            .fetch_all(&self.db)
            .await
    }

    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Athlete>> {
        let query = format!("SELECT {} FROM athletes WHERE cpf = $1", ATHLETE_COLUMNS);

        sqlx::query_as::<_, Athlete>(&query)
            .bind(cpf)
            .fetch_optional(&self.db)
            .await
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Athlete>> {
        let query = format!(
            "SELECT {} FROM athletes WHERE id = ANY($1) ORDER BY name ASC",
            ATHLETE_COLUMNS
        );

        sqlx::query_as::<_, Athlete>(&query)
            .bind(ids)
            .fetch_all(&self.db)
            .await
    }

    async fn find_by_categories(&self, category_ids: &[i32]) -> RepoResult<Vec<Athlete>> {
        let query = format!(
            "SELECT {} FROM athletes WHERE category_id = ANY($1) ORDER BY name ASC",
            ATHLETE_COLUMNS
        );

        sqlx::query_as::<_, Athlete>(&query)
            .bind(category_ids)
            .fetch_all(&self.db)
            .await
    }

    async fn find_by_training_session(&self, session_id: i64) -> RepoResult<Vec<Athlete>> {
        sqlx::query_as::<_, Athlete>(
            r#"
            SELECT a.id, a.name, a.cpf, a.phone, a.birth_date, a.category_id, a.created_at, a.updated_at
            FROM athletes a
            JOIN training_session_athletes tsa ON tsa.athlete_id = a.id
            WHERE tsa.training_session_id = $1
            ORDER BY a.name ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.db)
        .await
    }

    async fn update(&self, id: i64, athlete: &NewAthlete) -> RepoResult<Option<Athlete>> {
        let query = format!(
            r#"
            UPDATE athletes
            SET name = $2, cpf = $3, phone = $4, birth_date = $5, category_id = $6, updated_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            ATHLETE_COLUMNS
        );

        sqlx::query_as::<_, Athlete>(&query)
            .bind(id)
            .bind(&athlete.name)
            .bind(&athlete.cpf)
            .bind(&athlete.phone)
            .bind(athlete.birth_date)
            .bind(athlete.category_id)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// ILIKE pattern matching `fragment` anywhere, with LIKE metacharacters taken literally.
fn contains_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
