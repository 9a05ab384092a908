//! Storage ports and their PostgreSQL adapters.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{
    Athlete, Category, NewAthlete, NewCategory, NewTrainingSession, TrainingSession,
    TrainingSessionSummary,
};

pub mod athlete_repository;
pub mod category_repository;
pub mod training_session_repository;

pub use athlete_repository::PgAthleteRepository;
pub use category_repository::PgCategoryRepository;
pub use training_session_repository::PgTrainingSessionRepository;

pub type RepoResult<T> = Result<T, sqlx::Error>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AthleteRepository: Send + Sync {
    async fn create(&self, athlete: &NewAthlete) -> RepoResult<Athlete>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Athlete>>;

    async fn find_all(&self) -> RepoResult<Vec<Athlete>>;

    /// Case-insensitive substring match on the name
    async fn find_by_name(&self, name: &str) -> RepoResult<Vec<Athlete>>;

    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Athlete>>;

    /// Athletes whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Athlete>>;

    async fn find_by_categories(&self, category_ids: &[i32]) -> RepoResult<Vec<Athlete>>;

    async fn find_by_training_session(&self, session_id: i64) -> RepoResult<Vec<Athlete>>;

    async fn update(&self, id: i64, athlete: &NewAthlete) -> RepoResult<Option<Athlete>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &NewCategory) -> RepoResult<Category>;

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Category>>;

    async fn find_all(&self) -> RepoResult<Vec<Category>>;

    async fn find_by_ids(&self, ids: &[i32]) -> RepoResult<Vec<Category>>;

    async fn update(&self, id: i32, category: &NewCategory) -> RepoResult<Option<Category>>;

    async fn delete(&self, id: i32) -> RepoResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingSessionRepository: Send + Sync {
    async fn find_by_scheduled_at(&self, scheduled_at: NaiveDateTime) -> RepoResult<Option<TrainingSession>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TrainingSession>>;

    /// Every session with its athlete count, earliest first
    async fn find_all(&self) -> RepoResult<Vec<TrainingSessionSummary>>;

    /// Stores the session and its athlete links atomically.
    async fn insert(&self, session: &NewTrainingSession, athlete_ids: &[i64]) -> RepoResult<TrainingSession>;

    /// Updates the session row and, when `athlete_ids` is given, replaces its
    /// athlete links in the same transaction.
    async fn update(
        &self,
        id: i64,
        session: &NewTrainingSession,
        athlete_ids: Option<Vec<i64>>,
    ) -> RepoResult<Option<TrainingSession>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
