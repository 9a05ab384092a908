use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::{CategoryRepository, RepoResult};
use crate::models::{Category, NewCategory};

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: PgPool,
}

impl PgCategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, category: &NewCategory) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await
    }

    async fn find_by_ids(&self, ids: &[i32]) -> RepoResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = ANY($1) ORDER BY name ASC",
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await
    }

    async fn update(&self, id: i32, category: &NewCategory) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
