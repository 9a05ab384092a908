use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{is_unique_violation, AppError};
use crate::models::{
    validate_text, Category, CategoryResponse, CreateCategoryRequest, NewCategory,
    UpdateCategoryRequest,
};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCategoryRequest) -> Result<CategoryResponse, AppError> {
        let new_category = Self::normalize(request.name, request.description)?;

        let category = self
            .categories
            .create(&new_category)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao criar categoria."))?;

        info!(category_id = category.id, "category created");
        Ok(category.into())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<CategoryResponse, AppError> {
        self.get(id).await.map(CategoryResponse::from)
    }

    pub async fn find_all(&self) -> Result<Vec<CategoryResponse>, AppError> {
        let categories = self.categories.find_all().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdateCategoryRequest) -> Result<CategoryResponse, AppError> {
        let current = self.get(id).await?;

        let new_category = Self::normalize(
            request.name.unwrap_or(current.name),
            request.description.or(current.description),
        )?;

        let category = self
            .categories
            .update(id, &new_category)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao atualizar categoria."))?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(category.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.categories.delete(id).await? {
            return Err(Self::not_found(id));
        }

        info!(category_id = id, "category deleted");
        Ok(())
    }

    async fn get(&self, id: i32) -> Result<Category, AppError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    fn normalize(name: String, description: Option<String>) -> Result<NewCategory, AppError> {
        validate_text("Name", &name, 100)
            .map_err(|err| AppError::validation("Categoria inválida.", err.to_string()))?;

        Ok(NewCategory {
            name: name.trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }

    fn not_found(id: i32) -> AppError {
        AppError::not_found(
            "Categoria não encontrada.",
            format!("Nenhuma categoria com id {}.", id),
        )
    }

    fn map_write_error(err: sqlx::Error, title: &str) -> AppError {
        if is_unique_violation(&err) {
            AppError::conflict(title, "Já existe uma categoria com esse nome.")
        } else {
            AppError::Database(err)
        }
    }
}
