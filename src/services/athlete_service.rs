use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{is_unique_violation, AppError};
use crate::models::{
    digits_only, validate_cpf, validate_name, validate_phone, Athlete, AthleteQuery,
    AthleteResponse, CreateAthleteRequest, NewAthlete, UpdateAthleteRequest,
};
use crate::repository::{AthleteRepository, CategoryRepository};

#[derive(Clone)]
pub struct AthleteService {
    athletes: Arc<dyn AthleteRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl AthleteService {
    pub fn new(athletes: Arc<dyn AthleteRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { athletes, categories }
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateAthleteRequest) -> Result<AthleteResponse, AppError> {
        let new_athlete = Self::normalize(
            request.name,
            request.cpf,
            request.phone,
            request.birth_date,
            request.category_id,
        )?;
        self.ensure_category_exists(new_athlete.category_id).await?;

        if self.athletes.find_by_cpf(&new_athlete.cpf).await?.is_some() {
            return Err(Self::duplicate_cpf("Erro ao cadastrar atleta."));
        }

        let athlete = self
            .athletes
            .create(&new_athlete)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao cadastrar atleta."))?;

        info!(athlete_id = athlete.id, "athlete created");
        Ok(athlete.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<AthleteResponse, AppError> {
        self.get(id).await.map(AthleteResponse::from)
    }

    /// Lists athletes, narrowed by cpf or name when the query carries one.
    pub async fn search(&self, query: AthleteQuery) -> Result<Vec<AthleteResponse>, AppError> {
        let athletes = match (query.cpf, query.name) {
            (Some(cpf), _) => self
                .athletes
                .find_by_cpf(&digits_only(&cpf))
                .await?
                .into_iter()
                .collect(),
            (None, Some(name)) if !name.trim().is_empty() => {
                self.athletes.find_by_name(name.trim()).await?
            }
            _ => self.athletes.find_all().await?,
        };

        Ok(athletes.into_iter().map(AthleteResponse::from).collect())
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<AthleteResponse, AppError> {
        self.athletes
            .find_by_cpf(&digits_only(cpf))
            .await?
            .map(AthleteResponse::from)
            .ok_or_else(|| {
                AppError::not_found("Atleta não encontrado.", "Nenhum atleta com esse CPF.")
            })
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: UpdateAthleteRequest) -> Result<AthleteResponse, AppError> {
        let current = self.get(id).await?;

        let new_athlete = Self::normalize(
            request.name.unwrap_or(current.name),
            request.cpf.unwrap_or(current.cpf),
            request.phone.unwrap_or(current.phone),
            request.birth_date.unwrap_or(current.birth_date),
            request.category_id.unwrap_or(current.category_id),
        )?;
        self.ensure_category_exists(new_athlete.category_id).await?;

        if let Some(other) = self.athletes.find_by_cpf(&new_athlete.cpf).await? {
            if other.id != id {
                return Err(Self::duplicate_cpf("Erro ao atualizar atleta."));
            }
        }

        let athlete = self
            .athletes
            .update(id, &new_athlete)
            .await
            .map_err(|err| Self::map_write_error(err, "Erro ao atualizar atleta."))?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(athlete.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.athletes.delete(id).await? {
            return Err(Self::not_found(id));
        }

        info!(athlete_id = id, "athlete deleted");
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Athlete, AppError> {
        self.athletes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn ensure_category_exists(&self, category_id: Option<i32>) -> Result<(), AppError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };

        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::not_found(
                "Categoria não encontrada.",
                format!("Nenhuma categoria com id {}.", category_id),
            ));
        }

        Ok(())
    }

    fn normalize(
        name: String,
        cpf: String,
        phone: String,
        birth_date: Option<chrono::NaiveDate>,
        category_id: Option<i32>,
    ) -> Result<NewAthlete, AppError> {
        let invalid = |err: anyhow::Error| AppError::validation("Atleta inválido.", err.to_string());

        validate_name(&name).map_err(invalid)?;
        validate_cpf(&cpf).map_err(invalid)?;
        validate_phone(&phone).map_err(invalid)?;

        Ok(NewAthlete {
            name: name.trim().to_string(),
            cpf: digits_only(&cpf),
            phone: digits_only(&phone),
            birth_date,
            category_id,
        })
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Atleta não encontrado.", format!("Nenhum atleta com id {}.", id))
    }

    fn duplicate_cpf(title: &str) -> AppError {
        AppError::conflict(title, "Já existe um atleta cadastrado com esse CPF.")
    }

    fn map_write_error(err: sqlx::Error, title: &str) -> AppError {
        if is_unique_violation(&err) {
            Self::duplicate_cpf(title)
        } else {
            AppError::Database(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::repository::{MockAthleteRepository, MockCategoryRepository};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn athlete(id: i64, new: &NewAthlete) -> Athlete {
        Athlete {
            id,
            name: new.name.clone(),
            cpf: new.cpf.clone(),
            phone: new.phone.clone(),
            birth_date: new.birth_date,
            category_id: new.category_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored(id: i64, cpf: &str) -> Athlete {
        Athlete {
            id,
            name: "Ana Souza".to_string(),
            cpf: cpf.to_string(),
            phone: "63999998888".to_string(),
            birth_date: None,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(category_id: Option<i32>) -> CreateAthleteRequest {
        CreateAthleteRequest {
            name: " Ana Souza ".to_string(),
            cpf: "529.982.247-25".to_string(),
            phone: "(63) 99999-8888".to_string(),
            birth_date: None,
            category_id,
        }
    }

    #[tokio::test]
    async fn create_normalizes_cpf_phone_and_name() {
        let mut athletes = MockAthleteRepository::new();
        athletes.expect_find_by_cpf().returning(|_| Ok(None));
        athletes
            .expect_create()
            .withf(|new| new.name == "Ana Souza" && new.cpf == "52998224725" && new.phone == "63999998888")
            .times(1)
            .returning(|new| Ok(athlete(10, new)));

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));
        let response = service.create(request(None)).await.unwrap();

        assert_eq!(response.id, 10);
        assert_eq!(response.cpf, "52998224725");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_cpf() {
        let mut athletes = MockAthleteRepository::new();
        athletes
            .expect_find_by_cpf()
            .returning(|cpf| Ok(Some(stored(1, cpf))));
        athletes.expect_create().never();

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));

        assert_matches!(service.create(request(None)).await, Err(AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn create_rejects_unknown_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));

        let service = AthleteService::new(Arc::new(MockAthleteRepository::new()), Arc::new(categories));

        assert_matches!(service.create(request(Some(4))).await, Err(AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_accepts_existing_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|id| {
            Ok(Some(Category {
                id,
                name: "Sub-14".to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        let mut athletes = MockAthleteRepository::new();
        athletes.expect_find_by_cpf().returning(|_| Ok(None));
        athletes.expect_create().returning(|new| Ok(athlete(2, new)));

        let service = AthleteService::new(Arc::new(athletes), Arc::new(categories));
        let response = service.create(request(Some(4))).await.unwrap();

        assert_eq!(response.category_id, Some(4));
    }

    #[tokio::test]
    async fn create_rejects_invalid_cpf() {
        let service = AthleteService::new(
            Arc::new(MockAthleteRepository::new()),
            Arc::new(MockCategoryRepository::new()),
        );
        let mut bad = request(None);
        bad.cpf = "123.456.789-00".to_string();

        assert_matches!(service.create(bad).await, Err(AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn update_allows_keeping_own_cpf() {
        let mut athletes = MockAthleteRepository::new();
        athletes
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "52998224725"))));
        athletes
            .expect_find_by_cpf()
            .returning(|cpf| Ok(Some(stored(5, cpf))));
        athletes
            .expect_update()
            .withf(|id, new| *id == 5 && new.phone == "63988887777")
            .returning(|id, new| Ok(Some(athlete(id, new))));

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));
        let response = service
            .update(
                5,
                UpdateAthleteRequest {
                    phone: Some("63988887777".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(response.phone, "63988887777");
    }

    #[tokio::test]
    async fn update_with_nulls_clears_birth_date_and_category() {
        let mut athletes = MockAthleteRepository::new();
        athletes.expect_find_by_id().returning(|id| {
            let mut current = stored(id, "52998224725");
            current.birth_date = chrono::NaiveDate::from_ymd_opt(2010, 5, 2);
            current.category_id = Some(4);
            Ok(Some(current))
        });
        athletes
            .expect_find_by_cpf()
            .returning(|cpf| Ok(Some(stored(5, cpf))));
        athletes
            .expect_update()
            .withf(|_, new| new.birth_date.is_none() && new.category_id.is_none())
            .times(1)
            .returning(|id, new| Ok(Some(athlete(id, new))));
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().never();

        let service = AthleteService::new(Arc::new(athletes), Arc::new(categories));
        let response = service
            .update(
                5,
                UpdateAthleteRequest {
                    birth_date: Some(None),
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(response.birth_date, None);
        assert_eq!(response.category_id, None);
    }

    #[tokio::test]
    async fn create_maps_cpf_unique_violation_to_conflict() {
        let mut athletes = MockAthleteRepository::new();
        athletes.expect_find_by_cpf().returning(|_| Ok(None));
        athletes
            .expect_create()
            .returning(|_| Err(crate::error::unique_violation("athletes_cpf_key")));

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));

        assert_matches!(
            service.create(request(None)).await,
            Err(AppError::Conflict { title, detail })
                if title == "Erro ao cadastrar atleta." && detail == "Já existe um atleta cadastrado com esse CPF."
        );
    }

    #[tokio::test]
    async fn search_prefers_cpf_over_name() {
        let mut athletes = MockAthleteRepository::new();
        athletes
            .expect_find_by_cpf()
            .withf(|cpf| cpf == "52998224725")
            .returning(|cpf| Ok(Some(stored(1, cpf))));
        athletes.expect_find_by_name().never();

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));
        let found = service
            .search(AthleteQuery {
                name: Some("Ana".to_string()),
                cpf: Some("529.982.247-25".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn search_by_name_trims_input() {
        let mut athletes = MockAthleteRepository::new();
        athletes
            .expect_find_by_name()
            .withf(|name| name == "ana")
            .returning(|_| Ok(vec![stored(1, "52998224725"), stored(2, "11144477735")]));

        let service = AthleteService::new(Arc::new(athletes), Arc::new(MockCategoryRepository::new()));
        let found = service
            .search(AthleteQuery {
                name: Some("  ana ".to_string()),
                cpf: None,
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
    }
}
