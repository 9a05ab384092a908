use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Athlete {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized athlete fields as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAthlete {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAthleteRequest {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

/// Partial update. For the nullable columns an absent field keeps the stored
/// value and an explicit `null` clears it.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateAthleteRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub category_id: Option<Option<i32>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AthleteQuery {
    /// Case-insensitive fragment of the athlete name
    pub name: Option<String>,
    pub cpf: Option<String>,
}

/// Reference to an existing athlete inside a training session payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteResponse {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        Self {
            id: athlete.id,
            name: athlete.name,
            cpf: athlete.cpf,
            phone: athlete.phone,
            birth_date: athlete.birth_date,
            category_id: athlete.category_id,
            created_at: athlete.created_at,
            updated_at: athlete.updated_at,
        }
    }
}

/// Athlete as listed inside a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAthlete {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub category_id: Option<i32>,
}

impl From<&Athlete> for SessionAthlete {
    fn from(athlete: &Athlete) -> Self {
        Self {
            id: athlete.id,
            name: athlete.name.clone(),
            phone: athlete.phone.clone(),
            category_id: athlete.category_id,
        }
    }
}
