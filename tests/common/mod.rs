#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use handmaxx::api::routes::{create_routes, AppState};
use handmaxx::config::WhatsAppConfig;
use handmaxx::models::*;
use handmaxx::repository::{
    AthleteRepository, CategoryRepository, RepoResult, TrainingSessionRepository,
};
use handmaxx::services::MessageGateway;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct Tables {
    athletes: BTreeMap<i64, Athlete>,
    categories: BTreeMap<i32, Category>,
    sessions: BTreeMap<i64, TrainingSession>,
    links: Vec<(i64, i64)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Repository fake backing all three storage ports with in-process maps.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

#[async_trait]
impl AthleteRepository for InMemoryStore {
    async fn create(&self, athlete: &NewAthlete) -> RepoResult<Athlete> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let record = Athlete {
            id,
            name: athlete.name.clone(),
            cpf: athlete.cpf.clone(),
            phone: athlete.phone.clone(),
            birth_date: athlete.birth_date,
            category_id: athlete.category_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.athletes.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Athlete>> {
        Ok(self.tables.lock().unwrap().athletes.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Athlete>> {
        Ok(self.tables.lock().unwrap().athletes.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Vec<Athlete>> {
        let needle = name.to_lowercase();
        Ok(self
            .tables
            .lock()
            .unwrap()
            .athletes
            .values()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Athlete>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .athletes
            .values()
            .find(|a| a.cpf == cpf)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Athlete>> {
        let tables = self.tables.lock().unwrap();
        Ok(ids.iter().filter_map(|id| tables.athletes.get(id).cloned()).collect())
    }

    async fn find_by_categories(&self, category_ids: &[i32]) -> RepoResult<Vec<Athlete>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .athletes
            .values()
            .filter(|a| a.category_id.map_or(false, |c| category_ids.contains(&c)))
            .cloned()
            .collect())
    }

    async fn find_by_training_session(&self, session_id: i64) -> RepoResult<Vec<Athlete>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .filter(|(session, _)| *session == session_id)
            .filter_map(|(_, athlete)| tables.athletes.get(athlete).cloned())
            .collect())
    }

    async fn update(&self, id: i64, athlete: &NewAthlete) -> RepoResult<Option<Athlete>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.athletes.get_mut(&id).map(|record| {
            record.name = athlete.name.clone();
            record.cpf = athlete.cpf.clone();
            record.phone = athlete.phone.clone();
            record.birth_date = athlete.birth_date;
            record.category_id = athlete.category_id;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        tables.links.retain(|(_, athlete)| *athlete != id);
        Ok(tables.athletes.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, category: &NewCategory) -> RepoResult<Category> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id() as i32;
        let record = Category {
            id,
            name: category.name.clone(),
            description: category.description.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.categories.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Category>> {
        Ok(self.tables.lock().unwrap().categories.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        Ok(self.tables.lock().unwrap().categories.values().cloned().collect())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> RepoResult<Vec<Category>> {
        let tables = self.tables.lock().unwrap();
        Ok(ids.iter().filter_map(|id| tables.categories.get(id).cloned()).collect())
    }

    async fn update(&self, id: i32, category: &NewCategory) -> RepoResult<Option<Category>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.categories.get_mut(&id).map(|record| {
            record.name = category.name.clone();
            record.description = category.description.clone();
            record.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        for athlete in tables.athletes.values_mut() {
            if athlete.category_id == Some(id) {
                athlete.category_id = None;
            }
        }
        Ok(tables.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl TrainingSessionRepository for InMemoryStore {
    async fn find_by_scheduled_at(&self, scheduled_at: NaiveDateTime) -> RepoResult<Option<TrainingSession>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .sessions
            .values()
            .find(|s| s.scheduled_at == scheduled_at)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TrainingSession>> {
        Ok(self.tables.lock().unwrap().sessions.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<TrainingSessionSummary>> {
        let tables = self.tables.lock().unwrap();
        let mut summaries: Vec<TrainingSessionSummary> = tables
            .sessions
            .values()
            .map(|s| TrainingSessionSummary {
                id: s.id,
                location: s.location.clone(),
                scheduled_at: s.scheduled_at,
                athlete_count: tables.links.iter().filter(|(id, _)| *id == s.id).count() as i64,
            })
            .collect();
        summaries.sort_by_key(|s| s.scheduled_at);
        Ok(summaries)
    }

    async fn insert(&self, session: &NewTrainingSession, athlete_ids: &[i64]) -> RepoResult<TrainingSession> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let record = TrainingSession {
            id,
            location: session.location.clone(),
            scheduled_at: session.scheduled_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.sessions.insert(id, record.clone());
        tables.links.extend(athlete_ids.iter().map(|athlete| (id, *athlete)));
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        session: &NewTrainingSession,
        athlete_ids: Option<Vec<i64>>,
    ) -> RepoResult<Option<TrainingSession>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(record) = tables.sessions.get_mut(&id) else {
            return Ok(None);
        };
        record.location = session.location.clone();
        record.scheduled_at = session.scheduled_at;
        record.updated_at = Utc::now();
        let updated = record.clone();

        if let Some(athlete_ids) = athlete_ids {
            tables.links.retain(|(session_id, _)| *session_id != id);
            tables.links.extend(athlete_ids.into_iter().map(|athlete| (id, athlete)));
        }

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        tables.links.retain(|(session_id, _)| *session_id != id);
        Ok(tables.sessions.remove(&id).is_some())
    }
}

/// Gateway fake that records every message and can refuse chosen recipients.
#[derive(Default)]
pub struct RecordingGateway {
    pub messages: Mutex<Vec<WhatsAppMessage>>,
    pub reject_chat_id: Option<String>,
}

impl RecordingGateway {
    pub fn rejecting(chat_id: &str) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            reject_chat_id: Some(chat_id.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<WhatsAppMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_text(&self, message: &WhatsAppMessage) -> anyhow::Result<()> {
        if self.reject_chat_id.as_deref() == Some(message.chat_id.as_str()) {
            anyhow::bail!("recipient not on WhatsApp");
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_gateway(RecordingGateway::default())
    }

    pub fn with_gateway(gateway: RecordingGateway) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let gateway = Arc::new(gateway);
        let state = AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            gateway.clone(),
            &WhatsAppConfig::default(),
        );

        Self {
            router: create_routes(state),
            store,
            gateway,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");

        let request = match body {
            Some(body_data) => builder.body(Body::from(body_data.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
