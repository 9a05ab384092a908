use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::athlete::{Athlete, AthleteRef, SessionAthlete};
use super::category::CategoryRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrainingSession {
    pub id: i64,
    pub location: String,
    pub scheduled_at: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrainingSession {
    pub location: String,
    pub scheduled_at: NaiveDateTime,
}

/// Listing row: a session and how many athletes are attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrainingSessionSummary {
    pub id: i64,
    pub location: String,
    pub scheduled_at: NaiveDateTime,
    pub athlete_count: i64,
}

/// Payload for scheduling a session.
///
/// Athletes are taken from the first selector that applies: `all_athletes`,
/// then `athletes`, then `categories`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTrainingSessionRequest {
    pub location: String,
    pub scheduled_at: NaiveDateTime,
    #[serde(default)]
    pub all_athletes: bool,
    #[serde(default)]
    pub athletes: Vec<AthleteRef>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    /// Send the scheduling message right after the session is stored
    #[serde(default)]
    pub notify_now: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTrainingSessionRequest {
    pub location: String,
    pub scheduled_at: NaiveDateTime,
    /// Replaces the attached athletes when non-empty
    #[serde(default)]
    pub athletes: Vec<AthleteRef>,
}

/// Outcome of a notification round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    pub sent: usize,
    pub failed: usize,
}

pub type TrainingSessionResponse = TrainingSessionSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSessionFullResponse {
    pub id: i64,
    pub location: String,
    pub scheduled_at: NaiveDateTime,
    pub athletes: Vec<SessionAthlete>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationReport>,
}

impl TrainingSessionFullResponse {
    pub fn new(session: &TrainingSession, athletes: &[Athlete]) -> Self {
        Self {
            id: session.id,
            location: session.location.clone(),
            scheduled_at: session.scheduled_at,
            athletes: athletes.iter().map(SessionAthlete::from).collect(),
            notifications: None,
        }
    }

    pub fn with_notifications(mut self, report: NotificationReport) -> Self {
        self.notifications = Some(report);
        self
    }
}
