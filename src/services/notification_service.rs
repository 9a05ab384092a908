use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};

use super::whatsapp_client::MessageGateway;
use crate::config::WhatsAppConfig;
use crate::models::{Athlete, NotificationReport, TrainingSession, WhatsAppMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Created,
    Rescheduled,
    Cancelled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Created => "created",
            NotificationKind::Rescheduled => "rescheduled",
            NotificationKind::Cancelled => "cancelled",
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Drops the leading mobile `9` that follows the two-digit area code.
///
/// The gateway addresses Brazilian mobiles by their legacy 8-digit number, so
/// `63999998888` becomes `6399998888`. Numbers of 10 characters or fewer, and
/// numbers whose third character is not `9`, are returned unchanged.
pub fn normalize_phone(phone: &str) -> String {
    if phone.chars().count() <= 10 {
        return phone.to_string();
    }

    match phone.char_indices().nth(2) {
        Some((index, '9')) => {
            let mut normalized = String::with_capacity(phone.len() - 1);
            normalized.push_str(&phone[..index]);
            normalized.push_str(&phone[index + 1..]);
            normalized
        }
        _ => phone.to_string(),
    }
}

pub fn compose_message(kind: NotificationKind, athlete_name: &str, session: &TrainingSession) -> String {
    let date = format_date(session.scheduled_at.date());
    let time = format_time(session.scheduled_at.time());

    match kind {
        NotificationKind::Created => format!(
            "Olá, atleta {}!\n\nFoi agendado um treino na sua escolinha Handmaxx!\n\nSerá em {}, às {}.\nO local será no(a) {}.\n\n*Aguardamos você!*",
            athlete_name, date, time, session.location
        ),
        NotificationKind::Rescheduled => format!(
            "Olá, atleta {}!\n\nSeu treino foi remarcado!\nAgora, será em {}, às {}.\nO local será no(a) {}\n\n*Aguardamos você!*",
            athlete_name, date, time, session.location
        ),
        NotificationKind::Cancelled => format!(
            "Olá, atleta {}!\nEstamos cancelando seu treino que estava agendado para {}, às {}.\n\n*Pedimos desculpas e contamos com a colaboração de todos.*",
            athlete_name, date, time
        ),
    }
}

/// Sends training session messages to every attached athlete.
#[derive(Clone)]
pub struct Notifier {
    gateway: Arc<dyn MessageGateway>,
    country_code: String,
    session_name: String,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn MessageGateway>, config: &WhatsAppConfig) -> Self {
        Self {
            gateway,
            country_code: config.country_code.clone(),
            session_name: config.session.clone(),
        }
    }

    pub fn chat_id(&self, phone: &str) -> String {
        format!("{}{}@c.us", self.country_code, normalize_phone(phone))
    }

    pub fn build_message(&self, kind: NotificationKind, athlete: &Athlete, session: &TrainingSession) -> WhatsAppMessage {
        WhatsAppMessage::new(
            self.chat_id(&athlete.phone),
            compose_message(kind, &athlete.name, session),
            self.session_name.clone(),
        )
    }

    /// One message per athlete, in order. Failed deliveries are logged and
    /// counted without interrupting the round.
    pub async fn notify_all(
        &self,
        kind: NotificationKind,
        session: &TrainingSession,
        athletes: &[Athlete],
    ) -> NotificationReport {
        let mut report = NotificationReport::default();

        for athlete in athletes {
            let message = self.build_message(kind, athlete, session);

            match self.gateway.send_text(&message).await {
                Ok(()) => {
                    report.sent += 1;
                    info!(
                        kind = kind.as_str(),
                        athlete_id = athlete.id,
                        recipient = %normalize_phone(&athlete.phone),
                        "notification sent"
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        kind = kind.as_str(),
                        athlete_id = athlete.id,
                        error = %err,
                        "notification failed"
                    );
                }
            }
        }

        report
    }
}
