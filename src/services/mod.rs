// Business logic services

pub mod athlete_service;
pub mod category_service;
pub mod notification_service;
pub mod training_session_service;
pub mod whatsapp_client;

pub use athlete_service::AthleteService;
pub use category_service::CategoryService;
pub use notification_service::{NotificationKind, Notifier};
pub use training_session_service::TrainingSessionService;
pub use whatsapp_client::{MessageGateway, WhatsAppClient};
