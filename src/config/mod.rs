pub mod app;
pub mod database;
pub mod whatsapp;

pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use whatsapp::WhatsAppConfig;
