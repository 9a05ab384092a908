//! Administrative backend for the Handmaxx training school: athletes,
//! categories and training sessions, with WhatsApp notices to athletes.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use error::AppError;
