// API routes and handlers

pub mod athletes;
pub mod categories;
pub mod health;
pub mod routes;
pub mod training_sessions;
