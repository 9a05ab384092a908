// Domain records, request payloads and response DTOs

pub mod athlete;
pub mod category;
pub mod message;
pub mod training_session;
pub mod validation;

pub use athlete::*;
pub use category::*;
pub use message::*;
pub use training_session::*;
pub use validation::*;
