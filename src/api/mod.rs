pub mod auth;
pub mod envelope;
pub mod error;
pub mod event_handlers;
pub mod extract;
pub mod feedback_handlers;
pub mod handlers;
pub mod note_handlers;
pub mod pet_handlers;
pub mod request_log;
pub mod routes;
pub mod state;
pub mod status_handlers;
pub mod user_handlers;

pub use envelope::{ApiResponse, Envelope, ErrorBody};
pub use error::ApiError;
pub use routes::*;
pub use state::AppState;
