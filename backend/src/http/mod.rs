//! HTTP server module.
//!
//! An axum router exposing the student records as a JSON REST API. Handlers
//! reach storage only through the [`AppState`] repository handle.
//!
//! ```text
//! request ─► router (CORS, gzip, tracing, body limit)
//!         ─► handler: decode ─► validate ─► repository ─► ApiResponse
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use error::AppError;
pub use response::{ApiResponse, ResponseStatus};
pub use router::create_router;
pub use state::AppState;
