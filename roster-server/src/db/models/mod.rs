//! Server-side storage models
//!
//! Everything the API exposes lives in `shared::models`; the types here never
//! leave the server.

pub mod user;

pub use user::UserRecord;
