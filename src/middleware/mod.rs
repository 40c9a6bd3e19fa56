pub mod auth;
pub mod body;

pub use auth::{RequireKeyAuth, ensure_authorized};
pub use body::{ApiJson, ApiText};
