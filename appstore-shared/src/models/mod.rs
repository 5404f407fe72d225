pub mod app;
pub mod auth;
pub mod errors;
pub mod user;

pub use app::{AppDraft, AppField, AppListQuery, AppPayload, AppRecord, app_list_from_value};
pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use errors::{ErrorResponse, ValidationError, error_message};
pub use user::UserProfile;
