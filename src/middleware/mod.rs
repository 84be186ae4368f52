pub mod activity;
pub mod auth;

pub use activity::log_user_activity;
pub use auth::{auth_middleware, AuthUser};
