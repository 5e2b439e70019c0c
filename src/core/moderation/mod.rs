// Core moderation module - text filtering and submission rate limiting.
// Every write path in the site goes through the gate in moderation_service.

pub mod content_filter;
pub mod moderation_models;
pub mod moderation_service;
pub mod rate_limiter;

pub use content_filter::*;
pub use moderation_models::*;
pub use moderation_service::*;
pub use rate_limiter::*;
