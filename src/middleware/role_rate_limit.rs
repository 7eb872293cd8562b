use axum::http::Request;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::KeyExtractor,
    GovernorError, GovernorLayer,
};
use uuid::Uuid;

use crate::middleware::rate_limit::rate_limit_error_handler;
use crate::services::access::Actor;

/// Keys the limiter on the authenticated account rather than the client IP.
/// Must run after `auth_middleware` has stored the `Actor`.
#[derive(Debug, Clone, Copy)]
pub struct UserIdExtractor;

impl KeyExtractor for UserIdExtractor {
    type Key = Uuid;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let actor = req
            .extensions()
            .get::<Actor>()
            .ok_or(GovernorError::UnableToExtractKey)?;

        Ok(actor.id)
    }
}

pub type RoleGovernorLayer = GovernorLayer<
    UserIdExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

/// Roles that get a per-account limiter. Admin routes rely on the global
/// IP limiter only.
pub enum RateLimitedRole {
    Guest,
    Staff,
}

/// - Staff: 500 requests per minute
/// - Guest: 100 requests per minute
pub fn create_role_governor(role: RateLimitedRole) -> RoleGovernorLayer {
    let (per_ms, burst) = match role {
        RateLimitedRole::Staff => (120, 500),
        RateLimitedRole::Guest => (600, 100),
    };

    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(burst)
            .key_extractor(UserIdExtractor)
            .finish()
            .expect("Invalid per-user rate limit configuration"),
    );

    GovernorLayer::new(config).error_handler(rate_limit_error_handler)
}
