//! Configuration types.

use std::time::Duration;

/// What out-of-range numeric answers do to advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Range violations only warn; any non-empty numeric answer advances.
    Advisory,
    /// Range violations block `next()`.
    Enforce,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self::Advisory
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How numeric bounds are applied at the gate.
    pub bounds_policy: BoundsPolicy,
    /// Base URL of the recommendation service.
    pub service_url: String,
    /// Timeout for the recommendation request.
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds_policy: BoundsPolicy::default(),
            service_url: "http://localhost:3000/api/recommendations".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
